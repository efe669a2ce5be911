use crate::decimal::Money;
use crate::interest::{CreditingPolicy, LedgerState, MonthPosting};

/// interest credited to the balance every month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyCompounding {
    pub paused_earns_interest: bool,
}

impl MonthlyCompounding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paused_interest(mut self, paused_earns_interest: bool) -> Self {
        self.paused_earns_interest = paused_earns_interest;
        self
    }
}

impl CreditingPolicy for MonthlyCompounding {
    fn paused_earns_interest(&self) -> bool {
        self.paused_earns_interest
    }

    fn accrue(&self, state: &mut LedgerState, posting: &MonthPosting) -> Money {
        let interest = state.balance.monthly_interest(posting.rate);
        state.balance += interest;
        state.credited_interest += interest;
        interest
    }

    fn name(&self) -> &'static str {
        "monthly compounding"
    }
}
