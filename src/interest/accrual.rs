use crate::decimal::Money;
use crate::interest::{CreditingPolicy, LedgerState, MonthPosting};

/// interest accrues monthly but is credited once a year.
///
/// A deposit joins that month's interest base only when its posting is
/// marked eligible. Accrued interest sits outside the balance and earns
/// nothing until the crediting month moves it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualCrediting {
    /// calendar month (1-12) in which accrued interest is credited
    pub crediting_month: u32,
}

impl AnnualCrediting {
    pub fn new(crediting_month: u32) -> Self {
        Self { crediting_month }
    }

    /// portion of this month's contribution excluded from the interest base
    fn ineligible_amount(&self, posting: &MonthPosting) -> Money {
        if posting.eligible_for_interest {
            Money::ZERO
        } else {
            posting.contribution
        }
    }
}

impl CreditingPolicy for AnnualCrediting {
    fn paused_earns_interest(&self) -> bool {
        // locked-in principal keeps earning
        true
    }

    fn accrue(&self, state: &mut LedgerState, posting: &MonthPosting) -> Money {
        let base = (state.balance - self.ineligible_amount(posting)).max(Money::ZERO);
        let interest = base.monthly_interest(posting.rate);
        state.accrued_interest += interest;

        if posting.month.month() == self.crediting_month {
            log::trace!(
                "crediting {} accrued interest in {}",
                state.accrued_interest,
                posting.month
            );
            state.balance += state.accrued_interest;
            state.credited_interest += state.accrued_interest;
            state.accrued_interest = Money::ZERO;
        }

        interest
    }

    fn name(&self) -> &'static str {
        "annual crediting"
    }
}
