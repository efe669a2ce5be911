pub mod accrual;
pub mod compound;

use crate::config::RateChange;
use crate::dates::MonthKey;
use crate::decimal::{Money, Rate};
use crate::types::ContributionStatus;

pub use accrual::AnnualCrediting;
pub use compound::MonthlyCompounding;

/// running position of a ledger between months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerState {
    /// compounding balance: principal plus credited interest
    pub balance: Money,
    /// interest earned but not yet credited to the balance
    pub accrued_interest: Money,
    /// interest credited to the balance so far
    pub credited_interest: Money,
}

impl LedgerState {
    /// balance plus any uncredited interest
    pub fn value(&self) -> Money {
        self.balance + self.accrued_interest
    }
}

/// events of one simulated month, handed to the crediting policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthPosting {
    pub month: MonthKey,
    pub status: ContributionStatus,
    pub contribution: Money,
    /// whether the contribution counts towards this month's interest base
    pub eligible_for_interest: bool,
    pub rate: Rate,
}

/// how a month's interest reaches the balance
pub trait CreditingPolicy {
    /// whether months after a pause still earn interest
    fn paused_earns_interest(&self) -> bool;

    /// accrue one month of interest on `state`, which already includes
    /// this month's contribution. returns the interest earned
    fn accrue(&self, state: &mut LedgerState, posting: &MonthPosting) -> Money;

    fn name(&self) -> &'static str;
}

/// annual rate in force for each month
#[derive(Debug, Clone, PartialEq)]
pub struct RateSchedule {
    default_rate: Rate,
    changes: Vec<(MonthKey, Rate)>,
}

impl RateSchedule {
    pub fn fixed(rate: Rate) -> Self {
        Self {
            default_rate: rate,
            changes: Vec::new(),
        }
    }

    pub fn new(default_rate: Rate, history: &[RateChange]) -> Self {
        let mut changes: Vec<(MonthKey, Rate)> = history
            .iter()
            .map(|change| (MonthKey::from_date(change.effective_date), change.rate))
            .collect();
        changes.sort_by_key(|(month, _)| *month);

        Self {
            default_rate,
            changes,
        }
    }

    /// latest rate effective on or before `month`
    pub fn rate_for(&self, month: MonthKey) -> Rate {
        self.changes
            .iter()
            .take_while(|(effective, _)| *effective <= month)
            .last()
            .map(|(_, rate)| *rate)
            .unwrap_or(self.default_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rate_schedule_lookup() {
        let history = vec![
            RateChange::new(date(2024, 1, 1), Rate::from_percentage_decimal(dec!(7.1))),
            RateChange::new(date(2023, 4, 1), Rate::from_percentage_decimal(dec!(7.1))),
            RateChange::new(date(2020, 4, 1), Rate::from_percentage_decimal(dec!(7.1))),
            RateChange::new(date(2019, 4, 1), Rate::from_percentage(8)),
        ];
        let schedule = RateSchedule::new(Rate::from_percentage(5), &history);

        assert_eq!(schedule.rate_for(MonthKey::new(2019, 3).unwrap()), Rate::from_percentage(5));
        assert_eq!(schedule.rate_for(MonthKey::new(2019, 4).unwrap()), Rate::from_percentage(8));
        assert_eq!(
            schedule.rate_for(MonthKey::new(2021, 6).unwrap()),
            Rate::from_percentage_decimal(dec!(7.1))
        );
    }

    #[test]
    fn test_ledger_value_includes_accrued() {
        let state = LedgerState {
            balance: Money::from_major(10_000),
            accrued_interest: Money::from_major(59),
            credited_interest: Money::ZERO,
        };
        assert_eq!(state.value(), Money::from_major(10_059));
    }
}
