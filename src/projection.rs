use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dates::months_between;
use crate::decimal::{Money, Rate};

/// forecast of an investment's value at maturity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaturityProjection {
    pub projected_value: Money,
    pub remaining_months: u32,
    pub years_to_maturity: Decimal,
}

/// roll `current_value` forward `remaining_months` months.
///
/// `recurring_amount` is added on every `frequency_months`-th step before
/// that month's interest. No skips, pauses or rate changes are assumed, so
/// the figure is a forecast only.
pub fn project(
    current_value: Money,
    recurring_amount: Money,
    annual_rate: Rate,
    remaining_months: u32,
    frequency_months: u32,
) -> Money {
    let frequency_months = frequency_months.max(1);
    let mut balance = current_value;

    for step in 1..=remaining_months {
        if step % frequency_months == 0 {
            balance += recurring_amount;
        }
        balance += balance.monthly_interest(annual_rate);
    }

    balance
}

/// projection from `today` to `maturity_date`, `None` once matured
pub fn project_to_maturity(
    current_value: Money,
    recurring_amount: Money,
    annual_rate: Rate,
    frequency_months: u32,
    today: NaiveDate,
    maturity_date: NaiveDate,
) -> Option<MaturityProjection> {
    if maturity_date <= today {
        return None;
    }

    let remaining_months = months_between(today, maturity_date).max(0) as u32;
    let projected_value = project(
        current_value,
        recurring_amount,
        annual_rate,
        remaining_months,
        frequency_months,
    );

    Some(MaturityProjection {
        projected_value,
        remaining_months,
        years_to_maturity: (Decimal::from(remaining_months) / Decimal::from(12)).round_dp(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_projection_without_contributions() {
        let value = project(Money::from_major(10_000), Money::ZERO, Rate::from_percentage(12), 12, 1);
        assert_eq!(value.round_dp(2), Money::from_decimal(dec!(11268.25)));
    }

    #[test]
    fn test_projection_matches_ledger_order() {
        // same order as the simulator: add, then compound
        let value = project(Money::ZERO, Money::from_major(1_000), Rate::from_percentage(6), 3, 1);
        assert_eq!(value, Money::from_decimal(dec!(3030.100125)));
    }

    #[test]
    fn test_quarterly_projection_adds_every_third_step() {
        let value = project(Money::ZERO, Money::from_major(3_000), Rate::ZERO, 12, 3);
        assert_eq!(value, Money::from_major(12_000));

        let value = project(Money::ZERO, Money::from_major(3_000), Rate::ZERO, 2, 3);
        assert_eq!(value, Money::ZERO);
    }

    #[test]
    fn test_zero_months_returns_current_value() {
        let value = project(Money::from_major(5_000), Money::from_major(1_000), Rate::from_percentage(6), 0, 1);
        assert_eq!(value, Money::from_major(5_000));
    }

    #[test]
    fn test_project_to_maturity() {
        let projection = project_to_maturity(
            Money::from_major(1_000),
            Money::from_major(100),
            Rate::ZERO,
            1,
            date(2024, 1, 15),
            date(2025, 7, 1),
        )
        .unwrap();

        assert_eq!(projection.remaining_months, 18);
        assert_eq!(projection.years_to_maturity, dec!(1.5));
        assert_eq!(projection.projected_value, Money::from_major(2_800));
    }

    #[test]
    fn test_matured_investment_has_no_projection() {
        assert!(project_to_maturity(
            Money::from_major(1_000),
            Money::ZERO,
            Rate::ZERO,
            1,
            date(2024, 1, 15),
            date(2024, 1, 15),
        )
        .is_none());
    }
}
