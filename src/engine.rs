use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::investment::InvestmentSnapshot;
use crate::result::CalculationResult;
use crate::strategy::{select, GenericStrategy, SchemeStrategy, ValuationStrategy};

/// value a recurring investment with the generic monthly engine.
///
/// `None` when the investment is not recurring.
pub fn calculate_recurring_investment(snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult> {
    GenericStrategy::new().calculate(snapshot, today)
}

/// value a scheme-governed investment, `None` for anything else
pub fn calculate_current_value(snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult> {
    select(snapshot.investment_type).and_then(|strategy| strategy.calculate_current_value(snapshot, today))
}

/// value with the strategy registered for the investment's type, falling
/// back to the generic engine when none applies
pub fn calculate(snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult> {
    if let Some(strategy) = select(snapshot.investment_type) {
        if let Some(result) = strategy.calculate(snapshot, today) {
            log::debug!("valued {} with {}", snapshot.id, strategy.name());
            return Some(result);
        }
        log::debug!(
            "{} does not apply to {}, falling back to generic engine",
            strategy.name(),
            snapshot.id
        );
    }
    calculate_recurring_investment(snapshot, today)
}

/// valuation entry points bound to a time provider
pub struct ValuationEngine<'a> {
    time: &'a SafeTimeProvider,
}

impl<'a> ValuationEngine<'a> {
    pub fn new(time: &'a SafeTimeProvider) -> Self {
        Self { time }
    }

    /// calendar day the provider currently reports, in UTC
    pub fn today(&self) -> NaiveDate {
        self.time.now().date_naive()
    }

    pub fn calculate(&self, snapshot: &InvestmentSnapshot) -> Option<CalculationResult> {
        calculate(snapshot, self.today())
    }

    pub fn calculate_recurring_investment(&self, snapshot: &InvestmentSnapshot) -> Option<CalculationResult> {
        calculate_recurring_investment(snapshot, self.today())
    }

    pub fn calculate_current_value(&self, snapshot: &InvestmentSnapshot) -> Option<CalculationResult> {
        calculate_current_value(snapshot, self.today())
    }

    /// value a scheme investment with a custom rule set
    pub fn calculate_with_scheme(
        &self,
        strategy: &SchemeStrategy,
        snapshot: &InvestmentSnapshot,
    ) -> Option<CalculationResult> {
        strategy.calculate_current_value(snapshot, self.today())
    }

    /// value every snapshot against the same day; investments that cannot
    /// be valued are left out
    pub fn calculate_all<'s, I>(&self, snapshots: I) -> Vec<(&'s InvestmentSnapshot, CalculationResult)>
    where
        I: IntoIterator<Item = &'s InvestmentSnapshot>,
    {
        let today = self.today();
        snapshots
            .into_iter()
            .filter_map(|snapshot| calculate(snapshot, today).map(|result| (snapshot, result)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DepositEntry, RateChange, SchemeConfig};
    use crate::decimal::{Money, Rate};
    use crate::investment::{InvestmentKind, RecurringPlan};
    use crate::types::{InvestmentType, RecurringFrequency};
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot(investment_type: InvestmentType, kind: InvestmentKind) -> InvestmentSnapshot {
        InvestmentSnapshot {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            investment_type,
            start_date: date(2023, 1, 1),
            kind,
        }
    }

    fn monthly_plan() -> RecurringPlan {
        RecurringPlan::new(Money::from_major(1_000), RecurringFrequency::Monthly, Rate::from_percentage(6))
    }

    fn ppf_config() -> SchemeConfig {
        SchemeConfig::provident_fund(date(2023, 1, 1))
            .with_rate_change(RateChange::new(date(2023, 1, 1), Rate::from_percentage(12)))
            .with_deposit(DepositEntry::manual(date(2023, 1, 2), Money::from_major(10_000)))
    }

    #[test]
    fn test_engine_uses_provider_date() {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2023, 3, 20, 9, 30, 0).unwrap()));
        let engine = ValuationEngine::new(&time);

        assert_eq!(engine.today(), date(2023, 3, 20));

        let result = engine
            .calculate(&snapshot(InvestmentType::Sip, InvestmentKind::Recurring(monthly_plan())))
            .unwrap();
        assert_eq!(result.current_value, Money::from_decimal(dec!(3030.100125)));
    }

    #[test]
    fn test_advancing_time_extends_breakdown() {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2023, 3, 20, 0, 0, 0).unwrap()));
        let engine = ValuationEngine::new(&time);
        let sip = snapshot(InvestmentType::Sip, InvestmentKind::Recurring(monthly_plan()));

        let before = engine.calculate(&sip).unwrap();
        let control = time.test_control().unwrap();
        control.advance(Duration::days(31));
        let after = engine.calculate(&sip).unwrap();

        assert_eq!(before.monthly_breakdown.len(), 3);
        assert_eq!(after.monthly_breakdown.len(), 4);
    }

    #[test]
    fn test_dispatch_selects_scheme() {
        let ppf = snapshot(
            InvestmentType::Ppf,
            InvestmentKind::SchemeGoverned {
                plan: RecurringPlan::new(Money::ZERO, RecurringFrequency::Yearly, Rate::ZERO),
                annual_limit: None,
                config: Some(ppf_config()),
            },
        );

        let result = calculate(&ppf, date(2023, 3, 31)).unwrap();
        assert!(result.scheme.is_some());
        assert_eq!(result.current_value, Money::from_major(10_300));
        assert_eq!(calculate_current_value(&ppf, date(2023, 3, 31)), Some(result));
    }

    #[test]
    fn test_dispatch_falls_back_to_generic() {
        // provident fund type without scheme terms
        let ppf_as_plain = snapshot(InvestmentType::Ppf, InvestmentKind::Recurring(monthly_plan()));
        let result = calculate(&ppf_as_plain, date(2023, 3, 20)).unwrap();

        assert!(result.scheme.is_none());
        assert_eq!(result.total_invested, Money::from_major(3_000));
        assert!(calculate_current_value(&ppf_as_plain, date(2023, 3, 20)).is_none());

        let sip = snapshot(InvestmentType::Sip, InvestmentKind::Recurring(monthly_plan()));
        assert_eq!(calculate(&sip, date(2023, 3, 20)), calculate_recurring_investment(&sip, date(2023, 3, 20)));
    }

    #[test]
    fn test_simple_investment_has_no_result() {
        let stock = snapshot(InvestmentType::Stock, InvestmentKind::Simple);
        assert!(calculate(&stock, date(2024, 1, 1)).is_none());
        assert!(calculate_recurring_investment(&stock, date(2024, 1, 1)).is_none());
    }

    #[test]
    fn test_calculate_all_skips_unvalued() {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2023, 3, 20, 0, 0, 0).unwrap()));
        let engine = ValuationEngine::new(&time);
        let snapshots = vec![
            snapshot(InvestmentType::Sip, InvestmentKind::Recurring(monthly_plan())),
            snapshot(InvestmentType::Stock, InvestmentKind::Simple),
            snapshot(InvestmentType::RecurringDeposit, InvestmentKind::Recurring(monthly_plan())),
        ];

        let results = engine.calculate_all(&snapshots);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(s, _)| s.is_recurring()));
    }
}
