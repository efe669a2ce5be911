use chrono::NaiveDate;

use crate::dates::{months_between, MonthKey};
use crate::decimal::Money;
use crate::investment::{ContributionChange, RecurringPlan};
use crate::types::RecurringFrequency;

/// resolves the contribution due in a given month.
///
/// History is sorted once on construction; an entry applies from its own
/// effective month onward and never before it.
#[derive(Debug, Clone)]
pub struct ContributionResolver {
    default_amount: Money,
    frequency_months: u32,
    start_date: NaiveDate,
    history: Vec<(MonthKey, Money)>,
}

impl ContributionResolver {
    pub fn new(
        default_amount: Money,
        history: &[ContributionChange],
        frequency: RecurringFrequency,
        start_date: NaiveDate,
    ) -> Self {
        Self::with_frequency_months(default_amount, history, frequency.months(), start_date)
    }

    pub fn with_frequency_months(
        default_amount: Money,
        history: &[ContributionChange],
        frequency_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        let mut sorted: Vec<&ContributionChange> = history.iter().collect();
        // stable, so same-day entries keep their recorded order
        sorted.sort_by_key(|change| change.effective_date);

        Self {
            default_amount,
            frequency_months: frequency_months.max(1),
            start_date,
            history: sorted
                .into_iter()
                .map(|change| (change.effective_month(), change.amount))
                .collect(),
        }
    }

    pub fn for_plan(plan: &RecurringPlan, start_date: NaiveDate) -> Self {
        Self::new(plan.amount, &plan.contribution_history, plan.frequency, start_date)
    }

    /// whether a contribution falls due in `month`
    pub fn is_due(&self, month: MonthKey) -> bool {
        let elapsed = months_between(self.start_date, month.first_day());
        elapsed >= 0 && elapsed as u32 % self.frequency_months == 0
    }

    /// amount in force for `month`, ignoring whether it is due
    pub fn amount_in_force(&self, month: MonthKey) -> Money {
        self.history
            .iter()
            .take_while(|(effective, _)| *effective <= month)
            .last()
            .map(|(_, amount)| *amount)
            .unwrap_or(self.default_amount)
    }

    /// contribution due in `month`, zero when not a due period
    pub fn resolve(&self, month: MonthKey) -> Money {
        if !self.is_due(month) {
            return Money::ZERO;
        }
        self.amount_in_force(month)
    }
}

/// one-shot resolution for a single month
pub fn resolve_contribution(
    target_month: MonthKey,
    default_amount: Money,
    history: &[ContributionChange],
    frequency: RecurringFrequency,
    start_date: NaiveDate,
    month_date: NaiveDate,
) -> Money {
    let resolver = ContributionResolver::new(default_amount, history, frequency, start_date);
    if !resolver.is_due(MonthKey::from_date(month_date)) {
        return Money::ZERO;
    }
    resolver.amount_in_force(target_month)
}
