use chrono::NaiveDate;

use crate::contribution::ContributionResolver;
use crate::dates::MonthKey;
use crate::interest::MonthlyCompounding;
use crate::investment::InvestmentSnapshot;
use crate::ledger::{simulate, RecurringSimulation};
use crate::projection::project_to_maturity;
use crate::result::CalculationResult;
use crate::strategy::ValuationStrategy;

/// recurring contributions with interest compounded monthly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenericStrategy {
    policy: MonthlyCompounding,
}

impl GenericStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MonthlyCompounding) -> Self {
        Self { policy }
    }
}

impl ValuationStrategy for GenericStrategy {
    fn calculate(&self, snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult> {
        let plan = snapshot.plan()?;

        if !plan.amount.is_positive() {
            log::warn!(
                "investment {} has non-positive recurring amount {}, returning zeroed result",
                snapshot.id,
                plan.amount
            );
            return Some(CalculationResult::zeroed());
        }

        // stop at maturity if it has already passed
        let mut end = MonthKey::from_date(today);
        if let Some(maturity) = plan.maturity_date {
            end = end.min(MonthKey::from_date(maturity));
        }

        let ledger = simulate(
            &RecurringSimulation {
                start_date: snapshot.start_date,
                end,
                default_amount: plan.amount,
                rate: plan.interest_rate,
                skipped_months: &plan.skipped_months,
                paused_since: plan.paused_since,
                frequency_months: plan.frequency.months(),
                history: &plan.contribution_history,
            },
            self.policy,
        );

        let result = CalculationResult::from_ledger(ledger, plan.skipped_months.len() as u32);

        let projection = plan.maturity_date.and_then(|maturity| {
            let resolver = ContributionResolver::for_plan(plan, snapshot.start_date);
            project_to_maturity(
                result.current_value,
                resolver.amount_in_force(MonthKey::from_date(today)),
                plan.interest_rate,
                plan.frequency.months(),
                today,
                maturity,
            )
        });

        Some(result.with_projection(projection))
    }

    fn name(&self) -> &'static str {
        "generic recurring"
    }
}
