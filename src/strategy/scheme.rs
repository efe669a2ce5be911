//! Lock-in savings scheme valuation.
//!
//! Deposits come from the scheme's deposit schedule instead of the generic
//! contribution resolver. Interest is worked out every month on the balance
//! eligible that month and credited once a year, in the crediting month.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::config::{
    check_configuration, default_scheme_rate, ensure_config, DepositEntry, SchemeConfig, LOCK_IN_YEARS,
};
use crate::contribution::ContributionResolver;
use crate::dates::{add_years, MonthKey};
use crate::decimal::{Money, Rate};
use crate::interest::{AnnualCrediting, MonthPosting, RateSchedule};
use crate::investment::{InvestmentKind, InvestmentSnapshot, RecurringPlan};
use crate::ledger::{classify_month, Ledger, LedgerSimulator};
use crate::projection::project_to_maturity;
use crate::result::{CalculationResult, SchemeSummary};
use crate::strategy::ValuationStrategy;
use crate::types::{ContributionStatus, InvestmentType};

/// valuation rules of a scheme-governed instrument
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeStrategy {
    pub investment_type: InvestmentType,
    pub default_rate: Rate,
    pub lock_in_years: u32,
}

impl SchemeStrategy {
    pub fn provident_fund() -> Self {
        Self {
            investment_type: InvestmentType::Ppf,
            default_rate: default_scheme_rate(),
            lock_in_years: LOCK_IN_YEARS,
        }
    }

    /// value a scheme-governed investment as of `today`.
    ///
    /// `None` when the snapshot is of another type or is not scheme
    /// governed. A missing configuration is defaulted, never persisted.
    pub fn calculate_current_value(
        &self,
        snapshot: &InvestmentSnapshot,
        today: NaiveDate,
    ) -> Option<CalculationResult> {
        if snapshot.investment_type != self.investment_type {
            return None;
        }
        let (plan, annual_limit, raw_config) = match &snapshot.kind {
            InvestmentKind::SchemeGoverned {
                plan,
                annual_limit,
                config,
            } => (plan, *annual_limit, config.as_ref()),
            _ => return None,
        };

        let maturity_default = plan
            .maturity_date
            .or_else(|| add_years(snapshot.start_date, self.lock_in_years));
        let config = ensure_config(raw_config, snapshot.start_date, maturity_default, annual_limit);
        let opening_date = config.opening_date?;
        let maturity_date = config.maturity_date?;

        let today_month = MonthKey::from_date(today);
        let maturity_month = MonthKey::from_date(maturity_date);
        let end = today_month.min(maturity_month);
        let rates = RateSchedule::new(self.default_rate, &config.interest_rate_history);

        // the limit covers the whole calendar year, so schedule past today
        let year_end = MonthKey::new(today.year(), 12).ok()?;
        let horizon = year_end.min(maturity_month).max(end);

        // without a stored configuration the plan's own terms drive deposits
        let plan_driven = raw_config.is_none();
        let schedule = self.deposit_schedule(&config, plan, opening_date, horizon, plan_driven);
        let ledger = self.simulate(&config, plan, &schedule, &rates, opening_date, end);

        let limit = config.annual_limit_or_default();
        let annual_limit_used = deposits_in_year(&schedule, plan, today.year());

        let summary = SchemeSummary {
            annual_limit: limit,
            annual_limit_used,
            annual_limit_remaining: limit - annual_limit_used,
            accrued_interest: ledger.closing.accrued_interest,
            credited_interest: ledger.closing.credited_interest,
            current_rate: rates.rate_for(today_month),
            opening_date,
            maturity_date,
            next_crediting_month: next_crediting_month(today_month, config.crediting_month)
                .filter(|m| *m <= MonthKey::from_date(maturity_date)),
            configuration_valid: check_configuration(&config).is_ok(),
        };

        let result = CalculationResult::from_ledger(ledger, plan.skipped_months.len() as u32);

        let (amount, frequency_months) = if config.recurring_config.enabled {
            (config.recurring_config.amount, 1)
        } else if plan_driven {
            let resolver = ContributionResolver::for_plan(plan, snapshot.start_date);
            (resolver.amount_in_force(today_month), plan.frequency.months())
        } else {
            (Money::ZERO, 1)
        };
        let projection = project_to_maturity(
            result.current_value,
            amount,
            rates.rate_for(today_month),
            frequency_months,
            today,
            maturity_date,
        );

        Some(result.with_projection(projection).with_scheme(summary))
    }

    /// one deposit per month through `horizon`, none before opening
    fn deposit_schedule(
        &self,
        config: &SchemeConfig,
        plan: &RecurringPlan,
        opening_date: NaiveDate,
        horizon: MonthKey,
        plan_driven: bool,
    ) -> BTreeMap<MonthKey, DepositEntry> {
        let opening_month = MonthKey::from_date(opening_date);
        let mut schedule: BTreeMap<MonthKey, DepositEntry> = config
            .effective_schedule(horizon)
            .into_iter()
            .filter(|entry| entry.month >= opening_month)
            .map(|entry| (entry.month, entry))
            .collect();

        if plan_driven && plan.amount.is_positive() {
            let resolver = ContributionResolver::for_plan(plan, opening_date);
            for month in opening_month.iter_through(horizon) {
                let amount = resolver.resolve(month);
                if amount.is_positive() {
                    schedule
                        .entry(month)
                        .or_insert_with(|| DepositEntry::automatic(month.day(opening_date.day()), amount));
                }
            }
        }

        schedule
    }

    fn simulate(
        &self,
        config: &SchemeConfig,
        plan: &RecurringPlan,
        schedule: &BTreeMap<MonthKey, DepositEntry>,
        rates: &RateSchedule,
        opening_date: NaiveDate,
        end: MonthKey,
    ) -> Ledger {
        let policy = AnnualCrediting::new(config.crediting_month);
        let pause_month = plan.pause_month();
        let opening_month = MonthKey::from_date(opening_date);

        log::debug!(
            "simulating scheme from {} through {}, {} deposits scheduled",
            opening_month,
            end,
            schedule.range(..=end).count()
        );

        let postings = opening_month.iter_through(end).map(|month| {
            let status = classify_month(month, pause_month, &plan.skipped_months);
            let deposit = schedule
                .get(&month)
                .filter(|_| status == ContributionStatus::Contributed);

            MonthPosting {
                month,
                status,
                contribution: deposit.map(|d| d.amount).unwrap_or(Money::ZERO),
                eligible_for_interest: deposit.map_or(true, |d| d.is_eligible_for_interest),
                rate: rates.rate_for(month),
            }
        });

        LedgerSimulator::new(policy).run(postings)
    }
}

impl ValuationStrategy for SchemeStrategy {
    fn calculate(&self, snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult> {
        self.calculate_current_value(snapshot, today)
    }

    fn name(&self) -> &'static str {
        "scheme annual crediting"
    }
}

/// deposits dated in `year`, including those still to come.
///
/// Skipped and paused months put nothing towards the limit.
fn deposits_in_year(schedule: &BTreeMap<MonthKey, DepositEntry>, plan: &RecurringPlan, year: i32) -> Money {
    let pause_month = plan.pause_month();
    schedule
        .values()
        .filter(|entry| entry.date.year() == year)
        .filter(|entry| {
            classify_month(entry.month, pause_month, &plan.skipped_months) == ContributionStatus::Contributed
        })
        .map(|entry| entry.amount)
        .fold(Money::ZERO, |acc, x| acc + x)
}

/// first crediting month strictly after `month`
fn next_crediting_month(month: MonthKey, crediting_month: u32) -> Option<MonthKey> {
    if !(1..=12).contains(&crediting_month) {
        return None;
    }
    let ahead = (crediting_month + 12 - month.month()) % 12;
    month.add_months(if ahead == 0 { 12 } else { ahead })
}
