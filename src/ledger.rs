//! Month-by-month ledger simulation.
//!
//! The simulator walks calendar months in order, adds each month's
//! contribution to the running balance and hands the month to a
//! [`CreditingPolicy`] to accrue interest. Month N only ever sees the state
//! left by month N-1.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::contribution::ContributionResolver;
use crate::dates::MonthKey;
use crate::decimal::{Money, Rate};
use crate::interest::{CreditingPolicy, LedgerState, MonthPosting};
use crate::investment::ContributionChange;
use crate::result::MonthlyContribution;
use crate::types::ContributionStatus;

/// classify a month: a pause wins over a skip
pub fn classify_month(
    month: MonthKey,
    pause_month: Option<MonthKey>,
    skipped_months: &BTreeSet<MonthKey>,
) -> ContributionStatus {
    match pause_month {
        Some(paused) if month >= paused => ContributionStatus::Paused,
        _ if skipped_months.contains(&month) => ContributionStatus::Skipped,
        _ => ContributionStatus::Contributed,
    }
}

/// completed simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub entries: Vec<MonthlyContribution>,
    pub closing: LedgerState,
}

impl Ledger {
    /// sum of contributions actually applied
    pub fn total_invested(&self) -> Money {
        self.entries
            .iter()
            .filter(|e| e.status == ContributionStatus::Contributed)
            .map(|e| e.contribution)
            .fold(Money::ZERO, |acc, x| acc + x)
    }

    /// number of months with a positive contribution
    pub fn contributions_made(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.status == ContributionStatus::Contributed && e.contribution.is_positive())
            .count() as u32
    }

    pub fn months_with_status(&self, status: ContributionStatus) -> u32 {
        self.entries.iter().filter(|e| e.status == status).count() as u32
    }

    /// value at the end of the last simulated month
    pub fn closing_value(&self) -> Money {
        self.closing.value()
    }
}

/// runs postings through a crediting policy
pub struct LedgerSimulator<P: CreditingPolicy> {
    policy: P,
}

impl<P: CreditingPolicy> LedgerSimulator<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// apply postings in order; callers supply one posting per month
    pub fn run<I>(&self, postings: I) -> Ledger
    where
        I: IntoIterator<Item = MonthPosting>,
    {
        let mut state = LedgerState::default();
        let mut entries = Vec::new();

        for posting in postings {
            let contribution = match posting.status {
                ContributionStatus::Contributed => posting.contribution,
                ContributionStatus::Skipped | ContributionStatus::Paused => Money::ZERO,
            };
            state.balance += contribution;

            let earns = posting.status != ContributionStatus::Paused || self.policy.paused_earns_interest();
            let interest = if earns {
                self.policy.accrue(&mut state, &MonthPosting { contribution, ..posting })
            } else {
                Money::ZERO
            };

            log::trace!(
                "{} {:?}: contribution {} interest {} balance {}",
                posting.month,
                posting.status,
                contribution,
                interest,
                state.balance
            );

            entries.push(MonthlyContribution {
                month: posting.month,
                contribution,
                interest_rate: posting.rate,
                interest,
                balance: state.balance,
                status: posting.status,
            });
        }

        Ledger {
            entries,
            closing: state,
        }
    }
}

/// parameters of a generic recurring simulation
#[derive(Debug, Clone)]
pub struct RecurringSimulation<'a> {
    pub start_date: NaiveDate,
    pub end: MonthKey,
    pub default_amount: Money,
    pub rate: Rate,
    pub skipped_months: &'a BTreeSet<MonthKey>,
    pub paused_since: Option<NaiveDate>,
    pub frequency_months: u32,
    pub history: &'a [ContributionChange],
}

/// simulate a recurring plan from its start month through `end`
pub fn simulate<P: CreditingPolicy>(simulation: &RecurringSimulation<'_>, policy: P) -> Ledger {
    let resolver = ContributionResolver::with_frequency_months(
        simulation.default_amount,
        simulation.history,
        simulation.frequency_months,
        simulation.start_date,
    );
    let pause_month = simulation.paused_since.map(MonthKey::from_date);
    let start = MonthKey::from_date(simulation.start_date);

    log::debug!(
        "simulating {} through {} with {}",
        start,
        simulation.end,
        policy.name()
    );

    let postings = start.iter_through(simulation.end).map(|month| MonthPosting {
        month,
        status: classify_month(month, pause_month, simulation.skipped_months),
        contribution: resolver.resolve(month),
        eligible_for_interest: true,
        rate: simulation.rate,
    });

    let ledger = LedgerSimulator::new(policy).run(postings);
    log::debug!(
        "simulated {} months, closing value {}",
        ledger.entries.len(),
        ledger.closing_value()
    );
    ledger
}
