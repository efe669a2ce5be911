use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::dates::{add_years, MonthKey};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ValuationError};

/// statutory lock-in of the provident fund scheme
pub const LOCK_IN_YEARS: u32 = 15;
/// deposits on or before this day earn interest in their own month
pub const ELIGIBILITY_CUTOFF_DAY: u32 = 5;
/// march, the close of the financial year
pub const DEFAULT_CREDITING_MONTH: u32 = 3;
pub const DEFAULT_DEPOSIT_DAY: u32 = 1;
pub const DEFAULT_SCHEME_RATE_PERCENT: Decimal = dec!(7.1);
pub const DEFAULT_ANNUAL_LIMIT: i64 = 150_000;

pub fn default_scheme_rate() -> Rate {
    Rate::from_percentage_decimal(DEFAULT_SCHEME_RATE_PERCENT)
}

pub fn default_annual_limit() -> Money {
    Money::from_major(DEFAULT_ANNUAL_LIMIT)
}

fn default_crediting_month() -> u32 {
    DEFAULT_CREDITING_MONTH
}

fn default_deposit_day() -> u32 {
    DEFAULT_DEPOSIT_DAY
}

/// one deposit in the scheme's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEntry {
    pub month: MonthKey,
    pub date: NaiveDate,
    pub amount: Money,
    /// entered by the user rather than generated from the recurring config
    pub is_manual_override: bool,
    pub is_eligible_for_interest: bool,
}

impl DepositEntry {
    pub fn manual(date: NaiveDate, amount: Money) -> Self {
        Self::build(date, amount, true)
    }

    pub fn automatic(date: NaiveDate, amount: Money) -> Self {
        Self::build(date, amount, false)
    }

    fn build(date: NaiveDate, amount: Money, is_manual_override: bool) -> Self {
        Self {
            month: MonthKey::from_date(date),
            date,
            amount,
            is_manual_override,
            is_eligible_for_interest: date.day() <= ELIGIBILITY_CUTOFF_DAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateChange {
    pub effective_date: NaiveDate,
    pub rate: Rate,
}

impl RateChange {
    pub fn new(effective_date: NaiveDate, rate: Rate) -> Self {
        Self { effective_date, rate }
    }
}

/// standing instruction to deposit every month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringConfig {
    pub enabled: bool,
    pub amount: Money,
    pub start_month: Option<MonthKey>,
    #[serde(default = "default_deposit_day")]
    pub deposit_day: u32,
}

impl Default for RecurringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: Money::ZERO,
            start_month: None,
            deposit_day: DEFAULT_DEPOSIT_DAY,
        }
    }
}

/// configuration of a scheme-governed investment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeConfig {
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default)]
    pub annual_limit: Option<Money>,
    #[serde(default = "default_crediting_month")]
    pub crediting_month: u32,
    #[serde(default)]
    pub deposit_schedule: Vec<DepositEntry>,
    #[serde(default)]
    pub interest_rate_history: Vec<RateChange>,
    #[serde(default)]
    pub recurring_config: RecurringConfig,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            opening_date: None,
            maturity_date: None,
            annual_limit: None,
            crediting_month: DEFAULT_CREDITING_MONTH,
            deposit_schedule: Vec::new(),
            interest_rate_history: Vec::new(),
            recurring_config: RecurringConfig::default(),
        }
    }
}

impl SchemeConfig {
    /// create provident fund configuration opened on `opening_date`
    pub fn provident_fund(opening_date: NaiveDate) -> Self {
        Self {
            opening_date: Some(opening_date),
            maturity_date: add_years(opening_date, LOCK_IN_YEARS),
            annual_limit: Some(default_annual_limit()),
            crediting_month: DEFAULT_CREDITING_MONTH,
            deposit_schedule: Vec::new(),
            interest_rate_history: vec![RateChange::new(opening_date, default_scheme_rate())],
            recurring_config: RecurringConfig::default(),
        }
    }

    /// copy with `entry` recorded; an automatic entry never replaces a manual one
    pub fn with_deposit(&self, entry: DepositEntry) -> Self {
        let mut config = self.clone();
        match config.deposit_schedule.iter().position(|e| e.month == entry.month) {
            Some(i) if config.deposit_schedule[i].is_manual_override && !entry.is_manual_override => {}
            Some(i) => config.deposit_schedule[i] = entry,
            None => {
                config.deposit_schedule.push(entry);
                config.deposit_schedule.sort_by_key(|e| e.month);
            }
        }
        config
    }

    /// copy without the deposit for `month`
    pub fn without_deposit(&self, month: MonthKey) -> Self {
        let mut config = self.clone();
        config.deposit_schedule.retain(|e| e.month != month);
        config
    }

    /// copy with monthly auto-deposits enabled from `start_month`
    pub fn with_recurring(&self, amount: Money, start_month: MonthKey) -> Self {
        let mut config = self.clone();
        config.recurring_config = RecurringConfig {
            enabled: true,
            amount,
            start_month: Some(start_month),
            deposit_day: self.recurring_config.deposit_day,
        };
        config
    }

    pub fn with_rate_change(&self, change: RateChange) -> Self {
        let mut config = self.clone();
        config.interest_rate_history.push(change);
        config.interest_rate_history.sort_by_key(|c| c.effective_date);
        config
    }

    /// deposits in force through `through`, one per month.
    ///
    /// Manual entries win over automatic ones for the same month; months
    /// without any entry are filled from the recurring config.
    pub fn effective_schedule(&self, through: MonthKey) -> Vec<DepositEntry> {
        let mut by_month: BTreeMap<MonthKey, DepositEntry> = BTreeMap::new();

        for entry in &self.deposit_schedule {
            if let Some(existing) = by_month.get(&entry.month) {
                if existing.is_manual_override && !entry.is_manual_override {
                    continue;
                }
            }
            by_month.insert(entry.month, entry.clone());
        }

        let recurring = &self.recurring_config;
        if recurring.enabled && recurring.amount.is_positive() {
            let first = recurring
                .start_month
                .or(self.opening_date.map(MonthKey::from_date));
            if let Some(first) = first {
                for month in first.iter_through(through) {
                    by_month
                        .entry(month)
                        .or_insert_with(|| DepositEntry::automatic(month.day(recurring.deposit_day), recurring.amount));
                }
            }
        }

        by_month
            .into_values()
            .filter(|entry| entry.month <= through)
            .collect()
    }

    pub fn annual_limit_or_default(&self) -> Money {
        self.annual_limit.unwrap_or_else(default_annual_limit)
    }
}

/// fill in whatever a scheme configuration is missing.
///
/// Returns a new value and leaves `raw` untouched; applying it twice gives
/// the same result as applying it once.
pub fn ensure_config(
    raw: Option<&SchemeConfig>,
    start_date: NaiveDate,
    maturity_date: Option<NaiveDate>,
    annual_limit: Option<Money>,
) -> SchemeConfig {
    if raw.is_none() {
        log::debug!("no scheme configuration, using defaults from {}", start_date);
    }

    let mut config = raw.cloned().unwrap_or_default();

    let opening_date = *config.opening_date.get_or_insert(start_date);
    if config.maturity_date.is_none() {
        config.maturity_date = maturity_date.or_else(|| add_years(opening_date, LOCK_IN_YEARS));
    }
    if config.annual_limit.is_none() {
        config.annual_limit = Some(annual_limit.unwrap_or_else(default_annual_limit));
    }
    if config.interest_rate_history.is_empty() {
        config
            .interest_rate_history
            .push(RateChange::new(opening_date, default_scheme_rate()));
    }

    config
}

/// check every invariant of a configuration, reporting the first violation
pub fn check_configuration(config: &SchemeConfig) -> Result<()> {
    let invalid = |message: String| Err(ValuationError::InvalidConfiguration { message });

    let opening_date = match config.opening_date {
        Some(date) => date,
        None => return invalid("missing opening date".to_string()),
    };
    let maturity_date = match config.maturity_date {
        Some(date) => date,
        None => return invalid("missing maturity date".to_string()),
    };

    match add_years(opening_date, LOCK_IN_YEARS) {
        Some(earliest) if maturity_date >= earliest => {}
        _ => {
            return invalid(format!(
                "maturity {} is less than {} years after opening {}",
                maturity_date, LOCK_IN_YEARS, opening_date
            ))
        }
    }

    if !(1..=12).contains(&config.crediting_month) {
        return invalid(format!("crediting month out of range: {}", config.crediting_month));
    }

    if let Some(limit) = config.annual_limit {
        if limit.is_negative() {
            return invalid(format!("negative annual limit: {}", limit));
        }
    }

    let mut seen = BTreeSet::new();
    for entry in &config.deposit_schedule {
        if !seen.insert(entry.month) {
            return invalid(format!("duplicate deposit for {}", entry.month));
        }
        if entry.month != MonthKey::from_date(entry.date) {
            return invalid(format!("deposit dated {} filed under {}", entry.date, entry.month));
        }
        if !entry.amount.is_positive() {
            return Err(ValuationError::InvalidAmount { amount: entry.amount });
        }
        if entry.is_eligible_for_interest != (entry.date.day() <= ELIGIBILITY_CUTOFF_DAY) {
            return invalid(format!("interest eligibility of {} does not match its date", entry.month));
        }
    }

    if let Some(change) = config.interest_rate_history.iter().find(|c| c.rate.is_negative()) {
        return invalid(format!("negative rate from {}", change.effective_date));
    }

    let recurring = &config.recurring_config;
    if recurring.enabled {
        if !recurring.amount.is_positive() {
            return Err(ValuationError::InvalidAmount {
                amount: recurring.amount,
            });
        }
        if !(1..=31).contains(&recurring.deposit_day) {
            return invalid(format!("recurring deposit day out of range: {}", recurring.deposit_day));
        }
    }

    Ok(())
}

/// whether a configuration may be persisted
pub fn validate_configuration(config: &SchemeConfig) -> bool {
    match check_configuration(config) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("rejecting scheme configuration: {}", e);
            false
        }
    }
}
