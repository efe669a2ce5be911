use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::SchemeConfig;
use crate::dates::{parse_date, MonthKey};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ValuationError};
use crate::types::{InterestRateType, InvestmentId, InvestmentType, RecurringFrequency};

/// historical change to the recurring contribution amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionChange {
    pub effective_date: NaiveDate,
    pub amount: Money,
    pub reason: Option<String>,
}

impl ContributionChange {
    pub fn new(effective_date: NaiveDate, amount: Money) -> Self {
        Self {
            effective_date,
            amount,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn effective_month(&self) -> MonthKey {
        MonthKey::from_date(self.effective_date)
    }
}

/// contribution terms shared by every recurring instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPlan {
    pub amount: Money,
    pub frequency: RecurringFrequency,
    pub interest_rate: Rate,
    /// carried through from the record, not read by valuation
    pub rate_type: InterestRateType,
    pub maturity_date: Option<NaiveDate>,
    /// contributions stop from this date's month onward
    pub paused_since: Option<NaiveDate>,
    pub skipped_months: BTreeSet<MonthKey>,
    pub contribution_history: Vec<ContributionChange>,
}

impl RecurringPlan {
    pub fn new(amount: Money, frequency: RecurringFrequency, interest_rate: Rate) -> Self {
        Self {
            amount,
            frequency,
            interest_rate,
            rate_type: InterestRateType::Fixed,
            maturity_date: None,
            paused_since: None,
            skipped_months: BTreeSet::new(),
            contribution_history: Vec::new(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    pub fn pause_month(&self) -> Option<MonthKey> {
        self.paused_since.map(MonthKey::from_date)
    }
}

/// what kind of valuation an investment needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InvestmentKind {
    /// one-off holding, valued outside this engine
    Simple,
    Recurring(RecurringPlan),
    /// recurring plan governed by a lock-in savings scheme
    SchemeGoverned {
        plan: RecurringPlan,
        annual_limit: Option<Money>,
        config: Option<SchemeConfig>,
    },
}

/// immutable view of one investment for a single calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSnapshot {
    pub id: InvestmentId,
    pub name: String,
    pub investment_type: InvestmentType,
    pub start_date: NaiveDate,
    pub kind: InvestmentKind,
}

impl InvestmentSnapshot {
    /// recurring plan, if the investment has one
    pub fn plan(&self) -> Option<&RecurringPlan> {
        match &self.kind {
            InvestmentKind::Simple => None,
            InvestmentKind::Recurring(plan) => Some(plan),
            InvestmentKind::SchemeGoverned { plan, .. } => Some(plan),
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.plan().is_some()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: InvestmentRecord = serde_json::from_str(json)?;
        InvestmentSnapshot::try_from(record)
    }
}

/// contribution change as persisted, with an unparsed date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionChangeRecord {
    pub effective_date: String,
    pub amount: Money,
    #[serde(default)]
    pub reason: Option<String>,
}

/// investment as held by the record store: flat, loosely typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub id: InvestmentId,
    pub name: String,
    #[serde(rename = "type")]
    pub investment_type: InvestmentType,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_amount: Option<Money>,
    #[serde(default)]
    pub recurring_frequency: Option<RecurringFrequency>,
    /// annual rate in percent
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
    #[serde(default)]
    pub interest_rate_type: Option<InterestRateType>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub maturity_date: Option<String>,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub paused_since: Option<String>,
    #[serde(default)]
    pub skipped_months: Vec<String>,
    #[serde(default)]
    pub contribution_history: Vec<ContributionChangeRecord>,
    #[serde(default)]
    pub annual_limit: Option<Money>,
    #[serde(default)]
    pub scheme_config: Option<SchemeConfig>,
    pub created_at: DateTime<Utc>,
}

impl InvestmentRecord {
    /// bare record for a one-off holding
    pub fn simple(id: InvestmentId, name: impl Into<String>, investment_type: InvestmentType, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            investment_type,
            is_recurring: false,
            recurring_amount: None,
            recurring_frequency: None,
            interest_rate: None,
            interest_rate_type: None,
            start_date: None,
            maturity_date: None,
            is_paused: false,
            paused_since: None,
            skipped_months: Vec::new(),
            contribution_history: Vec::new(),
            annual_limit: None,
            scheme_config: None,
            created_at,
        }
    }

    fn optional_date(value: &Option<String>) -> Result<Option<NaiveDate>> {
        value.as_deref().map(parse_date).transpose()
    }
}

impl TryFrom<InvestmentRecord> for InvestmentSnapshot {
    type Error = ValuationError;

    fn try_from(record: InvestmentRecord) -> Result<Self> {
        let start_date = InvestmentRecord::optional_date(&record.start_date)?
            .unwrap_or_else(|| record.created_at.date_naive());

        if !record.is_recurring {
            if record.scheme_config.is_some() {
                return Err(ValuationError::InvalidConfiguration {
                    message: format!("non-recurring investment {} carries a scheme configuration", record.id),
                });
            }
            return Ok(InvestmentSnapshot {
                id: record.id,
                name: record.name,
                investment_type: record.investment_type,
                start_date,
                kind: InvestmentKind::Simple,
            });
        }

        let skipped_months = record
            .skipped_months
            .iter()
            .map(|m| m.parse::<MonthKey>())
            .collect::<Result<BTreeSet<_>>>()?;

        let contribution_history = record
            .contribution_history
            .iter()
            .map(|change| {
                Ok(ContributionChange {
                    effective_date: parse_date(&change.effective_date)?,
                    amount: change.amount,
                    reason: change.reason.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let paused_since = if record.is_paused {
            Some(InvestmentRecord::optional_date(&record.paused_since)?.unwrap_or(start_date))
        } else {
            None
        };

        let plan = RecurringPlan {
            amount: record.recurring_amount.unwrap_or(Money::ZERO),
            frequency: record.recurring_frequency.unwrap_or(RecurringFrequency::Monthly),
            interest_rate: Rate::from_percentage_decimal(record.interest_rate.unwrap_or(Decimal::ZERO)),
            rate_type: record.interest_rate_type.unwrap_or(InterestRateType::Fixed),
            maturity_date: InvestmentRecord::optional_date(&record.maturity_date)?,
            paused_since,
            skipped_months,
            contribution_history,
        };

        let kind = match record.investment_type {
            InvestmentType::Ppf => InvestmentKind::SchemeGoverned {
                plan,
                annual_limit: record.annual_limit,
                config: record.scheme_config,
            },
            _ => InvestmentKind::Recurring(plan),
        };

        Ok(InvestmentSnapshot {
            id: record.id,
            name: record.name,
            investment_type: record.investment_type,
            start_date,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
    }

    fn recurring_record() -> InvestmentRecord {
        let mut record = InvestmentRecord::simple(Uuid::new_v4(), "Index SIP", InvestmentType::Sip, created());
        record.is_recurring = true;
        record.recurring_amount = Some(Money::from_major(1_000));
        record.recurring_frequency = Some(RecurringFrequency::Monthly);
        record.interest_rate = Some(dec!(12));
        record.start_date = Some("2024-01-15".to_string());
        record
    }

    #[test]
    fn test_simple_record_converts_to_simple_kind() {
        let record = InvestmentRecord::simple(Uuid::new_v4(), "Shares", InvestmentType::Stock, created());
        let snapshot = InvestmentSnapshot::try_from(record).unwrap();

        assert_eq!(snapshot.kind, InvestmentKind::Simple);
        assert!(!snapshot.is_recurring());
        // falls back to creation date
        assert_eq!(snapshot.start_date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    }

    #[test]
    fn test_recurring_record_conversion() {
        let mut record = recurring_record();
        record.skipped_months = vec!["2024-03".to_string()];
        record.contribution_history = vec![ContributionChangeRecord {
            effective_date: "01/06/2024".to_string(),
            amount: Money::from_major(1_500),
            reason: Some("salary hike".to_string()),
        }];

        let snapshot = InvestmentSnapshot::try_from(record).unwrap();
        let plan = snapshot.plan().unwrap();

        assert_eq!(plan.interest_rate, Rate::from_percentage(12));
        assert!(plan.skipped_months.contains(&MonthKey::new(2024, 3).unwrap()));
        assert_eq!(
            plan.contribution_history[0].effective_date,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(matches!(snapshot.kind, InvestmentKind::Recurring(_)));
    }

    #[test]
    fn test_unparseable_history_date_is_rejected() {
        let mut record = recurring_record();
        record.contribution_history = vec![ContributionChangeRecord {
            effective_date: "sometime in june".to_string(),
            amount: Money::from_major(1_500),
            reason: None,
        }];

        let err = InvestmentSnapshot::try_from(record).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidDate { .. }));
    }

    #[test]
    fn test_scheme_config_on_non_recurring_is_rejected() {
        let mut record = InvestmentRecord::simple(Uuid::new_v4(), "PPF", InvestmentType::Ppf, created());
        record.scheme_config = Some(SchemeConfig::default());

        let err = InvestmentSnapshot::try_from(record).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_pause_without_date_starts_at_start_date() {
        let mut record = recurring_record();
        record.is_paused = true;

        let snapshot = InvestmentSnapshot::try_from(record).unwrap();
        assert_eq!(
            snapshot.plan().unwrap().paused_since,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_ppf_record_is_scheme_governed() {
        let mut record = recurring_record();
        record.investment_type = InvestmentType::Ppf;
        record.annual_limit = Some(Money::from_major(150_000));

        let snapshot = InvestmentSnapshot::try_from(record).unwrap();
        match snapshot.kind {
            InvestmentKind::SchemeGoverned { annual_limit, config, .. } => {
                assert_eq!(annual_limit, Some(Money::from_major(150_000)));
                assert!(config.is_none());
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "id": "6f1c1f7e-8a57-4d55-9a43-4d1f0a6f7c11",
            "name": "Quarterly RD",
            "type": "RECURRING_DEPOSIT",
            "isRecurring": true,
            "recurringAmount": "3000",
            "recurringFrequency": "QUARTERLY",
            "interestRate": "6.5",
            "startDate": "2023-04-01",
            "skippedMonths": ["2023-07"],
            "createdAt": "2023-04-01T00:00:00Z"
        }"#;

        let snapshot = InvestmentSnapshot::from_json(json).unwrap();
        let plan = snapshot.plan().unwrap();

        assert_eq!(plan.frequency, RecurringFrequency::Quarterly);
        assert_eq!(plan.amount, Money::from_major(3_000));
        assert_eq!(plan.interest_rate, Rate::from_percentage_decimal(dec!(6.5)));
        assert_eq!(plan.skipped_months.len(), 1);
    }
}
