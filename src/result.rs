//! Calculation output handed back to callers.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::MonthKey;
use crate::decimal::{Money, Rate};
use crate::ledger::Ledger;
use crate::projection::MaturityProjection;
use crate::types::ContributionStatus;

/// one month of the simulated ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyContribution {
    pub month: MonthKey,
    pub contribution: Money,
    pub interest_rate: Rate,
    /// interest earned this month, whether or not it was credited
    pub interest: Money,
    pub balance: Money,
    pub status: ContributionStatus,
}

/// scheme-specific figures reported alongside the valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSummary {
    pub annual_limit: Money,
    pub annual_limit_used: Money,
    /// may go negative when deposits breach the limit
    pub annual_limit_remaining: Money,
    pub accrued_interest: Money,
    pub credited_interest: Money,
    pub current_rate: Rate,
    pub opening_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub next_crediting_month: Option<MonthKey>,
    pub configuration_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub total_invested: Money,
    /// number of contributions made
    pub total_quantity: Decimal,
    /// mean contribution
    pub average_price: Money,
    pub current_value: Money,
    pub profit_loss: Money,
    pub profit_loss_percentage: Decimal,
    pub total_recurring_contributions: u32,
    pub projected_maturity_value: Option<Money>,
    pub years_to_maturity: Option<Decimal>,
    pub months_skipped: u32,
    pub months_paused: u32,
    pub monthly_breakdown: Vec<MonthlyContribution>,
    pub scheme: Option<SchemeSummary>,
}

impl CalculationResult {
    /// result for an investment with nothing to value
    pub fn zeroed() -> Self {
        Self {
            total_invested: Money::ZERO,
            total_quantity: Decimal::ZERO,
            average_price: Money::ZERO,
            current_value: Money::ZERO,
            profit_loss: Money::ZERO,
            profit_loss_percentage: Decimal::ZERO,
            total_recurring_contributions: 0,
            projected_maturity_value: None,
            years_to_maturity: None,
            months_skipped: 0,
            months_paused: 0,
            monthly_breakdown: Vec::new(),
            scheme: None,
        }
    }

    /// summarise a simulated ledger
    pub fn from_ledger(ledger: Ledger, months_skipped: u32) -> Self {
        let total_invested = ledger.total_invested();
        let current_value = ledger.closing_value();
        let profit_loss = current_value - total_invested;
        let contributions = ledger.contributions_made();

        let average_price = if contributions == 0 {
            Money::ZERO
        } else {
            total_invested / Decimal::from(contributions)
        };

        Self {
            total_invested,
            total_quantity: Decimal::from(contributions),
            average_price,
            current_value,
            profit_loss,
            profit_loss_percentage: profit_loss.percentage_of(total_invested),
            total_recurring_contributions: contributions,
            projected_maturity_value: None,
            years_to_maturity: None,
            months_skipped,
            months_paused: ledger.months_with_status(ContributionStatus::Paused),
            monthly_breakdown: ledger.entries,
            scheme: None,
        }
    }

    pub fn with_projection(mut self, projection: Option<MaturityProjection>) -> Self {
        if let Some(projection) = projection {
            self.projected_maturity_value = Some(projection.projected_value);
            self.years_to_maturity = Some(projection.years_to_maturity);
        }
        self
    }

    pub fn with_scheme(mut self, summary: SchemeSummary) -> Self {
        self.scheme = Some(summary);
        self
    }

    /// breakdown entry for `month`
    pub fn month(&self, month: MonthKey) -> Option<&MonthlyContribution> {
        self.monthly_breakdown.iter().find(|e| e.month == month)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
