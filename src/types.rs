use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for an investment record
pub type InvestmentId = Uuid;

/// instrument kinds tracked by the portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentType {
    Stock,
    MutualFund,
    Sip,
    FixedDeposit,
    RecurringDeposit,
    /// public provident fund, a 15-year lock-in savings scheme
    Ppf,
    Epf,
    Nps,
    Bond,
    Gold,
    RealEstate,
    Crypto,
    Other,
}

/// how often a recurring contribution falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl RecurringFrequency {
    /// number of months between due contributions
    pub fn months(&self) -> u32 {
        match self {
            RecurringFrequency::Monthly => 1,
            RecurringFrequency::Quarterly => 3,
            RecurringFrequency::Yearly => 12,
        }
    }
}

/// how the declared rate is described by the record.
///
/// Informational only: valuation always applies the plan's declared rate
/// (or the scheme's rate history), whatever the type says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestRateType {
    Fixed,
    Variable,
}

/// outcome of a single simulated month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    /// contribution applied (may be zero on a non-due month)
    Contributed,
    /// user marked the month as skipped
    Skipped,
    /// month falls on or after the pause date
    Paused,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_months() {
        assert_eq!(RecurringFrequency::Monthly.months(), 1);
        assert_eq!(RecurringFrequency::Quarterly.months(), 3);
        assert_eq!(RecurringFrequency::Yearly.months(), 12);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&InvestmentType::MutualFund).unwrap(), "\"MUTUAL_FUND\"");
        assert_eq!(serde_json::to_string(&ContributionStatus::Skipped).unwrap(), "\"skipped\"");
        let freq: RecurringFrequency = serde_json::from_str("\"QUARTERLY\"").unwrap();
        assert_eq!(freq, RecurringFrequency::Quarterly);
    }
}
