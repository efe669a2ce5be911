pub mod generic;
pub mod scheme;

use chrono::NaiveDate;

use crate::investment::InvestmentSnapshot;
use crate::result::CalculationResult;
use crate::types::InvestmentType;

pub use generic::GenericStrategy;
pub use scheme::SchemeStrategy;

/// values one investment as of a given day
pub trait ValuationStrategy {
    /// `None` when the strategy does not apply to this snapshot
    fn calculate(&self, snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult>;

    fn name(&self) -> &'static str;
}

/// every strategy the engine knows about
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Generic(GenericStrategy),
    Scheme(SchemeStrategy),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Generic(GenericStrategy::new())
    }
}

impl ValuationStrategy for Strategy {
    fn calculate(&self, snapshot: &InvestmentSnapshot, today: NaiveDate) -> Option<CalculationResult> {
        match self {
            Strategy::Generic(strategy) => strategy.calculate(snapshot, today),
            Strategy::Scheme(strategy) => strategy.calculate(snapshot, today),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Strategy::Generic(strategy) => strategy.name(),
            Strategy::Scheme(strategy) => strategy.name(),
        }
    }
}

/// specialised strategy registered for `investment_type`, if any
pub fn select(investment_type: InvestmentType) -> Option<SchemeStrategy> {
    match investment_type {
        InvestmentType::Ppf => Some(SchemeStrategy::provident_fund()),
        _ => None,
    }
}

/// strategy for `investment_type`, falling back to the generic engine
pub fn strategy_for(investment_type: InvestmentType) -> Strategy {
    select(investment_type)
        .map(Strategy::Scheme)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_provident_fund_is_registered() {
        assert!(select(InvestmentType::Ppf).is_some());
        assert!(select(InvestmentType::Sip).is_none());
        assert!(select(InvestmentType::RecurringDeposit).is_none());
    }

    #[test]
    fn test_fallback_to_generic() {
        assert!(matches!(strategy_for(InvestmentType::MutualFund), Strategy::Generic(_)));
        assert!(matches!(strategy_for(InvestmentType::Ppf), Strategy::Scheme(_)));
        assert_eq!(strategy_for(InvestmentType::Gold).name(), "generic recurring");
    }
}
