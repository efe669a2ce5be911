pub mod config;
pub mod contribution;
pub mod dates;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod interest;
pub mod investment;
pub mod ledger;
pub mod projection;
pub mod result;
pub mod store;
pub mod strategy;
pub mod types;

// re-export key types
pub use config::{
    check_configuration, ensure_config, validate_configuration, DepositEntry, RateChange,
    RecurringConfig, SchemeConfig,
};
pub use contribution::{resolve_contribution, ContributionResolver};
pub use dates::{month_key, parse_date, MonthKey};
pub use decimal::{Money, Rate};
pub use engine::{calculate, calculate_current_value, calculate_recurring_investment, ValuationEngine};
pub use errors::{Result, ValuationError};
pub use interest::{AnnualCrediting, CreditingPolicy, LedgerState, MonthlyCompounding, RateSchedule};
pub use investment::{
    ContributionChange, InvestmentKind, InvestmentRecord, InvestmentSnapshot, RecurringPlan,
};
pub use ledger::{Ledger, LedgerSimulator};
pub use projection::MaturityProjection;
pub use result::{CalculationResult, MonthlyContribution, SchemeSummary};
pub use store::{InMemoryStore, InvestmentStore};
pub use strategy::{GenericStrategy, SchemeStrategy, Strategy, ValuationStrategy};
pub use types::{
    ContributionStatus, InterestRateType, InvestmentId, InvestmentType, RecurringFrequency,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
