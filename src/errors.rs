use thiserror::Error;

use crate::decimal::Money;
use crate::types::InvestmentId;

#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("investment not found: {id}")]
    InvestmentNotFound {
        id: InvestmentId,
    },

    #[error("investment is not recurring: {id}")]
    NotRecurring {
        id: InvestmentId,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ValuationError>;
