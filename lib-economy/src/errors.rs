//! Economy Errors

use lib_oracle::OracleError;
use lib_tokens::TokenError;
use lib_types::{Address, Amount, ArithmeticError, Timestamp};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("Month {month} is not the active month start (expected {expected})")]
    InvalidPeriod { month: Timestamp, expected: Timestamp },

    #[error("Distribution for month {0} already configured")]
    AlreadyConfigured(Timestamp),

    #[error("Nothing to claim for {holder:?} in month {month}")]
    NothingToClaim { holder: Address, month: Timestamp },

    #[error("Unauthorized: {0:?} does not hold the required role")]
    Unauthorized(Address),

    #[error("Maintenance accumulator holds {available}, requested {requested}")]
    InsufficientAccumulator { available: Amount, requested: Amount },

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("Timestamp {0} is outside the supported calendar range")]
    InvalidTimestamp(Timestamp),
}

impl EconomyError {
    /// Oracle record missing, already used or disagreeing with the caller
    pub fn is_oracle_rejection(&self) -> bool {
        matches!(self, EconomyError::Oracle(_))
    }
}

/// Result type for economy operations
pub type EconomyResult<T> = Result<T, EconomyError>;
