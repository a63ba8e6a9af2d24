//! Token Ledger Errors

use lib_types::{Address, Amount, ArithmeticError};
use thiserror::Error;

/// Error during ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("Allowance to the reserve pool is derived from balance and cannot be set")]
    AllowanceLocked,

    #[error("Zero amount not allowed")]
    ZeroAmount,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Pool account {0:?} cannot act as a holder")]
    PoolAccount(Address),

    #[error("Invalid token configuration: {0}")]
    InvalidConfig(String),

    #[error("Conservation invariant violated: {0}")]
    ConservationViolated(String),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;
