//! Ledger service errors

use lib_economy::EconomyError;
use lib_oracle::OracleError;
use lib_tokens::TokenError;
use lib_types::{Address, ArithmeticError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Economy(#[from] EconomyError),

    #[error("Unauthorized: {0:?} does not hold the required role")]
    Unauthorized(Address),

    #[error("Property registry error: {0}")]
    Registry(String),

    // Configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load config from {path}: {reason}")]
    ConfigLoadFailed { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // Command log
    #[error("Invalid command on line {line}: {reason}")]
    InvalidCommand { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TokenError> for LedgerError {
    fn from(err: TokenError) -> Self {
        LedgerError::Economy(err.into())
    }
}

impl From<OracleError> for LedgerError {
    fn from(err: OracleError) -> Self {
        LedgerError::Economy(err.into())
    }
}

impl From<ArithmeticError> for LedgerError {
    fn from(err: ArithmeticError) -> Self {
        LedgerError::Economy(err.into())
    }
}

impl LedgerError {
    /// Underlying economy error, if any
    pub fn economy(&self) -> Option<&EconomyError> {
        match self {
            LedgerError::Economy(err) => Some(err),
            _ => None,
        }
    }

    pub fn oracle(&self) -> Option<&OracleError> {
        match self.economy() {
            Some(EconomyError::Oracle(err)) => Some(err),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&TokenError> {
        match self.economy() {
            Some(EconomyError::Token(err)) => Some(err),
            _ => None,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
