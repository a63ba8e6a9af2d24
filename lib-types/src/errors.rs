//! Arithmetic errors for fixed-point ledger math

use thiserror::Error;

/// Checked arithmetic failure. Ledger math never wraps or saturates.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Arithmetic underflow")]
    Underflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;
