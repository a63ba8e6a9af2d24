//! 18-decimal fixed-point arithmetic
//!
//! Every quotient rounds toward zero exactly once: products are formed in a
//! 256-bit intermediate so `a * b / d` never loses precision before the final
//! division, and never wraps.

use primitive_types::U256;

use crate::errors::{ArithmeticError, ArithmeticResult};
use crate::primitives::{Amount, Bps};

/// Number of fractional decimal digits carried by every amount
pub const DECIMALS: u8 = 18;

/// Fixed-point scale (10^18 = 1.0)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Basis point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Scale a whole-unit quantity to fixed point
pub const fn whole(units: u64) -> Amount {
    units as u128 * WAD
}

/// Compute `floor(a * b / d)` through a 256-bit intermediate
pub fn mul_div(a: u128, b: u128, d: u128) -> ArithmeticResult<u128> {
    if d == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    let quotient = U256::from(a) * U256::from(b) / U256::from(d);
    if quotient.bits() > 128 {
        return Err(ArithmeticError::Overflow);
    }
    Ok(quotient.low_u128())
}

/// Fixed-point multiply: `floor(a * b / WAD)`
pub fn wad_mul(a: u128, b: u128) -> ArithmeticResult<u128> {
    mul_div(a, b, WAD)
}

/// Fixed-point divide: `floor(a * WAD / b)`
pub fn wad_div(a: u128, b: u128) -> ArithmeticResult<u128> {
    mul_div(a, WAD, b)
}

/// `floor(amount * bps / 10000)`
pub fn bps_of(amount: Amount, bps: Bps) -> ArithmeticResult<Amount> {
    mul_div(amount, bps as u128, BPS_DENOMINATOR)
}

pub fn checked_add(a: Amount, b: Amount) -> ArithmeticResult<Amount> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

pub fn checked_sub(a: Amount, b: Amount) -> ArithmeticResult<Amount> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow)
}
