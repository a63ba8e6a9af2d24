//! LANDC ledger primitives.
//! Stable, behavior-free building blocks shared by every ledger crate.
//!
//! Rule: all monetary quantities are `u128` integers scaled by 10^18.

pub mod errors;
pub mod fixed_point;
pub mod primitives;

pub use errors::{ArithmeticError, ArithmeticResult};
pub use fixed_point::{bps_of, checked_add, checked_sub, mul_div, wad_div, wad_mul, whole, BPS_DENOMINATOR, DECIMALS, WAD};
pub use primitives::{Address, Amount, Bps, ExternalId, PropertyId, Timestamp, SECONDS_PER_HOUR};
