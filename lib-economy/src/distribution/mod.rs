//! Monthly Distribution
//!
//! Pull-based payout of rent pool tokens to buyers. A distribution is
//! configured once per calendar month; each buyer registered at that moment
//! is entitled to an equal share, which vests linearly over 744 hours.

pub mod core;
pub mod types;
pub mod vesting;

pub use self::core::DistributionEngine;
pub use types::{ClaimState, Distribution};
pub use vesting::{accrued_amount, VESTING_HORIZON_SECS, VESTING_HOURS};
