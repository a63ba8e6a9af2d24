//! LANDC Economics Engine
//!
//! Turns oracle-attested fiat movements into token movements and pays the
//! accumulated rent back out to buyers every month.
//!
//! - [`exchange`]: buy, sell, rent conversion and rent payment
//! - [`distribution`]: monthly distribution, linear vesting, claims and the
//!   maintenance fee accumulator
//! - [`calendar`]: canonical UTC month starts
//! - [`events`]: the record every successful transition leaves behind
//!
//! Engines operate on a borrowed [`lib_tokens::AccountLedger`]. They check
//! every precondition before the first write, so a returned error means no
//! balance moved.

pub mod calendar;
pub mod distribution;
pub mod errors;
pub mod events;
pub mod exchange;

pub use calendar::{MonthCalendar, DEFAULT_GENESIS_MONTH_START};
pub use distribution::{
    accrued_amount, ClaimState, Distribution, DistributionEngine, VESTING_HORIZON_SECS,
    VESTING_HOURS,
};
pub use errors::{EconomyError, EconomyResult};
pub use events::LedgerEvent;
pub use exchange::{BuyQuote, ExchangeEngine, BUY_BURN_BPS};
