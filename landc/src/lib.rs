//! LANDC ledger service
//!
//! Wires the token ledger, oracle book, exchange and distribution engines
//! into one serialized state machine.
//!
//! - [`Ledger`]: thread-safe handle; every operation is one atomic command
//! - [`LedgerCommand`]: serializable form of every mutating operation
//! - [`LandcConfig`]: TOML configuration
//! - [`replay`]: drive a ledger from a JSON Lines command log

pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod replay;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{CommandOutcome, LedgerCommand};
pub use config::{load_config, load_config_strict, LandcConfig};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{Ledger, LedgerSummary};
pub use logging::init_tracing;
pub use state::LedgerState;
