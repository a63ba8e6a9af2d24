//! LANDC Oracle Feed
//!
//! A trusted off-ledger process attests that a fiat transaction happened by
//! recording `(kind, external_id, usd_amount)`. The ledger consumes each
//! record exactly once to authorize the matching buy, sell or rent
//! conversion.
//!
//! # Anti-replay
//!
//! - A record is removed from the pending set on consumption.
//! - A consumed `(kind, external_id)` can never be recorded again.
//! - With a TTL configured, stale records are treated as absent.

pub mod book;
pub mod errors;
pub mod types;

pub use book::{OracleBook, OracleFeed};
pub use errors::{OracleError, OracleResult};
pub use types::{OracleConfig, OracleKind, OracleRecord};
