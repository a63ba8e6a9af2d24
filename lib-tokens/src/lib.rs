//! LANDC Token Ledger
//!
//! This crate owns the fungible-unit bookkeeping of the LANDC ledger.
//!
//! # Key Types
//!
//! - [`TokenContract`]: token metadata, pool identities and supply counters
//! - [`AccountLedger`]: balances, the forced reserve allowance, burn
//! - [`BuyerRegistry`]: ordered set of identities that have ever bought
//!
//! # Pricing
//!
//! [`current_price`] derives the exchange price from supply state:
//! `initial_supply / total_supply`, so the price only rises as supply burns.
//!
//! # Execution
//!
//! Use [`apply_token_transfer`] to move balances with full validation.

pub mod buyers;
pub mod contract;
pub mod errors;
pub mod ledger;
pub mod price;
pub mod transfer;

pub use buyers::BuyerRegistry;
pub use contract::{PoolSet, TokenContract, DEFAULT_DECIMALS, DEFAULT_INITIAL_SUPPLY, DEFAULT_NAME, DEFAULT_SYMBOL};
pub use errors::{TokenError, TokenResult};
pub use ledger::AccountLedger;
pub use price::{current_price, price_after_burn, tokens_for_usd};
pub use transfer::{apply_token_transfer, BalanceStore, TransferResult};
