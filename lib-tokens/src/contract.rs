//! TokenContract
//!
//! Token metadata, the two reserved pool identities and the supply counters.
//! Balances live in [`crate::AccountLedger`]; this struct only carries the
//! scalars every balance operation is checked against.

use serde::{Deserialize, Serialize};

use lib_types::{whole, Address, Amount};

use crate::errors::{TokenError, TokenResult};

// =============================================================================
// CONSTANTS
// =============================================================================

pub const DEFAULT_NAME: &str = "Landing Token";

pub const DEFAULT_SYMBOL: &str = "LANDC";

/// Display decimals; amounts are always scaled by 10^18
pub const DEFAULT_DECIMALS: u8 = 18;

/// Default mint: one trillion whole tokens
pub const DEFAULT_INITIAL_SUPPLY: Amount = whole(1_000_000_000_000);

// =============================================================================
// POOLS
// =============================================================================

/// The two distinguished ledger accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSet {
    /// Holds unsold supply; source and sink for buys, sells and rent conversions
    pub reserve: Address,
    /// Accumulates converted rent and maintenance fees; source for payouts
    pub rent: Address,
}

impl PoolSet {
    pub fn new(reserve: Address, rent: Address) -> TokenResult<Self> {
        if reserve == rent {
            return Err(TokenError::InvalidConfig(
                "reserve and rent pools must be distinct".to_string(),
            ));
        }
        Ok(Self { reserve, rent })
    }

    /// Check if an address is one of the pools
    pub fn contains(&self, address: &Address) -> bool {
        *address == self.reserve || *address == self.rent
    }
}

// =============================================================================
// TOKEN CONTRACT
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenContract {
    // =========================================================================
    // Metadata
    // =========================================================================
    pub name: String,
    pub symbol: String,
    pub decimals: u8,

    // =========================================================================
    // Accounts
    // =========================================================================
    pub pools: PoolSet,

    // =========================================================================
    // Supply State
    // =========================================================================
    /// Amount minted into the reserve at construction. Never changes.
    initial_supply: Amount,
    /// Current supply; only decreases, and only by burn
    total_supply: Amount,
    /// Cumulative burned amount
    total_burned: Amount,
}

impl TokenContract {
    /// Create a new token contract with the full supply outstanding
    pub fn new(
        name: String,
        symbol: String,
        decimals: u8,
        pools: PoolSet,
        initial_supply: Amount,
    ) -> TokenResult<Self> {
        if initial_supply == 0 {
            return Err(TokenError::InvalidConfig(
                "initial supply must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            name,
            symbol,
            decimals,
            pools,
            initial_supply,
            total_supply: initial_supply,
            total_burned: 0,
        })
    }

    /// LANDC contract with default metadata
    pub fn landc(pools: PoolSet, initial_supply: Amount) -> TokenResult<Self> {
        Self::new(
            DEFAULT_NAME.to_string(),
            DEFAULT_SYMBOL.to_string(),
            DEFAULT_DECIMALS,
            pools,
            initial_supply,
        )
    }

    pub fn initial_supply(&self) -> Amount {
        self.initial_supply
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn total_burned(&self) -> Amount {
        self.total_burned
    }

    /// Check if an address is one of the reserved pools
    pub fn is_pool(&self, address: &Address) -> bool {
        self.pools.contains(address)
    }

    /// Record a burn against the supply counters
    pub(crate) fn record_burn(&mut self, amount: Amount) -> TokenResult<()> {
        let total_supply = lib_types::checked_sub(self.total_supply, amount)?;
        let total_burned = lib_types::checked_add(self.total_burned, amount)?;
        self.total_supply = total_supply;
        self.total_burned = total_burned;
        Ok(())
    }

    /// Supply bookkeeping invariant: initial == total + burned
    pub fn is_valid(&self) -> bool {
        self.total_supply
            .checked_add(self.total_burned)
            .map(|sum| sum == self.initial_supply)
            .unwrap_or(false)
    }
}
