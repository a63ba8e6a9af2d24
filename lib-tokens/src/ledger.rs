//! Account Ledger
//!
//! Balances for every identity, the forced reserve allowance, third-party
//! allowances and burn.
//!
//! # Invariants
//!
//! - **Allowance mirror**: for every holder that is not a pool,
//!   `allowance(holder, reserve) == balance(holder)`. The allowance is never
//!   stored; it is projected from the balance on read, and any attempt to set
//!   it fails with [`TokenError::AllowanceLocked`].
//! - **Supply conservation**: `total_supply == sum(balances)`. Transfers move
//!   value; only [`AccountLedger::burn`] removes it, and only from the reserve.
//! - **No deletion**: accounts are created on first credit and never removed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use lib_types::{Address, Amount};

use crate::buyers::BuyerRegistry;
use crate::contract::TokenContract;
use crate::errors::{TokenError, TokenResult};
use crate::transfer::{apply_token_transfer, BalanceStore, TransferResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    contract: TokenContract,
    balances: BTreeMap<Address, Amount>,
    /// owner -> spender -> amount, never keyed by the reserve pool
    allowances: BTreeMap<Address, BTreeMap<Address, Amount>>,
    buyers: BuyerRegistry,
}

impl AccountLedger {
    /// Create a ledger with the full initial supply minted into the reserve
    pub fn new(contract: TokenContract) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(contract.pools.reserve, contract.initial_supply());
        balances.insert(contract.pools.rent, 0);

        Self {
            contract,
            balances,
            allowances: BTreeMap::new(),
            buyers: BuyerRegistry::new(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn contract(&self) -> &TokenContract {
        &self.contract
    }

    pub fn reserve_pool(&self) -> Address {
        self.contract.pools.reserve
    }

    pub fn rent_pool(&self) -> Address {
        self.contract.pools.rent
    }

    pub fn total_supply(&self) -> Amount {
        self.contract.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.balance(account)
    }

    /// Allowance granted by `owner` to `spender`
    ///
    /// Toward the reserve pool this is the owner's balance for every holder
    /// and zero for the pools themselves.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        if *spender == self.reserve_pool() {
            return self.allowance_to_pool(owner);
        }
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Forced self-approval of a holder toward the reserve pool
    pub fn allowance_to_pool(&self, holder: &Address) -> Amount {
        if self.contract.is_pool(holder) {
            return 0;
        }
        self.balance_of(holder)
    }

    pub fn buyers(&self) -> &BuyerRegistry {
        &self.buyers
    }

    pub fn total_buyers(&self) -> u64 {
        self.buyers.len()
    }

    pub fn is_buyer(&self, holder: &Address) -> bool {
        self.buyers.contains(holder)
    }

    /// Sum of every balance, checked
    pub fn sum_of_balances(&self) -> TokenResult<Amount> {
        self.balances
            .values()
            .try_fold(0u128, |acc, balance| lib_types::checked_add(acc, *balance))
            .map_err(TokenError::from)
    }

    /// Verify supply conservation
    pub fn check_conservation(&self) -> TokenResult<()> {
        let sum = self.sum_of_balances()?;
        if sum != self.total_supply() || !self.contract.is_valid() {
            return Err(TokenError::ConservationViolated(format!(
                "sum(balances) = {}, total_supply = {}, total_burned = {}",
                sum,
                self.total_supply(),
                self.contract.total_burned()
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Balance movement
    // =========================================================================

    /// Move `amount` between any two accounts, pools included
    ///
    /// This is the system path used by the exchange and distribution engines.
    /// Holder-initiated movements go through [`Self::holder_transfer`].
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> TokenResult<TransferResult> {
        apply_token_transfer(&mut self.balances, from, to, amount)
    }

    /// Holder-initiated transfer. Pools cannot be debited this way.
    pub fn holder_transfer(&mut self, from: Address, to: Address, amount: Amount) -> TokenResult<TransferResult> {
        if self.contract.is_pool(&from) {
            return Err(TokenError::PoolAccount(from));
        }
        self.transfer(from, to, amount)
    }

    /// Spend a third-party allowance granted by `owner` to `spender`
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> TokenResult<TransferResult> {
        if self.contract.is_pool(&owner) {
            return Err(TokenError::PoolAccount(owner));
        }
        if spender == self.reserve_pool() {
            return Err(TokenError::Unauthorized(
                "the reserve pool spends only through exchange operations".to_string(),
            ));
        }

        let allowance = self.allowance(&owner, &spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                have: allowance,
                need: amount,
            });
        }

        let result = self.transfer(owner, to, amount)?;
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, allowance - amount);
        Ok(result)
    }

    /// Grant a third-party allowance
    ///
    /// # Errors
    /// - `AllowanceLocked` if `spender` is the reserve pool
    /// - `PoolAccount` if `owner` is a pool
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> TokenResult<()> {
        if spender == self.reserve_pool() {
            return Err(TokenError::AllowanceLocked);
        }
        if self.contract.is_pool(&owner) {
            return Err(TokenError::PoolAccount(owner));
        }
        self.allowances.entry(owner).or_default().insert(spender, amount);
        Ok(())
    }

    /// Permanently remove `amount` from the reserve and from total supply
    ///
    /// Never touches any other account.
    pub fn burn(&mut self, amount: Amount) -> TokenResult<()> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }

        let reserve = self.reserve_pool();
        let balance = self.balance_of(&reserve);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: balance,
                need: amount,
            });
        }

        let mut contract = self.contract.clone();
        contract.record_burn(amount)?;
        self.contract = contract;
        self.balances.set_balance(&reserve, balance - amount);

        debug!(
            amount,
            total_supply = self.contract.total_supply(),
            "burned from reserve"
        );
        Ok(())
    }

    /// Add a buyer to the registry. Returns false if already registered.
    pub fn register_buyer(&mut self, buyer: Address) -> bool {
        self.buyers.register(buyer)
    }
}
