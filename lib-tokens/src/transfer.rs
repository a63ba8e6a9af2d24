//! Balance Transfer Execution
//!
//! `apply_token_transfer` is the single path through which balances move
//! between accounts. It validates first and mutates only once every check
//! has passed, so a failed transfer leaves the store untouched.

use std::collections::BTreeMap;

use lib_types::{Address, Amount};

use crate::errors::{TokenError, TokenResult};

/// Minimal balance storage needed by a transfer
pub trait BalanceStore {
    /// Balance of an address (zero if never credited)
    fn balance(&self, address: &Address) -> Amount;

    /// Overwrite the balance of an address
    fn set_balance(&mut self, address: &Address, amount: Amount);
}

/// Accounts are never removed; a zero balance stays in the map.
impl BalanceStore for BTreeMap<Address, Amount> {
    fn balance(&self, address: &Address) -> Amount {
        self.get(address).copied().unwrap_or(0)
    }

    fn set_balance(&mut self, address: &Address, amount: Amount) {
        self.insert(*address, amount);
    }
}

/// Result of a successful transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResult {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
    /// Sender balance after the transfer
    pub from_balance: Amount,
    /// Recipient balance after the transfer
    pub to_balance: Amount,
}

/// Apply a balance transfer with full validation
///
/// # Enforcement
///
/// - **Amount > 0**: zero transfers are rejected
/// - **Sufficient balance**: `amount <= balance(from)`
/// - **No overflow**: the recipient credit is checked before any write
///
/// A self-transfer is a validated no-op.
pub fn apply_token_transfer(
    store: &mut dyn BalanceStore,
    from: Address,
    to: Address,
    amount: Amount,
) -> TokenResult<TransferResult> {
    if amount == 0 {
        return Err(TokenError::ZeroAmount);
    }

    let from_balance = store.balance(&from);
    if from_balance < amount {
        return Err(TokenError::InsufficientBalance {
            have: from_balance,
            need: amount,
        });
    }

    if from == to {
        return Ok(TransferResult {
            from,
            to,
            amount,
            from_balance,
            to_balance: from_balance,
        });
    }

    let new_from_balance = lib_types::checked_sub(from_balance, amount)?;
    let new_to_balance = lib_types::checked_add(store.balance(&to), amount)?;

    store.set_balance(&from, new_from_balance);
    store.set_balance(&to, new_to_balance);

    Ok(TransferResult {
        from,
        to,
        amount,
        from_balance: new_from_balance,
        to_balance: new_to_balance,
    })
}
