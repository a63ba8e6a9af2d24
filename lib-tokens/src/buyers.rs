//! Buyer Registry
//!
//! Ordered set of every identity that has ever completed a buy. Join order
//! is recorded so a later snapshot can be expressed as a prefix length: an
//! identity belonged to a snapshot of size `B` iff its ordinal is `< B`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lib_types::Address;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuyerRegistry {
    /// Buyers in join order
    order: Vec<Address>,
    /// Buyer -> position in `order`
    ordinals: BTreeMap<Address, u64>,
}

impl BuyerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buyer. Returns false if already present.
    pub fn register(&mut self, buyer: Address) -> bool {
        if self.ordinals.contains_key(&buyer) {
            return false;
        }
        self.ordinals.insert(buyer, self.order.len() as u64);
        self.order.push(buyer);
        true
    }

    pub fn contains(&self, buyer: &Address) -> bool {
        self.ordinals.contains_key(buyer)
    }

    /// Position at which the buyer joined
    pub fn ordinal(&self, buyer: &Address) -> Option<u64> {
        self.ordinals.get(buyer).copied()
    }

    /// Number of distinct buyers
    pub fn len(&self) -> u64 {
        self.order.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the buyer was registered when the registry had `snapshot_len` members
    pub fn was_member_at(&self, buyer: &Address, snapshot_len: u64) -> bool {
        self.ordinal(buyer)
            .map(|ordinal| ordinal < snapshot_len)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(id: u8) -> Address {
        Address::new([id; 32])
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = BuyerRegistry::new();
        assert!(registry.register(addr(1)));
        assert!(!registry.register(addr(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_membership_by_join_order() {
        let mut registry = BuyerRegistry::new();
        registry.register(addr(1));
        registry.register(addr(2));
        let snapshot = registry.len();
        registry.register(addr(3));

        assert!(registry.was_member_at(&addr(1), snapshot));
        assert!(registry.was_member_at(&addr(2), snapshot));
        assert!(!registry.was_member_at(&addr(3), snapshot));
        assert!(!registry.was_member_at(&addr(4), snapshot));
    }
}
