use serde::{Deserialize, Serialize};

use lib_types::{Amount, Timestamp};

/// Immutable once created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Canonical UTC month start this distribution belongs to
    pub month: Timestamp,
    pub distribution_amount: Amount,
    pub maintenance_amount: Amount,
    /// Buyer registry size when the distribution was configured
    pub buyer_snapshot: u64,
    /// `distribution_amount / buyer_snapshot`, zero when there were no buyers
    pub per_buyer_share: Amount,
    pub configured_at: Timestamp,
}

impl Distribution {
    pub fn new(
        month: Timestamp,
        distribution_amount: Amount,
        maintenance_amount: Amount,
        buyer_snapshot: u64,
        configured_at: Timestamp,
    ) -> Self {
        let per_buyer_share = if buyer_snapshot == 0 {
            0
        } else {
            distribution_amount / Amount::from(buyer_snapshot)
        };
        Self {
            month,
            distribution_amount,
            maintenance_amount,
            buyer_snapshot,
            per_buyer_share,
            configured_at,
        }
    }
}

/// Per `(holder, month)` claim progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimState {
    pub claimed: Amount,
    /// Accrual baseline: the month start until the first claim, then the
    /// time of the latest claim
    pub last_accrual_time: Timestamp,
}

impl ClaimState {
    pub fn unclaimed(month: Timestamp) -> Self {
        Self {
            claimed: 0,
            last_accrual_time: month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::whole;

    #[test]
    fn test_equal_split() {
        let d = Distribution::new(0, whole(98), whole(1), 2, 0);
        assert_eq!(d.per_buyer_share, whole(49));
    }

    #[test]
    fn test_no_buyers_no_share() {
        let d = Distribution::new(0, whole(98), 0, 0, 0);
        assert_eq!(d.per_buyer_share, 0);
    }

    #[test]
    fn test_split_rounds_down() {
        let d = Distribution::new(0, 10, 0, 3, 0);
        assert_eq!(d.per_buyer_share, 3);
    }
}
