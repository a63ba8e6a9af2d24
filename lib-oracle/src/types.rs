//! Oracle record types

use serde::{Deserialize, Serialize};
use std::fmt;

use lib_types::{Amount, ExternalId, Timestamp};

/// Which ledger operation a record authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OracleKind {
    Buy = 1,
    Sell = 2,
    RentConversion = 3,
}

impl OracleKind {
    pub const ALL: &'static [OracleKind] = &[
        OracleKind::Buy,
        OracleKind::Sell,
        OracleKind::RentConversion,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            OracleKind::Buy => "Buy",
            OracleKind::Sell => "Sell",
            OracleKind::RentConversion => "RentConversion",
        }
    }
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A pending attestation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRecord {
    pub kind: OracleKind,
    pub external_id: ExternalId,
    /// Attested USD amount, WAD-scaled
    pub usd_amount: Amount,
    pub recorded_at: Timestamp,
}

impl OracleRecord {
    /// Whether the record is older than `ttl_secs` at `now`
    pub fn is_expired(&self, now: Timestamp, ttl_secs: Option<u64>) -> bool {
        match ttl_secs {
            Some(ttl) => now.saturating_sub(self.recorded_at) > ttl,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Seconds a pending record stays consumable. None = forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_ttl_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let record = OracleRecord {
            kind: OracleKind::Buy,
            external_id: ExternalId::from_label("tx"),
            usd_amount: 1,
            recorded_at: 1_000,
        };
        assert!(!record.is_expired(1_000_000, None));
        assert!(!record.is_expired(1_060, Some(60)));
        assert!(record.is_expired(1_061, Some(60)));
    }

    #[test]
    fn test_display() {
        assert_eq!(OracleKind::RentConversion.to_string(), "RentConversion");
        assert_eq!(OracleKind::ALL.len(), 3);
    }
}
