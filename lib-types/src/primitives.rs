//! Canonical Primitive Types for the LANDC ledger
//!
//! These types are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable (hex strings in human-readable formats)
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Token and USD amounts, fixed-point with 18 fractional digits
pub type Amount = u128;

/// Unix timestamp in whole seconds
pub type Timestamp = u64;

/// Basis points for percentage calculations (10000 = 100%)
pub type Bps = u16;

/// Seconds in one accrual tick
pub const SECONDS_PER_HOUR: u64 = 3_600;

// ============================================================================
// HEX SERDE
// ============================================================================

mod hex32 {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::decode_hex32(&raw).map_err(D::Error::custom)
    }
}

fn decode_hex32(raw: &str) -> Result<[u8; 32], String> {
    let trimmed = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(trimmed).map_err(|e| format!("invalid hex: {}", e))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| format!("expected 32 bytes, got {}", v.len()))
}

macro_rules! bytes32_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
        pub struct $name(#[serde(with = "hex32")] pub [u8; 32]);

        impl $name {
            /// Create from raw bytes
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Create a zeroed value
            pub const fn zero() -> Self {
                Self([0u8; 32])
            }

            /// Get the underlying bytes
            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Check if this is the zero value
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Parse from a 64-character hex string (optional `0x` prefix)
            pub fn from_hex(raw: &str) -> Result<Self, String> {
                decode_hex32(raw).map(Self)
            }

            /// Derive a stable identifier from a human-readable label
            pub fn from_label(label: &str) -> Self {
                Self(*blake3::hash(label.as_bytes()).as_bytes())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), hex::encode(&self.0[..8]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

bytes32_id!(
    /// 32-byte account identity. Opaque and comparable; authentication is external.
    Address,
    "Address"
);

bytes32_id!(
    /// Identifier of an off-ledger fiat transaction attested by the oracle
    ExternalId,
    "ExternalId"
);

bytes32_id!(
    /// Identifier of a tokenized property in the metadata registry
    PropertyId,
    "PropertyId"
);
