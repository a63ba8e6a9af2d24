//! Ledger events
//!
//! One event per successful state transition. Failed operations produce none.

use serde::{Deserialize, Serialize};

use lib_oracle::OracleKind;
use lib_types::{Address, Amount, ExternalId, PropertyId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    OracleRecorded {
        kind: OracleKind,
        external_id: ExternalId,
        usd_amount: Amount,
    },
    Bought {
        buyer: Address,
        external_id: ExternalId,
        usd_amount: Amount,
        token_amount: Amount,
        burned: Amount,
        credited: Amount,
        price_before: Amount,
        price_after: Amount,
        new_buyer: bool,
    },
    Sold {
        seller: Address,
        external_id: ExternalId,
        usd_amount: Amount,
        token_amount: Amount,
        price: Amount,
    },
    RentConverted {
        external_id: ExternalId,
        usd_amount: Amount,
        token_amount: Amount,
        price: Amount,
    },
    RentPaid {
        payer: Address,
        amount: Amount,
        month: Timestamp,
        property_id: PropertyId,
    },
    Transferred {
        from: Address,
        to: Address,
        amount: Amount,
    },
    Approved {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    Distributed {
        month: Timestamp,
        distribution_amount: Amount,
        maintenance_amount: Amount,
        buyer_snapshot: u64,
        per_buyer_share: Amount,
    },
    Claimed {
        holder: Address,
        month: Timestamp,
        amount: Amount,
        total_claimed: Amount,
    },
    MaintenanceClaimed {
        maintainer: Address,
        amount: Amount,
        remaining: Amount,
    },
    PropertyStored {
        property_id: PropertyId,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::OracleRecorded { .. } => "oracle_recorded",
            LedgerEvent::Bought { .. } => "bought",
            LedgerEvent::Sold { .. } => "sold",
            LedgerEvent::RentConverted { .. } => "rent_converted",
            LedgerEvent::RentPaid { .. } => "rent_paid",
            LedgerEvent::Transferred { .. } => "transferred",
            LedgerEvent::Approved { .. } => "approved",
            LedgerEvent::Distributed { .. } => "distributed",
            LedgerEvent::Claimed { .. } => "claimed",
            LedgerEvent::MaintenanceClaimed { .. } => "maintenance_claimed",
            LedgerEvent::PropertyStored { .. } => "property_stored",
        }
    }
}
