//! Serializable ledger commands
//!
//! Every mutating operation has a command form, so a ledger can be driven
//! from a JSON command log as well as through the typed API.

use serde::{Deserialize, Serialize};

use lib_economy::LedgerEvent;
use lib_oracle::OracleKind;
use lib_types::{Address, Amount, ExternalId, PropertyId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCommand {
    RecordOracle {
        caller: Address,
        kind: OracleKind,
        external_id: ExternalId,
        usd_amount: Amount,
    },
    Buy {
        buyer: Address,
        usd_amount: Amount,
        external_id: ExternalId,
    },
    Sell {
        seller: Address,
        usd_amount: Amount,
        external_id: ExternalId,
    },
    ConvertRentToToken {
        usd_amount: Amount,
        external_id: ExternalId,
    },
    PayRent {
        payer: Address,
        amount: Amount,
        month: Timestamp,
        property_id: PropertyId,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    Approve {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    TransferFrom {
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    },
    Distribute {
        caller: Address,
        distribution_amount: Amount,
        maintenance_amount: Amount,
        month: Timestamp,
    },
    Claim {
        holder: Address,
        month: Timestamp,
    },
    ClaimMaintenanceFee {
        caller: Address,
        amount: Amount,
    },
    PutProperty {
        caller: Address,
        property_id: PropertyId,
        #[serde(with = "hex_bytes")]
        image_ref: Vec<u8>,
        #[serde(with = "hex_bytes")]
        doc_ref: Vec<u8>,
    },
}

impl LedgerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::RecordOracle { .. } => "record_oracle",
            LedgerCommand::Buy { .. } => "buy",
            LedgerCommand::Sell { .. } => "sell",
            LedgerCommand::ConvertRentToToken { .. } => "convert_rent_to_token",
            LedgerCommand::PayRent { .. } => "pay_rent",
            LedgerCommand::Transfer { .. } => "transfer",
            LedgerCommand::Approve { .. } => "approve",
            LedgerCommand::TransferFrom { .. } => "transfer_from",
            LedgerCommand::Distribute { .. } => "distribute",
            LedgerCommand::Claim { .. } => "claim",
            LedgerCommand::ClaimMaintenanceFee { .. } => "claim_maintenance_fee",
            LedgerCommand::PutProperty { .. } => "put_property",
        }
    }
}

/// Result of an applied command, also the entry type of the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Position in the event log, starting at 0
    pub sequence: u64,
    pub at: Timestamp,
    pub event: LedgerEvent,
}

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw.strip_prefix("0x").unwrap_or(&raw)).map_err(D::Error::custom)
    }
}
