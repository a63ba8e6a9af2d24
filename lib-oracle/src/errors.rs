//! Oracle Errors

use lib_types::{Amount, ExternalId};
use thiserror::Error;

use crate::types::OracleKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("No pending {kind} record for {external_id:?}")]
    RecordNotFound {
        kind: OracleKind,
        external_id: ExternalId,
    },

    #[error("{kind} record {external_id:?} attests {expected}, caller supplied {provided}")]
    AmountMismatch {
        kind: OracleKind,
        external_id: ExternalId,
        expected: Amount,
        provided: Amount,
    },

    #[error("Record {external_id:?} is a {recorded} record, not {requested}")]
    KindMismatch {
        external_id: ExternalId,
        recorded: OracleKind,
        requested: OracleKind,
    },

    #[error("A {kind} record for {external_id:?} is already pending")]
    DuplicateRecord {
        kind: OracleKind,
        external_id: ExternalId,
    },

    #[error("{kind} record {external_id:?} was already consumed")]
    AlreadyConsumed {
        kind: OracleKind,
        external_id: ExternalId,
    },

    #[error("Oracle amounts must be non-zero")]
    InvalidAmount,

    #[error("Unauthorized oracle writer")]
    Unauthorized,
}

impl OracleError {
    /// Amount or kind disagreement between the record and the caller
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            OracleError::AmountMismatch { .. } | OracleError::KindMismatch { .. }
        )
    }
}

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;
