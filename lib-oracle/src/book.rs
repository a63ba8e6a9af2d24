//! Pending oracle records
//!
//! [`OracleFeed`] is the contract the exchange engine depends on;
//! [`OracleBook`] is the in-memory implementation held inside ledger state,
//! so a consumption commits or rolls back together with the balance change
//! it authorizes.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use lib_types::{Address, Amount, ExternalId, Timestamp};

use crate::errors::{OracleError, OracleResult};
use crate::types::{OracleConfig, OracleKind, OracleRecord};

/// Core-facing oracle contract
pub trait OracleFeed {
    /// Amount `consume` would accept at `now`, without consuming it
    fn peek(&self, kind: OracleKind, external_id: &ExternalId, now: Timestamp) -> Option<Amount>;

    /// Check that `usd_amount` matches the pending record and remove it
    fn consume(
        &mut self,
        kind: OracleKind,
        external_id: &ExternalId,
        usd_amount: Amount,
        now: Timestamp,
    ) -> OracleResult<OracleRecord>;
}

type RecordKey = (OracleKind, ExternalId);

#[derive(Debug, Clone)]
pub struct OracleBook {
    /// Only identity allowed to record attestations
    writer: Address,
    config: OracleConfig,
    pending: BTreeMap<RecordKey, OracleRecord>,
    consumed: BTreeSet<RecordKey>,
}

impl OracleBook {
    pub fn new(writer: Address, config: OracleConfig) -> Self {
        Self {
            writer,
            config,
            pending: BTreeMap::new(),
            consumed: BTreeSet::new(),
        }
    }

    /// Record a new attestation (oracle writer only)
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the writer
    /// - `InvalidAmount` if `usd_amount == 0`
    /// - `DuplicateRecord` if the same `(kind, id)` is pending
    /// - `AlreadyConsumed` if the same `(kind, id)` was consumed before
    pub fn record(
        &mut self,
        caller: &Address,
        kind: OracleKind,
        external_id: ExternalId,
        usd_amount: Amount,
        now: Timestamp,
    ) -> OracleResult<OracleRecord> {
        if *caller != self.writer {
            return Err(OracleError::Unauthorized);
        }
        if usd_amount == 0 {
            return Err(OracleError::InvalidAmount);
        }

        let key = (kind, external_id);
        if self.consumed.contains(&key) {
            return Err(OracleError::AlreadyConsumed { kind, external_id });
        }
        if let Some(existing) = self.pending.get(&key) {
            if !existing.is_expired(now, self.config.record_ttl_secs) {
                return Err(OracleError::DuplicateRecord { kind, external_id });
            }
        }

        let record = OracleRecord {
            kind,
            external_id,
            usd_amount,
            recorded_at: now,
        };
        self.pending.insert(key, record);
        debug!(%kind, ?external_id, usd_amount, "oracle record pending");
        Ok(record)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_consumed(&self, kind: OracleKind, external_id: &ExternalId) -> bool {
        self.consumed.contains(&(kind, *external_id))
    }

    /// Drop records older than the configured TTL. Returns how many were removed.
    pub fn prune_expired(&mut self, now: Timestamp) -> usize {
        let ttl = self.config.record_ttl_secs;
        let before = self.pending.len();
        self.pending.retain(|_, record| !record.is_expired(now, ttl));
        before - self.pending.len()
    }

    fn live_record(&self, key: &RecordKey, now: Timestamp) -> Option<&OracleRecord> {
        self.pending
            .get(key)
            .filter(|record| !record.is_expired(now, self.config.record_ttl_secs))
    }
}

impl OracleFeed for OracleBook {
    fn peek(&self, kind: OracleKind, external_id: &ExternalId, now: Timestamp) -> Option<Amount> {
        self.live_record(&(kind, *external_id), now)
            .map(|record| record.usd_amount)
    }

    fn consume(
        &mut self,
        kind: OracleKind,
        external_id: &ExternalId,
        usd_amount: Amount,
        now: Timestamp,
    ) -> OracleResult<OracleRecord> {
        let key = (kind, *external_id);

        let record = match self.live_record(&key, now) {
            Some(record) => *record,
            None if self.consumed.contains(&key) => {
                let err = OracleError::RecordNotFound {
                    kind,
                    external_id: *external_id,
                };
                warn!(%err, "oracle record already consumed");
                return Err(err);
            }
            None => {
                // Same id pending under another kind is a mismatch, not a miss
                let other = OracleKind::ALL
                    .iter()
                    .copied()
                    .filter(|other| *other != kind)
                    .find(|other| self.live_record(&(*other, *external_id), now).is_some());

                let err = match other {
                    Some(recorded) => OracleError::KindMismatch {
                        external_id: *external_id,
                        recorded,
                        requested: kind,
                    },
                    None => OracleError::RecordNotFound {
                        kind,
                        external_id: *external_id,
                    },
                };
                warn!(%err, "oracle consume rejected");
                return Err(err);
            }
        };

        if record.usd_amount != usd_amount {
            let err = OracleError::AmountMismatch {
                kind,
                external_id: *external_id,
                expected: record.usd_amount,
                provided: usd_amount,
            };
            warn!(%err, "oracle consume rejected");
            return Err(err);
        }

        self.pending.remove(&key);
        self.consumed.insert(key);
        debug!(%kind, ?external_id, usd_amount, "oracle record consumed");
        Ok(record)
    }
}
