use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use lib_tokens::AccountLedger;
use lib_types::{checked_add, checked_sub, Address, Amount, Timestamp};

use super::types::{ClaimState, Distribution};
use super::vesting::accrued_amount;
use crate::calendar::MonthCalendar;
use crate::errors::{EconomyError, EconomyResult};
use crate::events::LedgerEvent;

/// Monthly rent distribution with linear vesting
///
/// **Roles:**
/// - Authority configures one distribution per calendar month
/// - Buyers pull their vested share from the rent pool
/// - Maintainer pulls the maintenance fee from the rent pool
///
/// **Invariants:**
/// - A month is configured at most once; its record never changes
/// - Only buyers registered before configuration share in that month
/// - `claimed <= per_buyer_share` for every `(holder, month)`
/// - Claim state is written only after the token transfer succeeds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEngine {
    authority: Address,
    maintainer: Address,
    calendar: MonthCalendar,
    distributions: BTreeMap<Timestamp, Distribution>,
    /// month -> holder -> progress, created on first claim
    claims: BTreeMap<Timestamp, BTreeMap<Address, ClaimState>>,
    maintenance_accumulator: Amount,
}

impl DistributionEngine {
    pub fn new(authority: Address, maintainer: Address, calendar: MonthCalendar) -> Self {
        Self {
            authority,
            maintainer,
            calendar,
            distributions: BTreeMap::new(),
            claims: BTreeMap::new(),
            maintenance_accumulator: 0,
        }
    }

    pub fn authority(&self) -> Address {
        self.authority
    }

    pub fn maintainer(&self) -> Address {
        self.maintainer
    }

    pub fn calendar(&self) -> &MonthCalendar {
        &self.calendar
    }

    fn ensure_authority(&self, caller: &Address) -> EconomyResult<()> {
        if *caller != self.authority {
            return Err(EconomyError::Unauthorized(*caller));
        }
        Ok(())
    }

    fn ensure_maintainer(&self, caller: &Address) -> EconomyResult<()> {
        if *caller != self.maintainer {
            return Err(EconomyError::Unauthorized(*caller));
        }
        Ok(())
    }

    // ========================================================================
    // CONFIGURATION (AUTHORITY-ONLY)
    // ========================================================================

    /// Configure the distribution for the active month
    ///
    /// Nothing leaves the rent pool here; buyers pull their share later.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the authority
    /// - `AlreadyConfigured` if `month` already has a distribution
    /// - `InvalidPeriod` if `month` is not the month start active at `now`
    pub fn distribute(
        &mut self,
        caller: &Address,
        ledger: &AccountLedger,
        distribution_amount: Amount,
        maintenance_amount: Amount,
        month: Timestamp,
        now: Timestamp,
    ) -> EconomyResult<LedgerEvent> {
        self.ensure_authority(caller)?;
        if self.distributions.contains_key(&month) {
            return Err(EconomyError::AlreadyConfigured(month));
        }
        self.calendar.validate_period(month, now)?;

        let accumulator = checked_add(self.maintenance_accumulator, maintenance_amount)?;
        let distribution = Distribution::new(
            month,
            distribution_amount,
            maintenance_amount,
            ledger.total_buyers(),
            now,
        );

        self.maintenance_accumulator = accumulator;
        self.distributions.insert(month, distribution);

        info!(
            month,
            distribution_amount,
            maintenance_amount,
            buyers = distribution.buyer_snapshot,
            per_buyer_share = distribution.per_buyer_share,
            "distribution configured"
        );

        Ok(LedgerEvent::Distributed {
            month,
            distribution_amount,
            maintenance_amount,
            buyer_snapshot: distribution.buyer_snapshot,
            per_buyer_share: distribution.per_buyer_share,
        })
    }

    pub fn get_distribution(&self, month: Timestamp) -> Option<&Distribution> {
        self.distributions.get(&month)
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn claim_state(&self, holder: &Address, month: Timestamp) -> ClaimState {
        self.claims
            .get(&month)
            .and_then(|holders| holders.get(holder))
            .copied()
            .unwrap_or_else(|| ClaimState::unclaimed(month))
    }

    /// Full share `holder` is entitled to for `month`
    ///
    /// Zero for holders who were not buyers when the month was configured.
    pub fn total_claimable_in_month(
        &self,
        ledger: &AccountLedger,
        holder: &Address,
        month: Timestamp,
    ) -> Amount {
        match self.distributions.get(&month) {
            Some(d) if ledger.buyers().was_member_at(holder, d.buyer_snapshot) => {
                d.per_buyer_share
            }
            _ => 0,
        }
    }

    /// Vested and unclaimed amount for `holder` in `month` at `now`
    pub fn claimable(
        &self,
        ledger: &AccountLedger,
        holder: &Address,
        month: Timestamp,
        now: Timestamp,
    ) -> EconomyResult<Amount> {
        let share = self.total_claimable_in_month(ledger, holder, month);
        if share == 0 {
            return Ok(0);
        }
        let state = self.claim_state(holder, month);
        let accrued = accrued_amount(share, state.claimed, month, state.last_accrual_time, now)?;
        debug!(?holder, month, share, claimed = state.claimed, accrued, "claimable");
        Ok(accrued)
    }

    pub fn maintenance_fee(&self) -> Amount {
        self.maintenance_accumulator
    }

    // ========================================================================
    // CLAIMING (PULL-BASED)
    // ========================================================================

    /// Pay out everything vested for `holder` in `month`
    ///
    /// Resets the accrual baseline to `now`, so the next claim accrues only
    /// from this one.
    ///
    /// # Errors
    /// - `NothingToClaim` if nothing has vested
    /// - `Token(InsufficientBalance)` if the rent pool cannot cover it
    pub fn claim(
        &mut self,
        ledger: &mut AccountLedger,
        holder: Address,
        month: Timestamp,
        now: Timestamp,
    ) -> EconomyResult<LedgerEvent> {
        let amount = self.claimable(ledger, &holder, month, now)?;
        if amount == 0 {
            return Err(EconomyError::NothingToClaim { holder, month });
        }

        let state = self.claim_state(&holder, month);
        let total_claimed = checked_add(state.claimed, amount)?;

        // ATOMIC TRANSFER PHASE: state is recorded only once tokens moved
        let rent = ledger.rent_pool();
        ledger.transfer(rent, holder, amount)?;

        self.claims.entry(month).or_default().insert(
            holder,
            ClaimState {
                claimed: total_claimed,
                last_accrual_time: now,
            },
        );

        info!(?holder, month, amount, total_claimed, "share claimed");

        Ok(LedgerEvent::Claimed {
            holder,
            month,
            amount,
            total_claimed,
        })
    }

    /// Pay `amount` of the maintenance accumulator to the maintainer
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the maintainer
    /// - `ZeroAmount` if `amount == 0`
    /// - `InsufficientAccumulator` if `amount` exceeds the accumulator
    pub fn claim_maintenance_fee(
        &mut self,
        ledger: &mut AccountLedger,
        caller: &Address,
        amount: Amount,
    ) -> EconomyResult<LedgerEvent> {
        self.ensure_maintainer(caller)?;
        if amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }
        if amount > self.maintenance_accumulator {
            return Err(EconomyError::InsufficientAccumulator {
                available: self.maintenance_accumulator,
                requested: amount,
            });
        }
        let remaining = checked_sub(self.maintenance_accumulator, amount)?;

        let rent = ledger.rent_pool();
        ledger.transfer(rent, self.maintainer, amount)?;
        self.maintenance_accumulator = remaining;

        info!(amount, remaining, "maintenance fee claimed");

        Ok(LedgerEvent::MaintenanceClaimed {
            maintainer: self.maintainer,
            amount,
            remaining,
        })
    }
}
