//! Single-writer ledger handle
//!
//! All state lives behind one mutex. Commands apply to the state in place;
//! the engines check everything before writing, so a failed operation leaves
//! balances and oracle records untouched. The event log sits beside the
//! state and is appended only after a command succeeds.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use lib_economy::Distribution;
use lib_oracle::{OracleFeed, OracleKind};
use lib_property::{InMemoryPropertyRegistry, PropertyRecord, PropertyRegistry};
use lib_tokens::current_price;
use lib_types::{Address, Amount, ExternalId, PropertyId, Timestamp};

use crate::clock::{Clock, SystemClock};
use crate::command::{CommandOutcome, LedgerCommand};
use crate::config::LandcConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::state::LedgerState;

/// Point-in-time view of the headline figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub name: String,
    pub symbol: String,
    pub price: Amount,
    pub initial_supply: Amount,
    pub total_supply: Amount,
    pub total_burned: Amount,
    pub reserve_balance: Amount,
    pub rent_pool_balance: Amount,
    pub total_buyers: u64,
    pub maintenance_fee: Amount,
    pub pending_oracle_records: usize,
    pub events: u64,
}

struct LedgerInner {
    state: LedgerState,
    events: Vec<CommandOutcome>,
}

pub struct Ledger {
    inner: Mutex<LedgerInner>,
    registry: Arc<dyn PropertyRegistry>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    pub fn new(config: &LandcConfig) -> LedgerResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &LandcConfig, clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        Self::with_parts(config, clock, Arc::new(InMemoryPropertyRegistry::new()))
    }

    pub fn with_parts(
        config: &LandcConfig,
        clock: Arc<dyn Clock>,
        registry: Arc<dyn PropertyRegistry>,
    ) -> LedgerResult<Self> {
        let state = LedgerState::from_config(config)?;
        info!(
            symbol = %config.token.symbol,
            initial_supply = state.ledger().contract().initial_supply(),
            "ledger initialized"
        );
        Ok(Self {
            inner: Mutex::new(LedgerInner {
                state,
                events: Vec::new(),
            }),
            registry,
            clock,
        })
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Apply `command` at the clock's current time
    pub fn execute(&self, command: LedgerCommand) -> LedgerResult<CommandOutcome> {
        self.commit(command, None)
    }

    /// Apply `command` at an explicit time
    pub fn execute_at(&self, command: LedgerCommand, now: Timestamp) -> LedgerResult<CommandOutcome> {
        self.commit(command, Some(now))
    }

    fn commit(&self, command: LedgerCommand, at: Option<Timestamp>) -> LedgerResult<CommandOutcome> {
        let mut inner = self.inner.lock();
        // read under the lock so commit order and time order agree
        let now = at.unwrap_or_else(|| self.clock.now());

        // PutProperty writes nothing to the state, so the registry write can
        // follow the authority check and still abort the command
        let event = inner
            .state
            .apply(&command, now)
            .and_then(|event| self.store_property(&command).map(|()| event));
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                warn!(command = command.name(), error = %err, "command rejected");
                return Err(err);
            }
        };

        let outcome = CommandOutcome {
            sequence: inner.events.len() as u64,
            at: now,
            event,
        };
        inner.events.push(outcome.clone());

        if let LedgerCommand::PayRent {
            property_id, month, ..
        } = &command
        {
            if let Err(e) = self.registry.tag(property_id, *month) {
                warn!(?property_id, month, error = %e, "rent tag failed");
            }
        }

        info!(
            sequence = outcome.sequence,
            command = command.name(),
            at = now,
            "command applied"
        );
        Ok(outcome)
    }

    fn store_property(&self, command: &LedgerCommand) -> LedgerResult<()> {
        if let LedgerCommand::PutProperty {
            property_id,
            image_ref,
            doc_ref,
            ..
        } = command
        {
            self.registry
                .put_property(*property_id, image_ref.clone(), doc_ref.clone())
                .map_err(|e| LedgerError::Registry(e.to_string()))?;
        }
        Ok(())
    }

    pub fn record_oracle(
        &self,
        caller: Address,
        kind: OracleKind,
        external_id: ExternalId,
        usd_amount: Amount,
    ) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::RecordOracle {
            caller,
            kind,
            external_id,
            usd_amount,
        })
    }

    pub fn buy(&self, buyer: Address, usd_amount: Amount, external_id: ExternalId) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::Buy {
            buyer,
            usd_amount,
            external_id,
        })
    }

    pub fn sell(&self, seller: Address, usd_amount: Amount, external_id: ExternalId) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::Sell {
            seller,
            usd_amount,
            external_id,
        })
    }

    pub fn convert_rent_to_token(&self, usd_amount: Amount, external_id: ExternalId) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::ConvertRentToToken {
            usd_amount,
            external_id,
        })
    }

    pub fn pay_rent(
        &self,
        payer: Address,
        amount: Amount,
        month: Timestamp,
        property_id: PropertyId,
    ) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::PayRent {
            payer,
            amount,
            month,
            property_id,
        })
    }

    pub fn transfer(&self, from: Address, to: Address, amount: Amount) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::Transfer { from, to, amount })
    }

    pub fn approve(&self, owner: Address, spender: Address, amount: Amount) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::Approve {
            owner,
            spender,
            amount,
        })
    }

    pub fn transfer_from(
        &self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::TransferFrom {
            spender,
            owner,
            to,
            amount,
        })
    }

    pub fn distribute(
        &self,
        caller: Address,
        distribution_amount: Amount,
        maintenance_amount: Amount,
        month: Timestamp,
    ) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::Distribute {
            caller,
            distribution_amount,
            maintenance_amount,
            month,
        })
    }

    pub fn claim(&self, holder: Address, month: Timestamp) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::Claim { holder, month })
    }

    pub fn claim_maintenance_fee(&self, caller: Address, amount: Amount) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::ClaimMaintenanceFee { caller, amount })
    }

    pub fn put_property(
        &self,
        caller: Address,
        property_id: PropertyId,
        image_ref: Vec<u8>,
        doc_ref: Vec<u8>,
    ) -> LedgerResult<CommandOutcome> {
        self.execute(LedgerCommand::PutProperty {
            caller,
            property_id,
            image_ref,
            doc_ref,
        })
    }

    /// Drop expired oracle records. Returns how many were removed.
    pub fn prune_expired_oracle_records(&self) -> usize {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        inner.state.oracle_mut().prune_expired(now)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn price(&self) -> LedgerResult<Amount> {
        let inner = self.inner.lock();
        let state = &inner.state;
        Ok(current_price(state.ledger().contract())?)
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.inner.lock().state.ledger().balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.inner.lock().state.ledger().allowance(owner, spender)
    }

    pub fn allowance_to_pool(&self, holder: &Address) -> Amount {
        self.inner.lock().state.ledger().allowance_to_pool(holder)
    }

    pub fn total_buyers(&self) -> u64 {
        self.inner.lock().state.ledger().total_buyers()
    }

    pub fn is_buyer(&self, holder: &Address) -> bool {
        self.inner.lock().state.ledger().is_buyer(holder)
    }

    pub fn total_supply(&self) -> Amount {
        self.inner.lock().state.ledger().total_supply()
    }

    pub fn initial_supply(&self) -> Amount {
        self.inner.lock().state.ledger().contract().initial_supply()
    }

    pub fn total_burned(&self) -> Amount {
        self.inner.lock().state.ledger().contract().total_burned()
    }

    pub fn reserve_balance(&self) -> Amount {
        let inner = self.inner.lock();
        let state = &inner.state;
        let reserve = state.ledger().reserve_pool();
        state.ledger().balance_of(&reserve)
    }

    pub fn rent_pool_balance(&self) -> Amount {
        let inner = self.inner.lock();
        let state = &inner.state;
        let rent = state.ledger().rent_pool();
        state.ledger().balance_of(&rent)
    }

    pub fn total_claimable_in_month(&self, holder: &Address, month: Timestamp) -> Amount {
        let inner = self.inner.lock();
        let state = &inner.state;
        state
            .distribution()
            .total_claimable_in_month(state.ledger(), holder, month)
    }

    /// Claimable amount at the clock's current time
    pub fn claimable(&self, holder: &Address, month: Timestamp) -> LedgerResult<Amount> {
        let inner = self.inner.lock();
        let state = &inner.state;
        let now = self.clock.now();
        Ok(state
            .distribution()
            .claimable(state.ledger(), holder, month, now)?)
    }

    pub fn maintenance_fee(&self) -> Amount {
        self.inner.lock().state.distribution().maintenance_fee()
    }

    pub fn get_distribution(&self, month: Timestamp) -> Option<Distribution> {
        self.inner.lock().state.distribution().get_distribution(month).copied()
    }

    pub fn pending_oracle_amount(&self, kind: OracleKind, external_id: &ExternalId) -> Option<Amount> {
        let inner = self.inner.lock();
        let now = self.clock.now();
        inner.state.oracle().peek(kind, external_id, now)
    }

    pub fn get_property(&self, property_id: &PropertyId) -> LedgerResult<Option<PropertyRecord>> {
        self.registry
            .get_property(property_id)
            .map_err(|e| LedgerError::Registry(e.to_string()))
    }

    pub fn events(&self) -> Vec<CommandOutcome> {
        self.inner.lock().events.clone()
    }

    pub fn event_count(&self) -> u64 {
        self.inner.lock().events.len() as u64
    }

    /// Supply conservation and contract bookkeeping
    pub fn check_invariants(&self) -> LedgerResult<()> {
        let inner = self.inner.lock();
        let state = &inner.state;
        state.ledger().check_conservation()?;
        Ok(())
    }

    pub fn summary(&self) -> LedgerResult<LedgerSummary> {
        let inner = self.inner.lock();
        let state = &inner.state;
        let ledger = state.ledger();
        let contract = ledger.contract();
        Ok(LedgerSummary {
            name: contract.name.clone(),
            symbol: contract.symbol.clone(),
            price: current_price(contract)?,
            initial_supply: contract.initial_supply(),
            total_supply: contract.total_supply(),
            total_burned: contract.total_burned(),
            reserve_balance: ledger.balance_of(&ledger.reserve_pool()),
            rent_pool_balance: ledger.balance_of(&ledger.rent_pool()),
            total_buyers: ledger.total_buyers(),
            maintenance_fee: state.distribution().maintenance_fee(),
            pending_oracle_records: state.oracle().pending_count(),
            events: inner.events.len() as u64,
        })
    }
}
