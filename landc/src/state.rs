//! Ledger state machine
//!
//! One owned value holding every piece of core state. Commands are applied
//! to it in place, one at a time. Every engine validates a command in full
//! before its first write, so a rejected command leaves the state as it was.
//! The event log is kept by the [`crate::Ledger`] handle, outside this value.

use lib_economy::{DistributionEngine, ExchangeEngine, LedgerEvent, MonthCalendar};
use lib_oracle::OracleBook;
use lib_tokens::{AccountLedger, PoolSet, TokenContract};
use lib_types::{whole, Timestamp};

use crate::command::LedgerCommand;
use crate::config::LandcConfig;
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug)]
pub struct LedgerState {
    ledger: AccountLedger,
    oracle: OracleBook,
    distribution: DistributionEngine,
}

impl LedgerState {
    pub fn from_config(config: &LandcConfig) -> LedgerResult<Self> {
        config.validate()?;

        let roles = &config.roles;
        let pools = PoolSet::new(roles.reserve_pool, roles.rent_pool)?;
        let contract = TokenContract::new(
            config.token.name.clone(),
            config.token.symbol.clone(),
            config.token.decimals,
            pools,
            whole(config.token.initial_supply),
        )?;
        let calendar = MonthCalendar::new(config.schedule.genesis_month_start)?;

        Ok(Self {
            ledger: AccountLedger::new(contract),
            oracle: OracleBook::new(roles.oracle_writer, config.oracle.clone()),
            distribution: DistributionEngine::new(roles.authority, roles.maintainer, calendar),
        })
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn oracle(&self) -> &OracleBook {
        &self.oracle
    }

    pub(crate) fn oracle_mut(&mut self) -> &mut OracleBook {
        &mut self.oracle
    }

    pub fn distribution(&self) -> &DistributionEngine {
        &self.distribution
    }

    /// Apply one command at `now`
    ///
    /// # Errors
    /// Any rejection from the engines. Nothing has been written when an
    /// error is returned.
    pub fn apply(&mut self, command: &LedgerCommand, now: Timestamp) -> LedgerResult<LedgerEvent> {
        let event = match command {
            LedgerCommand::RecordOracle {
                caller,
                kind,
                external_id,
                usd_amount,
            } => {
                self.oracle
                    .record(caller, *kind, *external_id, *usd_amount, now)?;
                LedgerEvent::OracleRecorded {
                    kind: *kind,
                    external_id: *external_id,
                    usd_amount: *usd_amount,
                }
            }
            LedgerCommand::Buy {
                buyer,
                usd_amount,
                external_id,
            } => self.exchange().buy(*buyer, *usd_amount, *external_id, now)?,
            LedgerCommand::Sell {
                seller,
                usd_amount,
                external_id,
            } => self.exchange().sell(*seller, *usd_amount, *external_id, now)?,
            LedgerCommand::ConvertRentToToken {
                usd_amount,
                external_id,
            } => self
                .exchange()
                .convert_rent_to_token(*usd_amount, *external_id, now)?,
            LedgerCommand::PayRent {
                payer,
                amount,
                month,
                property_id,
            } => self.exchange().pay_rent(*payer, *amount, *month, *property_id)?,
            LedgerCommand::Transfer { from, to, amount } => {
                self.ledger.holder_transfer(*from, *to, *amount)?;
                LedgerEvent::Transferred {
                    from: *from,
                    to: *to,
                    amount: *amount,
                }
            }
            LedgerCommand::Approve {
                owner,
                spender,
                amount,
            } => {
                self.ledger.approve(*owner, *spender, *amount)?;
                LedgerEvent::Approved {
                    owner: *owner,
                    spender: *spender,
                    amount: *amount,
                }
            }
            LedgerCommand::TransferFrom {
                spender,
                owner,
                to,
                amount,
            } => {
                self.ledger.transfer_from(*spender, *owner, *to, *amount)?;
                LedgerEvent::Transferred {
                    from: *owner,
                    to: *to,
                    amount: *amount,
                }
            }
            LedgerCommand::Distribute {
                caller,
                distribution_amount,
                maintenance_amount,
                month,
            } => self.distribution.distribute(
                caller,
                &self.ledger,
                *distribution_amount,
                *maintenance_amount,
                *month,
                now,
            )?,
            LedgerCommand::Claim { holder, month } => {
                self.distribution
                    .claim(&mut self.ledger, *holder, *month, now)?
            }
            LedgerCommand::ClaimMaintenanceFee { caller, amount } => self
                .distribution
                .claim_maintenance_fee(&mut self.ledger, caller, *amount)?,
            LedgerCommand::PutProperty {
                caller,
                property_id,
                ..
            } => {
                if *caller != self.distribution.authority() {
                    return Err(LedgerError::Unauthorized(*caller));
                }
                LedgerEvent::PropertyStored {
                    property_id: *property_id,
                }
            }
        };
        Ok(event)
    }

    fn exchange(&mut self) -> ExchangeEngine<'_, OracleBook> {
        ExchangeEngine::new(&mut self.ledger, &mut self.oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_oracle::{OracleFeed, OracleKind};
    use lib_types::{Address, ExternalId, PropertyId};

    /// 2022-09-01T00:00:00Z
    const T: Timestamp = 1_661_990_400;

    fn snapshot(state: &LedgerState) -> (String, String, usize) {
        (
            serde_json::to_string(state.ledger()).unwrap(),
            serde_json::to_string(state.distribution()).unwrap(),
            state.oracle().pending_count(),
        )
    }

    #[test]
    fn test_rejected_commands_write_nothing() {
        let config = LandcConfig::default();
        let roles = config.roles.clone();
        let mut state = LedgerState::from_config(&config).unwrap();
        let alice = Address::from_label("alice");
        let buy_id = ExternalId::from_label("buy-1");

        state
            .apply(
                &LedgerCommand::RecordOracle {
                    caller: roles.oracle_writer,
                    kind: OracleKind::Buy,
                    external_id: buy_id,
                    usd_amount: whole(100),
                },
                T,
            )
            .unwrap();
        let before = snapshot(&state);

        let rejected = [
            LedgerCommand::Buy {
                buyer: alice,
                usd_amount: whole(99),
                external_id: buy_id,
            },
            LedgerCommand::Buy {
                buyer: roles.rent_pool,
                usd_amount: whole(100),
                external_id: buy_id,
            },
            LedgerCommand::Sell {
                seller: alice,
                usd_amount: whole(1),
                external_id: buy_id,
            },
            LedgerCommand::Transfer {
                from: alice,
                to: roles.authority,
                amount: 1,
            },
            LedgerCommand::Distribute {
                caller: roles.authority,
                distribution_amount: whole(10),
                maintenance_amount: whole(1),
                month: T + 1,
            },
            LedgerCommand::Claim {
                holder: alice,
                month: T,
            },
            LedgerCommand::ClaimMaintenanceFee {
                caller: roles.maintainer,
                amount: 1,
            },
            LedgerCommand::PutProperty {
                caller: alice,
                property_id: PropertyId::from_label("lot-7"),
                image_ref: vec![1],
                doc_ref: vec![2],
            },
        ];
        for command in &rejected {
            assert!(state.apply(command, T).is_err(), "{} succeeded", command.name());
            assert_eq!(snapshot(&state), before, "{} wrote state", command.name());
        }
        assert_eq!(state.oracle().peek(OracleKind::Buy, &buy_id, T), Some(whole(100)));

        let event = state
            .apply(
                &LedgerCommand::Buy {
                    buyer: alice,
                    usd_amount: whole(100),
                    external_id: buy_id,
                },
                T,
            )
            .unwrap();
        assert_eq!(event.name(), "bought");
        assert_eq!(state.ledger().balance_of(&alice), whole(96));
        state.ledger().check_conservation().unwrap();
    }
}
