//! End-to-end ledger scenarios through the `Ledger` handle

use std::sync::Arc;

use landc::{LandcConfig, Ledger, LedgerError, ManualClock};
use lib_economy::EconomyError;
use lib_oracle::{OracleError, OracleKind};
use lib_property::{InMemoryPropertyRegistry, PropertyRegistry};
use lib_tokens::TokenError;
use lib_types::{whole, Address, Amount, ExternalId, PropertyId, Timestamp, SECONDS_PER_HOUR, WAD};

/// 2022-09-01T00:00:00Z
const T: Timestamp = 1_661_990_400;
/// 2022-10-01T00:00:00Z
const NEXT_MONTH: Timestamp = 1_664_582_400;
const H: u64 = SECONDS_PER_HOUR;
const HORIZON: u64 = 744 * H;

struct Harness {
    ledger: Ledger,
    clock: Arc<ManualClock>,
    config: LandcConfig,
    registry: Arc<InMemoryPropertyRegistry>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(LandcConfig::default())
    }

    fn with_config(config: LandcConfig) -> Self {
        let clock = Arc::new(ManualClock::new(T + 60));
        let registry = Arc::new(InMemoryPropertyRegistry::new());
        let ledger = Ledger::with_parts(&config, clock.clone(), registry.clone()).unwrap();
        Self {
            ledger,
            clock,
            config,
            registry,
        }
    }

    fn writer(&self) -> Address {
        self.config.roles.oracle_writer
    }

    fn authority(&self) -> Address {
        self.config.roles.authority
    }

    fn maintainer(&self) -> Address {
        self.config.roles.maintainer
    }

    fn reserve(&self) -> Address {
        self.config.roles.reserve_pool
    }

    fn attest(&self, kind: OracleKind, label: &str, usd: Amount) -> ExternalId {
        let id = ExternalId::from_label(label);
        self.ledger
            .record_oracle(self.writer(), kind, id, usd)
            .unwrap();
        id
    }

    fn buy(&self, buyer: Address, usd: Amount, label: &str) {
        let id = self.attest(OracleKind::Buy, label, usd);
        self.ledger.buy(buyer, usd, id).unwrap();
    }

    fn fund_rent_pool(&self, usd: Amount) {
        let id = self.attest(OracleKind::RentConversion, "rent-funding", usd);
        self.ledger.convert_rent_to_token(usd, id).unwrap();
    }
}

fn alice() -> Address {
    Address::from_label("alice")
}

fn bob() -> Address {
    Address::from_label("bob")
}

fn carol() -> Address {
    Address::from_label("carol")
}

fn economy(err: LedgerError) -> EconomyError {
    match err {
        LedgerError::Economy(inner) => inner,
        other => panic!("expected economy error, got {other:?}"),
    }
}

#[test]
fn buy_then_sell_matches_reference_numbers() {
    let h = Harness::new();
    assert_eq!(h.ledger.price().unwrap(), WAD);

    h.buy(alice(), whole(100), "buy-1");
    assert_eq!(h.ledger.balance_of(&alice()), whole(96));
    assert_eq!(h.ledger.allowance_to_pool(&alice()), whole(96));
    assert_eq!(h.ledger.reserve_balance(), whole(999_999_999_900));
    assert_eq!(h.ledger.total_supply(), whole(999_999_999_996));
    assert_eq!(h.ledger.total_burned(), whole(4));
    assert_eq!(h.ledger.price().unwrap(), 1_000_000_000_004_000_000);

    let price = h.ledger.price().unwrap();
    let id = h.attest(OracleKind::Sell, "sell-1", whole(90));
    h.ledger.sell(alice(), whole(90), id).unwrap();

    assert_eq!(h.ledger.balance_of(&alice()), 6_000_000_000_360_000_000);
    assert_eq!(h.ledger.allowance_to_pool(&alice()), 6_000_000_000_360_000_000);
    assert_eq!(
        h.ledger.reserve_balance(),
        999_999_999_989_999_999_999_640_000_000
    );
    assert_eq!(h.ledger.price().unwrap(), price);
    h.ledger.check_invariants().unwrap();

    // record, buy, record, sell
    assert_eq!(h.ledger.event_count(), 4);
}

#[test]
fn consumed_oracle_record_cannot_be_replayed() {
    let h = Harness::new();
    let id = h.attest(OracleKind::Buy, "buy-1", whole(100));
    h.ledger.buy(alice(), whole(100), id).unwrap();
    let events = h.ledger.event_count();

    let err = h.ledger.buy(alice(), whole(100), id).unwrap_err();
    assert_eq!(
        err.oracle(),
        Some(&OracleError::RecordNotFound {
            kind: OracleKind::Buy,
            external_id: id
        })
    );
    assert_eq!(h.ledger.balance_of(&alice()), whole(96));
    assert_eq!(h.ledger.event_count(), events);

    let err = h
        .ledger
        .record_oracle(h.writer(), OracleKind::Buy, id, whole(100))
        .unwrap_err();
    assert!(matches!(err.oracle(), Some(OracleError::AlreadyConsumed { .. })));
}

#[test]
fn replay_stays_not_found_after_the_id_is_reused_for_another_kind() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "order-7");
    let id = h.attest(OracleKind::Sell, "order-7", whole(50));

    let err = h.ledger.buy(alice(), whole(100), id).unwrap_err();
    assert_eq!(
        err.oracle(),
        Some(&OracleError::RecordNotFound {
            kind: OracleKind::Buy,
            external_id: id
        })
    );
    assert_eq!(h.ledger.pending_oracle_amount(OracleKind::Sell, &id), Some(whole(50)));
}

#[test]
fn pending_amount_agrees_with_expiry() {
    let mut config = LandcConfig::default();
    config.oracle.record_ttl_secs = Some(600);
    let h = Harness::with_config(config);
    let id = h.attest(OracleKind::Buy, "buy-1", whole(100));

    h.clock.advance(600);
    assert_eq!(h.ledger.pending_oracle_amount(OracleKind::Buy, &id), Some(whole(100)));

    h.clock.advance(1);
    assert_eq!(h.ledger.pending_oracle_amount(OracleKind::Buy, &id), None);
    let err = h.ledger.buy(alice(), whole(100), id).unwrap_err();
    assert!(matches!(err.oracle(), Some(OracleError::RecordNotFound { .. })));
    assert_eq!(h.ledger.prune_expired_oracle_records(), 1);
}

#[test]
fn mismatched_record_stays_pending() {
    let h = Harness::new();
    let id = h.attest(OracleKind::Buy, "buy-1", whole(100));

    let err = h.ledger.buy(alice(), whole(50), id).unwrap_err();
    assert!(err.oracle().map(OracleError::is_mismatch).unwrap_or(false));
    assert_eq!(h.ledger.pending_oracle_amount(OracleKind::Buy, &id), Some(whole(100)));
    assert_eq!(h.ledger.total_supply(), h.ledger.initial_supply());

    h.ledger.buy(alice(), whole(100), id).unwrap();
    assert_eq!(h.ledger.pending_oracle_amount(OracleKind::Buy, &id), None);
}

#[test]
fn only_the_oracle_writer_records() {
    let h = Harness::new();
    let err = h
        .ledger
        .record_oracle(alice(), OracleKind::Buy, ExternalId::from_label("x"), whole(1))
        .unwrap_err();
    assert_eq!(err.oracle(), Some(&OracleError::Unauthorized));
}

#[test]
fn later_buyers_are_excluded_from_configured_month() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    h.buy(bob(), whole(100), "buy-b");
    h.fund_rent_pool(whole(200));

    h.ledger
        .distribute(h.authority(), whole(98), whole(1), T)
        .unwrap();
    h.buy(carol(), whole(100), "buy-c");

    assert_eq!(h.ledger.total_buyers(), 3);
    assert_eq!(h.ledger.total_claimable_in_month(&alice(), T), whole(49));
    assert_eq!(h.ledger.total_claimable_in_month(&bob(), T), whole(49));
    assert_eq!(h.ledger.total_claimable_in_month(&carol(), T), 0);

    h.clock.set(T + HORIZON);
    assert_eq!(h.ledger.claimable(&carol(), T).unwrap(), 0);
    assert!(matches!(
        economy(h.ledger.claim(carol(), T).unwrap_err()),
        EconomyError::NothingToClaim { .. }
    ));
}

#[test]
fn share_vests_hourly_and_claims_reset_the_baseline() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    h.buy(bob(), whole(100), "buy-b");
    h.fund_rent_pool(whole(200));
    h.ledger
        .distribute(h.authority(), whole(98), whole(1), T)
        .unwrap();

    let share = whole(49);
    let hourly = share / 744;
    let alice_start = h.ledger.balance_of(&alice());

    h.clock.set(T + 10 * H);
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), 10 * hourly);
    h.clock.set(T + 10 * H + 1_799);
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), 10 * hourly);

    h.ledger.claim(alice(), T).unwrap();
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), 0);
    assert_eq!(h.ledger.balance_of(&alice()), alice_start + 10 * hourly);

    // two whole hours after the claim, not after the hour boundary
    h.clock.set(T + 12 * H + 1_799);
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), 2 * hourly);
    h.clock.set(T + 12 * H);
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), hourly);

    h.clock.set(T + HORIZON + 1);
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), share - 10 * hourly);
    h.ledger.claim(alice(), T).unwrap();
    assert_eq!(h.ledger.balance_of(&alice()), alice_start + share);

    h.clock.set(T + 2 * HORIZON);
    assert_eq!(h.ledger.claimable(&alice(), T).unwrap(), 0);
    h.ledger.check_invariants().unwrap();
}

#[test]
fn distribute_is_once_per_month() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    h.ledger
        .distribute(h.authority(), whole(98), whole(1), T)
        .unwrap();
    let first = h.ledger.get_distribution(T).unwrap();

    let err = economy(
        h.ledger
            .distribute(h.authority(), whole(5), whole(5), T)
            .unwrap_err(),
    );
    assert_eq!(err, EconomyError::AlreadyConfigured(T));
    assert_eq!(h.ledger.get_distribution(T).unwrap(), first);
    assert_eq!(h.ledger.maintenance_fee(), whole(1));
}

#[test]
fn distribute_requires_authority_and_active_month() {
    let h = Harness::new();
    let err = economy(h.ledger.distribute(alice(), whole(98), 0, T).unwrap_err());
    assert_eq!(err, EconomyError::Unauthorized(alice()));

    let err = economy(
        h.ledger
            .distribute(h.authority(), whole(98), 0, NEXT_MONTH)
            .unwrap_err(),
    );
    assert!(matches!(err, EconomyError::InvalidPeriod { .. }));

    // the next month becomes valid once it starts
    h.clock.set(NEXT_MONTH + 5);
    h.ledger
        .distribute(h.authority(), whole(98), 0, NEXT_MONTH)
        .unwrap();
    assert!(h.ledger.get_distribution(T).is_none());
}

#[test]
fn zero_distribution_without_buyers_is_recorded() {
    let h = Harness::new();
    h.ledger.distribute(h.authority(), 0, 0, T).unwrap();
    let d = h.ledger.get_distribution(T).unwrap();
    assert_eq!(d.buyer_snapshot, 0);
    assert_eq!(d.per_buyer_share, 0);
}

#[test]
fn maintenance_fee_goes_to_the_maintainer_only() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    h.fund_rent_pool(whole(10));
    h.ledger
        .distribute(h.authority(), whole(5), whole(2), T)
        .unwrap();
    let rent_before = h.ledger.rent_pool_balance();

    let err = economy(h.ledger.claim_maintenance_fee(alice(), whole(1)).unwrap_err());
    assert_eq!(err, EconomyError::Unauthorized(alice()));

    let err = economy(
        h.ledger
            .claim_maintenance_fee(h.maintainer(), whole(3))
            .unwrap_err(),
    );
    assert_eq!(
        err,
        EconomyError::InsufficientAccumulator {
            available: whole(2),
            requested: whole(3)
        }
    );

    h.ledger
        .claim_maintenance_fee(h.maintainer(), whole(2))
        .unwrap();
    assert_eq!(h.ledger.maintenance_fee(), 0);
    assert_eq!(h.ledger.balance_of(&h.maintainer()), whole(2));
    assert_eq!(h.ledger.rent_pool_balance(), rent_before - whole(2));
}

#[test]
fn reserve_allowance_is_locked_to_balance() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");

    let err = h.ledger.approve(alice(), h.reserve(), 0).unwrap_err();
    assert_eq!(err.token(), Some(&TokenError::AllowanceLocked));

    h.ledger.transfer(alice(), bob(), whole(6)).unwrap();
    assert_eq!(h.ledger.allowance(&alice(), &h.reserve()), whole(90));
    assert_eq!(h.ledger.allowance(&bob(), &h.reserve()), whole(6));

    // third-party allowances work as usual
    h.ledger.approve(alice(), carol(), whole(10)).unwrap();
    h.ledger
        .transfer_from(carol(), alice(), carol(), whole(4))
        .unwrap();
    assert_eq!(h.ledger.allowance(&alice(), &carol()), whole(6));
    assert_eq!(h.ledger.allowance_to_pool(&alice()), whole(86));
    assert_eq!(h.ledger.allowance_to_pool(&carol()), whole(4));

    let err = h
        .ledger
        .transfer_from(carol(), alice(), carol(), whole(7))
        .unwrap_err();
    assert!(matches!(
        err.token(),
        Some(TokenError::InsufficientAllowance { .. })
    ));

    // buyer registry is only fed by buys
    assert!(!h.ledger.is_buyer(&bob()));
    h.ledger.check_invariants().unwrap();
}

#[test]
fn pools_cannot_be_debited_by_holders() {
    let h = Harness::new();
    let err = h.ledger.transfer(h.reserve(), alice(), whole(1)).unwrap_err();
    assert_eq!(err.token(), Some(&TokenError::PoolAccount(h.reserve())));
    assert_eq!(h.ledger.balance_of(&alice()), 0);
}

#[test]
fn pay_rent_tags_the_property() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    let lot = PropertyId::from_label("lot-7");

    let err = h
        .ledger
        .put_property(alice(), lot, b"img".to_vec(), b"doc".to_vec())
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized(_)));
    assert!(h.ledger.get_property(&lot).unwrap().is_none());

    h.ledger
        .put_property(h.authority(), lot, b"img".to_vec(), b"doc".to_vec())
        .unwrap();

    let price = h.ledger.price().unwrap();
    h.ledger.pay_rent(alice(), whole(10), T, lot).unwrap();

    assert_eq!(h.ledger.rent_pool_balance(), whole(10));
    assert_eq!(h.ledger.balance_of(&alice()), whole(86));
    assert_eq!(h.ledger.price().unwrap(), price);
    assert!(h.registry.get_property(&lot).unwrap().unwrap().rent_paid_for(T));

    // unknown property: payment still goes through
    h.ledger
        .pay_rent(alice(), whole(1), T, PropertyId::from_label("elsewhere"))
        .unwrap();
    assert_eq!(h.ledger.rent_pool_balance(), whole(11));
}

#[test]
fn failed_commands_leave_no_trace() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    let before = h.ledger.summary().unwrap();
    let events = h.ledger.events();

    let id = h.attest(OracleKind::Sell, "sell-big", whole(1_000));
    let after_record = h.ledger.summary().unwrap();
    assert!(h.ledger.sell(alice(), whole(1_000), id).is_err());

    assert_eq!(h.ledger.summary().unwrap(), after_record);
    assert_eq!(h.ledger.events().len(), events.len() + 1);
    assert_eq!(before.total_supply, after_record.total_supply);
    assert_eq!(
        h.ledger.pending_oracle_amount(OracleKind::Sell, &id),
        Some(whole(1_000))
    );
}

#[test]
fn rejections_do_not_take_a_sequence_number() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    assert!(h.ledger.transfer(bob(), alice(), 1).is_err());
    assert!(h.ledger.claim(alice(), T).is_err());
    h.buy(bob(), whole(100), "buy-b");

    let sequences: Vec<u64> = h.ledger.events().iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
    assert_eq!(h.ledger.summary().unwrap().events, 4);
}

#[test]
fn events_are_sequenced() {
    let h = Harness::new();
    h.buy(alice(), whole(100), "buy-a");
    h.buy(bob(), whole(100), "buy-b");

    let events = h.ledger.events();
    let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
    assert_eq!(events[1].event.name(), "bought");
    assert!(events.iter().all(|e| e.at == T + 60));
}
