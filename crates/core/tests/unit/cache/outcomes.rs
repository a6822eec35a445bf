//! Access Outcome Tests.
//!
//! A modify is a load followed by a store: the store half always finds the
//! block the load half just touched, so it contributes exactly one hit.

use csim_core::cache::AccessOutcome;
use csim_core::common::data::Operation;
use csim_core::sim::TraceRecord;
use rstest::rstest;

use crate::common::{cache, replayer};

#[rstest]
#[case(AccessOutcome::Hit, 1, 0, 0, "hit")]
#[case(AccessOutcome::HitHit, 2, 0, 0, "hit hit")]
#[case(AccessOutcome::Miss, 0, 1, 0, "miss")]
#[case(AccessOutcome::MissEviction, 0, 1, 1, "miss eviction")]
#[case(AccessOutcome::MissHit, 1, 1, 0, "miss hit")]
#[case(AccessOutcome::MissEvictionHit, 1, 1, 1, "miss eviction hit")]
fn outcome_counts_and_text(
    #[case] outcome: AccessOutcome,
    #[case] hits: u64,
    #[case] misses: u64,
    #[case] evictions: u64,
    #[case] text: &str,
) {
    assert_eq!(outcome.hits(), hits);
    assert_eq!(outcome.misses(), misses);
    assert_eq!(outcome.evictions(), evictions);
    assert_eq!(outcome.to_string(), text);
}

#[test]
fn modify_on_cold_address_is_miss_then_hit() {
    let mut cache = cache(4, 1, 4);
    assert_eq!(
        cache.access_address(0x20, true).unwrap(),
        AccessOutcome::MissHit
    );
    assert_eq!(cache.valid_lines(), 1);
}

#[test]
fn modify_on_conflicting_address_evicts_once() {
    let mut cache = cache(4, 1, 4);
    let _ = cache.access_address(0x110, false).unwrap();
    assert_eq!(
        cache.access_address(0x210, true).unwrap(),
        AccessOutcome::MissEvictionHit
    );
    assert_eq!(cache.valid_lines(), 1);
}

#[test]
fn modify_on_warm_address_is_two_hits() {
    let mut cache = cache(4, 1, 4);
    let _ = cache.access_address(0x20, false).unwrap();
    assert_eq!(
        cache.access_address(0x22, true).unwrap(),
        AccessOutcome::HitHit
    );
}

/// Loads and stores are indistinguishable to the cache.
#[test]
fn store_behaves_like_load() {
    let mut loads = replayer(2, 2, 2);
    let mut stores = replayer(2, 2, 2);
    for address in [0x0u64, 0x40, 0x80, 0x0, 0xc0, 0x40, 0x100] {
        assert_eq!(
            loads.apply(&TraceRecord::new(Operation::Load, address, 4)).unwrap(),
            stores.apply(&TraceRecord::new(Operation::Store, address, 4)).unwrap()
        );
    }
    assert_eq!(loads.stats(), stores.stats());
}

/// A modify leaves the cache in the same state as a single load.
#[test]
fn modify_touches_one_line_once() {
    let mut modify = cache(0, 2, 0);
    let mut load = cache(0, 2, 0);
    for tag in [1u64, 2, 1, 3, 2] {
        let m = modify.access(0, tag, true).unwrap();
        let l = load.access(0, tag, false).unwrap();
        assert_eq!(m.misses(), l.misses());
        assert_eq!(m.evictions(), l.evictions());
        assert_eq!(m.hits(), l.hits() + 1);
    }
    assert_eq!(modify.set(0), load.set(0));
    assert_eq!(modify.clock(), load.clock());
}
