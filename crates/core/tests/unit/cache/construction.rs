//! Cache Construction and Teardown Tests.

use csim_core::CsimError;
use csim_core::cache::{CacheSim, LineState};
use csim_core::config::CacheConfig;
use rstest::rstest;

use crate::common::cache;

/// Every line of a new cache is invalid and untouched.
#[rstest]
#[case(0, 1, 0)]
#[case(1, 1, 1)]
#[case(4, 1, 4)]
#[case(4, 2, 4)]
#[case(5, 4, 5)]
#[case(2, 8, 6)]
fn new_cache_is_cold(#[case] s: u32, #[case] e: usize, #[case] b: u32) {
    let cache = cache(s, e, b);

    assert_eq!(cache.num_sets(), 1 << s);
    assert_eq!(cache.ways(), e);
    assert_eq!(cache.clock(), 0);
    assert_eq!(cache.valid_lines(), 0);
    assert_eq!(cache.sets().count(), 1 << s);
    for set in cache.sets() {
        assert_eq!(set.lines().len(), e);
        for line in set.lines() {
            assert_eq!(line.state(), LineState::Invalid);
            assert_eq!(line.tag(), None);
            assert_eq!(line.last_used(), 0);
        }
    }
}

#[test]
fn layout_matches_config() {
    let cache = cache(3, 2, 5);
    let layout = cache.layout();
    assert_eq!(layout.set_bits(), 3);
    assert_eq!(layout.block_bits(), 5);
    assert_eq!(cache.decode(0x1_2345).set_index, (0x1_2345 >> 5) & 0b111);
}

#[rstest]
#[case::zero_ways(CacheConfig::new(4, 0, 4))]
#[case::too_many_bits(CacheConfig::new(33, 1, 0))]
#[case::wider_than_address(CacheConfig::new(30, 1, 40))]
#[case::block_bits_wrap(CacheConfig::new(1, 1, u32::MAX))]
#[case::too_many_lines(CacheConfig::new(32, 1, 0))]
fn invalid_geometry_is_rejected(#[case] config: CacheConfig) {
    assert!(matches!(
        CacheSim::new(&config),
        Err(CsimError::InvalidConfiguration(_))
    ));
}

#[test]
fn set_index_is_bounds_checked() {
    let mut cache = cache(2, 1, 0);
    let err = cache.access(4, 0, false).unwrap_err();
    assert!(matches!(
        err,
        CsimError::SetIndexOutOfRange { index: 4, sets: 4 }
    ));
    // The failed access must not advance the clock or fill anything.
    assert_eq!(cache.clock(), 0);
    assert_eq!(cache.valid_lines(), 0);
    assert!(cache.set(4).is_none());
    assert!(cache.set(3).is_some());
}

/// Releasing twice is harmless and leaves the cache unusable.
#[test]
fn release_is_idempotent() {
    let mut cache = cache(4, 2, 4);
    let _ = cache.access_address(0x10, false).unwrap();
    assert!(!cache.is_released());

    cache.release();
    assert!(cache.is_released());
    assert_eq!(cache.valid_lines(), 0);
    assert_eq!(cache.sets().count(), 0);

    cache.release();
    assert!(cache.is_released());
    assert_eq!(cache.sets().count(), 0);
    // Geometry is still reported after release.
    assert_eq!(cache.num_sets(), 16);
    assert_eq!(cache.ways(), 2);
}

#[test]
fn access_after_release_fails() {
    let mut cache = cache(1, 1, 1);
    cache.release();
    assert!(matches!(
        cache.access(0, 0, false),
        Err(CsimError::CacheReleased)
    ));
    assert!(matches!(
        cache.access_address(0x0, true),
        Err(CsimError::CacheReleased)
    ));
}

/// Dropping a released cache must not free anything twice.
#[test]
fn drop_after_release() {
    for _ in 0..64 {
        let mut cache = cache(6, 4, 4);
        for address in (0..4096u64).step_by(16) {
            let _ = cache.access_address(address, false).unwrap();
        }
        cache.release();
        cache.release();
        drop(cache);
    }
}
