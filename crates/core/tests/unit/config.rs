//! # Configuration Tests
//!
//! Defaults, JSON deserialization, and geometry validation.

use csim_core::CsimError;
use csim_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.cache, CacheConfig::new(4, 1, 4));
    assert_eq!(config.replay.on_malformed, MalformedPolicy::Skip);
    assert!(config.validate().is_ok());
}

#[test]
fn test_cache_config_derived_sizes() {
    let cache = CacheConfig::new(5, 2, 6);
    assert_eq!(cache.num_sets(), 32);
    assert_eq!(cache.block_bytes(), 64);
    assert_eq!(CacheConfig::new(0, 1, 64).block_bytes(), u64::MAX);
}

#[test]
fn test_from_json_full() {
    let json = r#"{
        "cache": { "set_bits": 8, "ways": 2, "block_bits": 4 },
        "replay": { "on_malformed": "Abort" }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(
        config,
        Config {
            cache: CacheConfig::new(8, 2, 4),
            replay: ReplayConfig {
                on_malformed: MalformedPolicy::Abort
            },
        }
    );
}

#[test]
fn test_from_json_partial_uses_defaults() {
    let config = Config::from_json(r#"{ "cache": { "ways": 4 } }"#).unwrap();
    assert_eq!(config.cache, CacheConfig::new(4, 4, 4));
    assert_eq!(config.replay.on_malformed, MalformedPolicy::Skip);

    let empty = Config::from_json("{}").unwrap();
    assert_eq!(empty, Config::default());
}

#[rstest]
#[case::lowercase_skip(r#""skip""#, MalformedPolicy::Skip)]
#[case::lowercase_abort(r#""abort""#, MalformedPolicy::Abort)]
#[case::pascal_skip(r#""Skip""#, MalformedPolicy::Skip)]
fn test_policy_aliases(#[case] value: &str, #[case] expected: MalformedPolicy) {
    let json = format!(r#"{{ "replay": {{ "on_malformed": {value} }} }}"#);
    assert_eq!(
        Config::from_json(&json).unwrap().replay.on_malformed,
        expected
    );
}

#[rstest]
#[case::negative_set_bits(r#"{ "cache": { "set_bits": -1 } }"#)]
#[case::negative_ways(r#"{ "cache": { "ways": -2 } }"#)]
#[case::zero_ways(r#"{ "cache": { "ways": 0 } }"#)]
#[case::too_wide(r#"{ "cache": { "set_bits": 32, "block_bits": 40 } }"#)]
#[case::block_bits_wraps_u32(r#"{ "cache": { "set_bits": 1, "ways": 1, "block_bits": 4294967295 } }"#)]
#[case::too_many_lines(r#"{ "cache": { "set_bits": 32, "ways": 1, "block_bits": 0 } }"#)]
#[case::unknown_policy(r#"{ "replay": { "on_malformed": "retry" } }"#)]
#[case::not_json("s=4 E=1 b=4")]
fn test_from_json_rejects(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(CsimError::InvalidConfiguration(_))
    ));
}

#[rstest]
#[case::zero_ways(4, 0, 4)]
#[case::too_many_set_bits(33, 1, 0)]
#[case::exceeds_address(20, 1, 45)]
#[case::width_overflows_u32(1, 1, u32::MAX)]
#[case::width_overflows_both(u32::MAX, 1, u32::MAX)]
#[case::max_set_bits_too_many_lines(32, 1, 0)]
#[case::associativity_too_many_lines(20, 32, 4)]
fn test_validate_rejects(#[case] s: u32, #[case] e: usize, #[case] b: u32) {
    let err = CacheConfig::new(s, e, b).validate().unwrap_err();
    assert!(matches!(err, CsimError::InvalidConfiguration(_)));
}

#[rstest]
#[case::single_line(0, 1, 0)]
#[case::lab_small(1, 1, 1)]
#[case::lab_medium(4, 2, 4)]
#[case::full_width(16, 1, 48)]
#[case::largest_direct_mapped(24, 1, 0)]
#[case::largest_fully_associative(0, MAX_CACHE_LINES, 6)]
fn test_validate_accepts(#[case] s: u32, #[case] e: usize, #[case] b: u32) {
    assert!(CacheConfig::new(s, e, b).validate().is_ok());
}

#[test]
fn test_validate_rejects_line_count_overflow() {
    let err = CacheConfig::new(32, usize::MAX, 0).validate().unwrap_err();
    assert!(err.to_string().contains("overflows"));
}

#[rstest]
#[case::negative_s(-1, 1, 4, "set-index bits")]
#[case::negative_e(4, -1, 4, "associativity")]
#[case::negative_b(4, 1, -3, "block-offset bits")]
#[case::zero_e(4, 0, 4, "at least 1")]
fn test_from_signed_rejects(
    #[case] s: i64,
    #[case] e: i64,
    #[case] b: i64,
    #[case] needle: &str,
) {
    let err = CacheConfig::from_signed(s, e, b).unwrap_err();
    assert!(
        err.to_string().contains(needle),
        "'{err}' should mention '{needle}'"
    );
}

#[test]
fn test_from_signed_accepts() {
    assert_eq!(
        CacheConfig::from_signed(4, 2, 4).unwrap(),
        CacheConfig::new(4, 2, 4)
    );
}

#[test]
fn test_from_signed_rejects_block_bits_wrapping_u32() {
    let err = CacheConfig::from_signed(1, 1, i64::from(u32::MAX)).unwrap_err();
    assert!(matches!(err, CsimError::InvalidConfiguration(_)));
    assert!(err.to_string().contains("address bits"));
}

#[test]
fn test_validate_rejects_line_count_above_cap() {
    let err = CacheConfig::new(24, 2, 4).validate().unwrap_err();
    assert!(err.to_string().contains("supported"), "{err}");
    assert!(CacheConfig::new(23, 2, 4).validate().is_ok());
}
