//! Trace-driven cache simulator library.
//!
//! This crate replays Valgrind-style memory traces against a set-associative cache
//! and reports hit, miss, and eviction counts under LRU replacement. It provides:
//! 1. **Cache:** Address decomposition, per-set lookup, and LRU victim selection.
//! 2. **Replay:** Trace line parsing and the fold that feeds data accesses into the cache.
//! 3. **Support:** Configuration, error types, statistics, and result reporting.

/// Common types (errors, address layout, operation kinds).
pub mod common;
/// Simulator configuration (cache geometry and replay policy).
pub mod config;
/// Set-associative cache model with LRU replacement.
pub mod cache;
/// Result reporting (summary line and results file).
pub mod report;
/// Trace parsing and replay.
pub mod sim;
/// Aggregated replay statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The cache model; construct with `CacheSim::new`.
pub use crate::cache::CacheSim;
/// Crate-wide error type.
pub use crate::common::error::CsimError;
/// Trace replayer; owns a `CacheSim` and the running totals.
pub use crate::sim::Replayer;
/// Final (hits, misses, evictions) result.
pub use crate::stats::ReplayStats;
