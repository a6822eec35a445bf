//! Replay statistics.
//!
//! This module tracks the result of a trace replay. It provides:
//! 1. **Counters:** Hits, misses, and evictions folded in once per data access.
//! 2. **Diagnostics:** The number of malformed lines skipped along the way.
//! 3. **Derived Metrics:** Access totals and hit/miss rates.

use std::fmt;

use serde::Serialize;

use crate::cache::AccessOutcome;

/// Aggregated counters for one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Accesses (or modify halves) that found their block in the cache.
    pub hits: u64,
    /// Accesses that did not find their block.
    pub misses: u64,
    /// Misses that displaced a valid line.
    pub evictions: u64,
    /// Trace lines skipped because they did not parse.
    pub malformed: u64,
}

impl ReplayStats {
    /// Folds one access outcome into the counters.
    #[inline]
    pub const fn record(&mut self, outcome: AccessOutcome) {
        self.hits += outcome.hits();
        self.misses += outcome.misses();
        self.evictions += outcome.evictions();
    }

    /// Counts one skipped malformed line.
    #[inline]
    pub const fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    /// The `(hits, misses, evictions)` triple.
    pub const fn triple(&self) -> (u64, u64, u64) {
        (self.hits, self.misses, self.evictions)
    }

    /// Total cache accesses; a modify counts twice.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate in percent, 0 when nothing was accessed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Miss rate in percent, 0 when nothing was accessed.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses() == 0 {
            0.0
        } else {
            100.0 - self.hit_rate()
        }
    }
}

impl fmt::Display for ReplayStats {
    /// `hits:<h> misses:<m> evictions:<e>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}
