//! Least Recently Used (LRU) Replacement.
//!
//! Every access stamps the touched line with the next value of a logical clock.
//! The victim in a set is the first line that was never filled or, once the set
//! is full, the line with the oldest stamp.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `stamp()`: O(1)
//!   - `victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** One `u64` per line plus a single clock for the whole cache
//! - **Best Case:** Working sets that fit within the associativity
//! - **Worst Case:** Cyclic scans over W + 1 blocks of one set (every access misses)

use super::line::CacheLine;

/// Logical clock shared by every set of a cache.
///
/// Only the relative order of stamps within one set matters, so a single
/// counter serves the whole cache. Stamps start at 1 and are never reused;
/// untouched lines keep stamp 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LruClock {
    now: u64,
}

impl LruClock {
    /// Creates a clock that has not issued any stamp yet.
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Advances the clock and returns the new stamp.
    #[inline]
    pub const fn stamp(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    /// Most recently issued stamp (0 before the first access).
    #[inline]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Selects the way to replace in `lines`.
    ///
    /// Invalid lines win over valid ones; among equals the lowest way wins.
    ///
    /// # Returns
    ///
    /// The victim way, or `None` for an empty slice.
    pub fn victim(lines: &[CacheLine]) -> Option<usize> {
        lines
            .iter()
            .enumerate()
            .min_by_key(|(_, line)| (line.is_valid(), line.last_used()))
            .map(|(way, _)| way)
    }

    /// Way of the most recently used line in `lines`, if any line was touched.
    pub fn most_recent(lines: &[CacheLine]) -> Option<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_valid())
            .max_by_key(|(_, line)| line.last_used())
            .map(|(way, _)| way)
    }
}
