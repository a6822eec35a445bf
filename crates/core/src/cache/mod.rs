//! Set-Associative Cache Simulator.
//!
//! This module implements the cache model driven by the trace replayer. The cache
//! has `2^s` sets of `E` lines each and replaces lines in LRU order. It only
//! tracks presence: there is no data, no dirty state, and no write policy, so an
//! access resolves to a combination of hits, a miss, and an eviction.

/// Cache line and set storage.
pub mod line;

/// LRU logical clock and victim selection.
pub mod lru;

use std::fmt;

pub use self::line::{CacheLine, CacheSet, LineState};
pub use self::lru::LruClock;
use crate::common::addr::{AddressLayout, DecodedAddress};
use crate::common::error::CsimError;
use crate::config::CacheConfig;

/// Result of a single cache access.
///
/// A modify is a load followed by a store to the same block, so its second half
/// always hits and adds one extra hit to whatever the first half produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessOutcome {
    /// Tag present.
    Hit,
    /// Tag present, modify (load hit + store hit).
    HitHit,
    /// Tag absent, filled an unused line.
    Miss,
    /// Tag absent, replaced a valid line.
    MissEviction,
    /// Tag absent, filled an unused line, then the store half of a modify hit.
    MissHit,
    /// Tag absent, replaced a valid line, then the store half of a modify hit.
    MissEvictionHit,
}

impl AccessOutcome {
    /// Builds the outcome for a lookup result.
    const fn resolve(hit: bool, evicted: bool, is_modify: bool) -> Self {
        match (hit, evicted, is_modify) {
            (true, _, false) => Self::Hit,
            (true, _, true) => Self::HitHit,
            (false, false, false) => Self::Miss,
            (false, true, false) => Self::MissEviction,
            (false, false, true) => Self::MissHit,
            (false, true, true) => Self::MissEvictionHit,
        }
    }

    /// Hits contributed by this access (0, 1, or 2).
    pub const fn hits(self) -> u64 {
        match self {
            Self::Hit | Self::MissHit | Self::MissEvictionHit => 1,
            Self::HitHit => 2,
            Self::Miss | Self::MissEviction => 0,
        }
    }

    /// Misses contributed by this access (0 or 1).
    pub const fn misses(self) -> u64 {
        match self {
            Self::Hit | Self::HitHit => 0,
            _ => 1,
        }
    }

    /// Evictions contributed by this access (0 or 1).
    pub const fn evictions(self) -> u64 {
        match self {
            Self::MissEviction | Self::MissEvictionHit => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for AccessOutcome {
    /// Space-separated event list, e.g. `miss eviction hit`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Hit => "hit",
            Self::HitHit => "hit hit",
            Self::Miss => "miss",
            Self::MissEviction => "miss eviction",
            Self::MissHit => "miss hit",
            Self::MissEvictionHit => "miss eviction hit",
        };
        f.write_str(text)
    }
}

/// Set-associative cache with LRU replacement.
///
/// Storage is an owned `Vec` of sets, each an owned `Vec` of lines. It is freed by
/// [`CacheSim::release`] or on drop, whichever comes first.
#[derive(Debug)]
pub struct CacheSim {
    sets: Vec<CacheSet>,
    layout: AddressLayout,
    num_sets: usize,
    ways: usize,
    clock: LruClock,
    released: bool,
}

impl CacheSim {
    /// Creates an empty cache with the given geometry.
    ///
    /// # Arguments
    ///
    /// * `config` - Set-index bits, associativity, and block-offset bits.
    ///
    /// # Returns
    ///
    /// A cache with `2^s` sets of `E` invalid lines, or `InvalidConfiguration`
    /// if the geometry fails validation. Nothing is allocated on failure.
    pub fn new(config: &CacheConfig) -> Result<Self, CsimError> {
        config.validate()?;

        let num_sets = config.num_sets();
        let sets = (0..num_sets).map(|_| CacheSet::new(config.ways)).collect();

        tracing::debug!(
            sets = num_sets,
            ways = config.ways,
            block_bytes = config.block_bytes(),
            "cache constructed"
        );

        Ok(Self {
            sets,
            layout: AddressLayout::new(config.set_bits, config.block_bits),
            num_sets,
            ways: config.ways,
            clock: LruClock::new(),
            released: false,
        })
    }

    /// Address layout used for decoding.
    #[inline(always)]
    pub const fn layout(&self) -> AddressLayout {
        self.layout
    }

    /// Number of sets (`2^s`).
    #[inline(always)]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Lines per set (`E`).
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Logical time of the most recent access.
    pub const fn clock(&self) -> u64 {
        self.clock.now()
    }

    /// Splits an address into tag, set index, and block offset.
    #[inline]
    pub const fn decode(&self, address: u64) -> DecodedAddress {
        self.layout.decode(address)
    }

    /// Borrows one set, or `None` if the index is out of range or the cache was released.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    /// Iterates over all sets in index order.
    pub fn sets(&self) -> impl Iterator<Item = &CacheSet> {
        self.sets.iter()
    }

    /// Total number of filled lines across all sets.
    pub fn valid_lines(&self) -> usize {
        self.sets.iter().map(CacheSet::valid_count).sum()
    }

    /// Looks up `tag` in `set_index` and updates the set.
    ///
    /// On a hit the matching line becomes most recently used. On a miss the LRU
    /// victim (or the first unused line) receives the tag and becomes most
    /// recently used. A modify adds one hit for its store half in both cases.
    ///
    /// # Arguments
    ///
    /// * `set_index` - Target set, as produced by [`CacheSim::decode`].
    /// * `tag` - Tag to look up.
    /// * `is_modify` - Whether the access is a load-then-store.
    ///
    /// # Errors
    ///
    /// `CacheReleased` after [`CacheSim::release`], `SetIndexOutOfRange` if
    /// `set_index >= 2^s`, or `EmptySet` if a miss finds no line to fill.
    pub fn access(
        &mut self,
        set_index: usize,
        tag: u64,
        is_modify: bool,
    ) -> Result<AccessOutcome, CsimError> {
        if self.released {
            return Err(CsimError::CacheReleased);
        }
        let sets = self.num_sets;
        let set = self
            .sets
            .get_mut(set_index)
            .ok_or(CsimError::SetIndexOutOfRange {
                index: set_index,
                sets,
            })?;

        let (way, hit, evicted) = match set.find(tag) {
            Some(way) => (way, true, false),
            None => {
                let way = LruClock::victim(set.lines())
                    .ok_or(CsimError::EmptySet { index: set_index })?;
                let evicted = set.lines_mut()[way].fill(tag).is_some();
                (way, false, evicted)
            }
        };

        let stamp = self.clock.stamp();
        set.lines_mut()[way].touch(stamp);

        Ok(AccessOutcome::resolve(hit, evicted, is_modify))
    }

    /// Decodes `address` and performs [`CacheSim::access`] on it.
    pub fn access_address(
        &mut self,
        address: u64,
        is_modify: bool,
    ) -> Result<AccessOutcome, CsimError> {
        let decoded = self.decode(address);
        self.access(decoded.set_index, decoded.tag, is_modify)
    }

    /// Frees all set and line storage.
    ///
    /// Calling this more than once is a no-op. Every later access fails with
    /// `CacheReleased`.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.sets = Vec::new();
        self.released = true;
        tracing::debug!(sets = self.num_sets, ways = self.ways, "cache released");
    }

    /// True once [`CacheSim::release`] has run.
    pub const fn is_released(&self) -> bool {
        self.released
    }
}
