//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** A small direct-mapped cache (`s = 4`, `E = 1`, `b = 4`) and skip-on-error replay.
//! 2. **Structures:** Cache geometry and replay behaviour.
//! 3. **Validation:** Rejection of geometries that cannot be built.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or built directly in code.

use serde::Deserialize;

use crate::common::error::CsimError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Set-index bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Lines per set (direct-mapped).
    pub const WAYS: usize = 1;

    /// Block-offset bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Largest accepted number of set-index bits.
pub const MAX_SET_BITS: u32 = 32;

/// Largest accepted total line count (`2^s * E`).
///
/// Storage is allocated eagerly, so this bounds the simulator at a few hundred
/// megabytes of line state.
pub const MAX_CACHE_LINES: usize = 1 << 24;

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = u64::BITS;

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use csim_core::config::{Config, MalformedPolicy};
///
/// let json = r#"{
///     "cache": { "set_bits": 5, "ways": 1, "block_bits": 5 },
///     "replay": { "on_malformed": "Abort" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.num_sets(), 32);
/// assert_eq!(config.replay.on_malformed, MalformedPolicy::Abort);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Cache geometry
    #[serde(default)]
    pub cache: CacheConfig,
    /// Trace replay behaviour
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// Deserialization failures (including negative bit widths, which do not fit
    /// the unsigned fields) are reported as `InvalidConfiguration`.
    pub fn from_json(json: &str) -> Result<Self, CsimError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CsimError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section of the configuration.
    pub fn validate(&self) -> Result<(), CsimError> {
        self.cache.validate()
    }
}

/// Cache geometry: `2^set_bits` sets of `ways` lines holding `2^block_bits`-byte blocks.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Number of set-index bits (`s`)
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,

    /// Associativity, i.e. lines per set (`E`)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Number of block-offset bits (`b`)
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,
}

impl CacheConfig {
    /// Creates a geometry from unsigned parameters without validating it.
    pub const fn new(set_bits: u32, ways: usize, block_bits: u32) -> Self {
        Self {
            set_bits,
            ways,
            block_bits,
        }
    }

    /// Creates a geometry from signed parameters, as typed by a user.
    ///
    /// Negative values are rejected here; the result is fully validated.
    pub fn from_signed(set_bits: i64, ways: i64, block_bits: i64) -> Result<Self, CsimError> {
        let set_bits = u32::try_from(set_bits).map_err(|_| {
            CsimError::InvalidConfiguration(format!(
                "set-index bits (s) must be non-negative, got {set_bits}"
            ))
        })?;
        let ways = usize::try_from(ways).map_err(|_| {
            CsimError::InvalidConfiguration(format!(
                "associativity (E) must be non-negative, got {ways}"
            ))
        })?;
        let block_bits = u32::try_from(block_bits).map_err(|_| {
            CsimError::InvalidConfiguration(format!(
                "block-offset bits (b) must be non-negative, got {block_bits}"
            ))
        })?;
        let config = Self::new(set_bits, ways, block_bits);
        config.validate()?;
        Ok(config)
    }

    /// Returns the default number of set-index bits.
    fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default number of block-offset bits.
    fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Number of sets (`2^s`).
    ///
    /// Only meaningful for a validated geometry.
    pub const fn num_sets(&self) -> usize {
        1usize << self.set_bits
    }

    /// Block size in bytes (`2^b`), saturating at `u64::MAX` for `b == 64`.
    pub const fn block_bytes(&self) -> u64 {
        match 1u64.checked_shl(self.block_bits) {
            Some(v) => v,
            None => u64::MAX,
        }
    }

    /// Checks that the geometry can be built.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `ways` is zero, `set_bits` exceeds [`MAX_SET_BITS`],
    /// `set_bits + block_bits` exceeds the 64-bit address width, or the total
    /// line count overflows `usize` or exceeds [`MAX_CACHE_LINES`].
    pub fn validate(&self) -> Result<(), CsimError> {
        if self.ways == 0 {
            return Err(CsimError::InvalidConfiguration(
                "associativity (E) must be at least 1".to_string(),
            ));
        }
        if self.set_bits > MAX_SET_BITS {
            return Err(CsimError::InvalidConfiguration(format!(
                "set-index bits (s) must be at most {MAX_SET_BITS}, got {}",
                self.set_bits
            )));
        }
        let width = self.set_bits.checked_add(self.block_bits);
        if width.is_none_or(|w| w > ADDRESS_BITS) {
            return Err(CsimError::InvalidConfiguration(format!(
                "s + b must not exceed {ADDRESS_BITS} address bits, got {} + {}",
                self.set_bits, self.block_bits
            )));
        }
        let lines = 1usize
            .checked_shl(self.set_bits)
            .and_then(|sets| sets.checked_mul(self.ways));
        match lines {
            None => Err(CsimError::InvalidConfiguration(format!(
                "2^{} sets x {} ways overflows the addressable line count",
                self.set_bits, self.ways
            ))),
            Some(lines) if lines > MAX_CACHE_LINES => {
                Err(CsimError::InvalidConfiguration(format!(
                    "2^{} sets x {} ways is {lines} lines, more than the {MAX_CACHE_LINES} supported",
                    self.set_bits, self.ways
                )))
            }
            Some(_) => Ok(()),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(
            defaults::SET_BITS,
            defaults::WAYS,
            defaults::BLOCK_BITS,
        )
    }
}

/// Trace replay behaviour.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct ReplayConfig {
    /// What to do with trace lines that do not parse
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

/// Handling of malformed trace lines.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Log a warning, count the line, and keep replaying.
    #[default]
    #[serde(alias = "skip")]
    Skip,
    /// Stop the replay with `MalformedTrace`.
    #[serde(alias = "abort")]
    Abort,
}
