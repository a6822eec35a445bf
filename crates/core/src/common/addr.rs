//! Address decomposition.
//!
//! A cache with `2^s` sets and `2^b`-byte blocks splits every 64-bit address into
//! three fields, from most to least significant:
//!
//! ```text
//! | tag (64 - s - b bits) | set index (s bits) | block offset (b bits) |
//! ```
//!
//! Only the tag and set index take part in lookup. The block offset is carried
//! along for diagnostics.

/// Bit layout used to decode addresses for one cache geometry.
///
/// The layout is fixed when the cache is constructed and never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    set_bits: u32,
    block_bits: u32,
    set_mask: u64,
    block_mask: u64,
}

/// An address split into its cache fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// High-order bits identifying the memory block.
    pub tag: u64,
    /// Index of the set the block maps to.
    pub set_index: usize,
    /// Byte offset within the block (unused for lookup).
    pub offset: u64,
}

/// Returns a mask with the low `bits` bits set.
#[inline]
const fn low_mask(bits: u32) -> u64 {
    match 1u64.checked_shl(bits) {
        Some(v) => v - 1,
        None => u64::MAX,
    }
}

impl AddressLayout {
    /// Creates a layout for `2^set_bits` sets and `2^block_bits`-byte blocks.
    ///
    /// The caller is responsible for keeping `set_bits + block_bits <= 64`;
    /// [`CacheConfig::validate`](crate::config::CacheConfig::validate) enforces it.
    pub const fn new(set_bits: u32, block_bits: u32) -> Self {
        Self {
            set_bits,
            block_bits,
            set_mask: low_mask(set_bits),
            block_mask: low_mask(block_bits),
        }
    }

    /// Number of set-index bits (`s`).
    #[inline(always)]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Number of block-offset bits (`b`).
    #[inline(always)]
    pub const fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Mask applied to `address >> b` to extract the set index.
    #[inline(always)]
    pub const fn set_mask(&self) -> u64 {
        self.set_mask
    }

    /// Right shift that isolates the tag (`b + s`).
    #[inline(always)]
    pub const fn tag_shift(&self) -> u32 {
        self.set_bits + self.block_bits
    }

    /// Splits `address` into tag, set index, and block offset.
    ///
    /// A shift of 64 or more yields zero rather than overflowing, so a layout
    /// with `s + b == 64` maps every address to tag 0.
    #[inline]
    pub const fn decode(&self, address: u64) -> DecodedAddress {
        let tag = match address.checked_shr(self.tag_shift()) {
            Some(t) => t,
            None => 0,
        };
        let set_index = match address.checked_shr(self.block_bits) {
            Some(v) => v & self.set_mask,
            None => 0,
        };
        DecodedAddress {
            tag,
            set_index: set_index as usize,
            offset: address & self.block_mask,
        }
    }
}
