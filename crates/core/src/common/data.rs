//! Memory operation kinds.
//!
//! Valgrind's `--trace-mem` output tags each access with a single letter.
//! These are used for the following:
//! 1. **Filtering:** Instruction fetches never reach the data cache.
//! 2. **Accounting:** A modify counts as a load followed by a store.
//! 3. **Verbose Output:** Echoing the record back next to its outcome.

use std::fmt;

/// Kind of memory access recorded in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Instruction fetch (`I`). Ignored by the data cache.
    InstructionFetch,

    /// Data load (`L`).
    Load,

    /// Data store (`S`).
    Store,

    /// Data modify (`M`): a load immediately followed by a store to the same address.
    Modify,
}

impl Operation {
    /// Decodes the trace letter for an operation.
    ///
    /// # Returns
    ///
    /// The operation, or `None` if `code` is not one of `I`, `L`, `S`, `M`.
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(Self::InstructionFetch),
            'L' => Some(Self::Load),
            'S' => Some(Self::Store),
            'M' => Some(Self::Modify),
            _ => None,
        }
    }

    /// Returns the trace letter for this operation.
    pub const fn code(self) -> char {
        match self {
            Self::InstructionFetch => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }

    /// True for loads, stores, and modifies.
    #[inline]
    pub const fn is_data(self) -> bool {
        !matches!(self, Self::InstructionFetch)
    }

    /// True for `M` records.
    #[inline]
    pub const fn is_modify(self) -> bool {
        matches!(self, Self::Modify)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
