//! Trace record parsing.
//!
//! Traces follow Valgrind's `--tool=lackey --trace-mem=yes` layout, one access per line:
//!
//! ```text
//! I 0400d7d4,8
//!  M 0421c7f0,4
//!  L 04f6b868,8
//!  S 7ff0005c8,8
//! ```
//!
//! The operation letter is followed by a hexadecimal address and a decimal access
//! size. Leading whitespace (Valgrind indents data accesses) is ignored.

use std::fmt;

use crate::common::data::Operation;
use crate::common::error::TraceParseError;

/// One decoded trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Access kind.
    pub op: Operation,
    /// Accessed address.
    pub address: u64,
    /// Access size in bytes. Parsed but not used: accesses that straddle a block
    /// boundary are treated as touching only the block of `address`.
    pub size: u32,
}

impl TraceRecord {
    /// Creates a record.
    pub const fn new(op: Operation, address: u64, size: u32) -> Self {
        Self { op, address, size }
    }

    /// Parses one trace line.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for a blank line, `Ok(Some(record))` for a valid record, and the
    /// reason for rejection otherwise.
    pub fn parse(line: &str) -> Result<Option<Self>, TraceParseError> {
        let line = line.trim();
        let mut chars = line.chars();
        let Some(code) = chars.next() else {
            return Ok(None);
        };
        let op = Operation::from_code(code).ok_or(TraceParseError::UnknownOperation(code))?;

        let rest = chars.as_str().trim_start();
        if rest.is_empty() {
            return Err(TraceParseError::MissingAddress);
        }

        let (addr_text, size_text) = match rest.split_once(',') {
            Some((addr, size)) => (addr.trim(), Some(size.trim())),
            None => (rest, None),
        };

        let address = parse_hex(addr_text)?;
        let size_text = size_text.ok_or(TraceParseError::MissingSize)?;
        if size_text.is_empty() {
            return Err(TraceParseError::MissingSize);
        }
        let size = size_text
            .parse::<u32>()
            .map_err(|_| TraceParseError::InvalidSize(size_text.to_string()))?;

        Ok(Some(Self { op, address, size }))
    }
}

/// Parses a hexadecimal address with an optional `0x` prefix.
fn parse_hex(text: &str) -> Result<u64, TraceParseError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return Err(TraceParseError::MissingAddress);
    }
    u64::from_str_radix(digits, 16).map_err(|_| TraceParseError::InvalidAddress(text.to_string()))
}

impl fmt::Display for TraceRecord {
    /// Formats the record as it appears in a trace, without indentation (`L 10,1`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.op, self.address, self.size)
    }
}
