//! Error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Simulator Errors:** Configuration, replay, and reporting failures surfaced to the caller.
//! 2. **Parse Errors:** The specific reason a single trace line was rejected.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring the cache or replaying a trace.
#[derive(Debug, Error)]
pub enum CsimError {
    /// Cache geometry is nonsensical (zero ways, too many address bits, ...).
    ///
    /// Raised before any storage is allocated; no partial cache is ever returned.
    #[error("invalid cache configuration: {0}")]
    InvalidConfiguration(String),

    /// A trace line could not be parsed and the replay policy is `Abort`.
    #[error("malformed trace record at line {line}: {reason}")]
    MalformedTrace {
        /// One-based line number within the trace.
        line: usize,
        /// Why the line was rejected.
        reason: TraceParseError,
    },

    /// The trace source could not be opened or read.
    #[error("trace source unavailable ({origin}): {source}")]
    CacheUnavailable {
        /// Path or description of the trace source.
        origin: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A set index beyond the configured number of sets was requested.
    #[error("set index {index} out of range (cache has {sets} sets)")]
    SetIndexOutOfRange {
        /// Requested set.
        index: usize,
        /// Number of sets in the cache.
        sets: usize,
    },

    /// A set holds no lines, so there is nothing to fill on a miss.
    #[error("set {index} has no lines to fill")]
    EmptySet {
        /// Set that was accessed.
        index: usize,
    },

    /// The cache storage was already released.
    #[error("cache storage has been released")]
    CacheReleased,

    /// The final counters could not be rendered as JSON.
    #[error("could not serialize statistics: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The results file could not be written.
    #[error("could not write results to '{}': {source}", path.display())]
    ReportWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Reasons a single trace line is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraceParseError {
    /// The operation letter is not one of `I`, `L`, `S`, `M`.
    #[error("unknown operation '{0}'")]
    UnknownOperation(char),

    /// Nothing follows the operation letter.
    #[error("missing address")]
    MissingAddress,

    /// The address is not a hexadecimal 64-bit value.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The `,size` suffix is absent.
    #[error("missing access size")]
    MissingSize,

    /// The size is not a decimal integer.
    #[error("invalid access size '{0}'")]
    InvalidSize(String),
}
