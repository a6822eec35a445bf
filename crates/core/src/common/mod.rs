//! Common utilities and types shared by the cache model and the replayer.
//!
//! This module provides the following:
//! 1. **Address Layout:** Splitting a 64-bit address into tag, set index, and block offset.
//! 2. **Operations:** The access kinds that appear in a trace.
//! 3. **Error Handling:** The crate error type and trace parse errors.

/// Address decomposition (tag / set index / block offset).
pub mod addr;

/// Memory operation kinds.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressLayout, DecodedAddress};
pub use data::Operation;
pub use error::{CsimError, TraceParseError};
