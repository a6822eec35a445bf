//! Unit tests for the cache model.

/// Construction, inspection, and teardown.
pub mod construction;


/// Access outcomes, including modify accounting.
pub mod outcomes;
