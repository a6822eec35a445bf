//! Trace parsing and replay.

/// Trace-driven replay loop.
pub mod replay;

/// Trace line parsing.
pub mod trace;

pub use replay::{Replayer, replay_file, replay_file_with};
pub use trace::TraceRecord;
