//! Trace Replayer.
//!
//! Folds a trace into a [`ReplayStats`] by feeding every data access to a
//! [`CacheSim`]. It performs the following:
//! 1. **Parsing:** Each line is decoded into a [`TraceRecord`]; blank lines are ignored.
//! 2. **Filtering:** Instruction fetches are dropped before they reach the cache.
//! 3. **Accounting:** The outcome of each access is added to the running totals.
//! 4. **Error Policy:** Malformed lines are skipped with a warning or abort the replay.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::trace::TraceRecord;
use crate::cache::{AccessOutcome, CacheSim};
use crate::common::error::CsimError;
use crate::config::{Config, MalformedPolicy};
use crate::stats::ReplayStats;

/// Replays trace records against an owned cache.
#[derive(Debug)]
pub struct Replayer {
    cache: CacheSim,
    stats: ReplayStats,
    policy: MalformedPolicy,
}

impl Replayer {
    /// Wraps a freshly built cache with zeroed counters.
    pub const fn new(cache: CacheSim, policy: MalformedPolicy) -> Self {
        Self {
            cache,
            stats: ReplayStats {
                hits: 0,
                misses: 0,
                evictions: 0,
                malformed: 0,
            },
            policy,
        }
    }

    /// Builds the cache described by `config` and wraps it.
    pub fn from_config(config: &Config) -> Result<Self, CsimError> {
        let cache = CacheSim::new(&config.cache)?;
        Ok(Self::new(cache, config.replay.on_malformed))
    }

    /// The cache being driven.
    pub const fn cache(&self) -> &CacheSim {
        &self.cache
    }

    /// Running totals so far.
    pub const fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Malformed-line policy in effect.
    pub const fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Applies one decoded record.
    ///
    /// # Returns
    ///
    /// `None` for instruction fetches, which leave the cache and the counters
    /// untouched; otherwise the access outcome, already folded into the totals.
    pub fn apply(&mut self, record: &TraceRecord) -> Result<Option<AccessOutcome>, CsimError> {
        if !record.op.is_data() {
            return Ok(None);
        }
        let decoded = self.cache.decode(record.address);
        let outcome = self
            .cache
            .access(decoded.set_index, decoded.tag, record.op.is_modify())?;
        self.stats.record(outcome);

        tracing::trace!(
            op = %record.op,
            address = record.address,
            set = decoded.set_index,
            tag = decoded.tag,
            %outcome,
            "access"
        );
        Ok(Some(outcome))
    }

    /// Parses and applies one trace line.
    ///
    /// `line_no` is one-based and only used for diagnostics.
    ///
    /// # Errors
    ///
    /// `MalformedTrace` if the line does not parse and the policy is `Abort`.
    pub fn feed_line(
        &mut self,
        line_no: usize,
        line: &str,
    ) -> Result<Option<(TraceRecord, AccessOutcome)>, CsimError> {
        let record = match TraceRecord::parse(line) {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(reason) => match self.policy {
                MalformedPolicy::Skip => {
                    tracing::warn!(line = line_no, %reason, text = line.trim(), "skipping malformed trace record");
                    self.stats.record_malformed();
                    return Ok(None);
                }
                MalformedPolicy::Abort => {
                    return Err(CsimError::MalformedTrace {
                        line: line_no,
                        reason,
                    });
                }
            },
        };
        Ok(self.apply(&record)?.map(|outcome| (record, outcome)))
    }

    /// Replays in-memory trace lines.
    pub fn replay_lines<I, S>(&mut self, lines: I) -> Result<ReplayStats, CsimError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (idx, line) in lines.into_iter().enumerate() {
            let _ = self.feed_line(idx + 1, line.as_ref())?;
        }
        Ok(self.stats)
    }

    /// Replays every line of `reader`.
    ///
    /// # Arguments
    ///
    /// * `reader` - Trace source.
    /// * `origin` - Name of the source, used in error messages.
    pub fn replay_reader<R: BufRead>(
        &mut self,
        reader: R,
        origin: &str,
    ) -> Result<ReplayStats, CsimError> {
        self.replay_reader_with(reader, origin, |_, _| {})
    }

    /// Like [`Replayer::replay_reader`], calling `observer` after every applied data access.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily and then handled by the
    /// malformed-line policy; only genuine read failures abort the replay.
    ///
    /// # Errors
    ///
    /// `CacheUnavailable` if reading fails, `MalformedTrace` under `Abort`.
    pub fn replay_reader_with<R, F>(
        &mut self,
        reader: R,
        origin: &str,
        mut observer: F,
    ) -> Result<ReplayStats, CsimError>
    where
        R: BufRead,
        F: FnMut(&TraceRecord, AccessOutcome),
    {
        for (idx, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes.map_err(|source| CsimError::CacheUnavailable {
                origin: origin.to_string(),
                source,
            })?;
            let line = String::from_utf8_lossy(&bytes);
            if let Some((record, outcome)) = self.feed_line(idx + 1, &line)? {
                observer(&record, outcome);
            }
        }
        Ok(self.stats)
    }

    /// Releases the cache and returns the final totals.
    pub fn finish(mut self) -> ReplayStats {
        self.cache.release();
        self.stats
    }
}

/// Replays the trace file at `path` with a cache built from `config`.
pub fn replay_file(path: impl AsRef<Path>, config: &Config) -> Result<ReplayStats, CsimError> {
    replay_file_with(path, config, |_, _| {})
}

/// Like [`replay_file`], calling `observer` after every applied data access.
///
/// # Errors
///
/// `InvalidConfiguration` for a bad geometry (checked before the file is opened),
/// `CacheUnavailable` if the file cannot be opened or read, and `MalformedTrace`
/// under the `Abort` policy.
pub fn replay_file_with<F>(
    path: impl AsRef<Path>,
    config: &Config,
    observer: F,
) -> Result<ReplayStats, CsimError>
where
    F: FnMut(&TraceRecord, AccessOutcome),
{
    let path = path.as_ref();
    let origin = path.display().to_string();
    let mut replayer = Replayer::from_config(config)?;

    let file = File::open(path).map_err(|source| CsimError::CacheUnavailable {
        origin: origin.clone(),
        source,
    })?;
    let _ = replayer.replay_reader_with(BufReader::new(file), &origin, observer)?;

    let stats = replayer.finish();
    tracing::debug!(trace = %origin, %stats, malformed = stats.malformed, "replay finished");
    Ok(stats)
}
