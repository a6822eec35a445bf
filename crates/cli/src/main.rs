//! Cache simulator CLI.
//!
//! This binary replays a Valgrind memory trace through a set-associative LRU cache. It performs:
//! 1. **Configuration:** Cache geometry from `-s/-E/-b` flags, optionally layered over a JSON config file.
//! 2. **Replay:** Every data access in the trace is simulated; `-v` echoes each one with its outcome.
//! 3. **Reporting:** Prints `hits:<h> misses:<m> evictions:<e>` and writes the results sidecar file.

mod logger;

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use csim_core::config::{CacheConfig, Config, MalformedPolicy};
use csim_core::report;
use csim_core::sim::{replay_file, replay_file_with};
use csim_core::{CsimError, ReplayStats};

#[derive(Parser, Debug)]
#[command(
    name = "csim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator (LRU)",
    long_about = "Replay a Valgrind memory trace through a cache with 2^s sets of E lines holding 2^b-byte blocks.\n\nInstruction fetches (I) are ignored; loads (L) and stores (S) are one access each; modifies (M) are a load followed by a store.\n\nExamples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 8 -E 2 -b 4 -t traces/trans.trace\n  csim --config cache.json -t traces/long.trace --json"
)]
struct Cli {
    /// Number of set index bits (the cache has 2^s sets).
    #[arg(short = 's', allow_negative_numbers = true)]
    set_bits: Option<i64>,

    /// Associativity (number of lines per set).
    #[arg(short = 'E', allow_negative_numbers = true)]
    ways: Option<i64>,

    /// Number of block bits (blocks are 2^b bytes).
    #[arg(short = 'b', allow_negative_numbers = true)]
    block_bits: Option<i64>,

    /// Valgrind trace to replay.
    #[arg(short = 't')]
    trace: PathBuf,

    /// Print every data access with its outcome.
    #[arg(short = 'v')]
    verbose: bool,

    /// JSON configuration file; -s/-E/-b override its cache section.
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to do with trace lines that do not parse.
    #[arg(long, value_enum)]
    on_malformed: Option<MalformedArg>,

    /// Also print the final counters as JSON.
    #[arg(long)]
    json: bool,

    /// Where to write the results file.
    #[arg(long, default_value = report::RESULTS_FILE)]
    results: PathBuf,

    /// Do not write the results file.
    #[arg(long)]
    no_results: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long)]
    debug: bool,
}

/// Command-line spelling of [`MalformedPolicy`].
#[derive(Clone, Copy, Debug, ValueEnum)]
enum MalformedArg {
    /// Warn and continue.
    Skip,
    /// Stop at the first malformed line.
    Abort,
}

impl From<MalformedArg> for MalformedPolicy {
    fn from(arg: MalformedArg) -> Self {
        match arg {
            MalformedArg::Skip => Self::Skip,
            MalformedArg::Abort => Self::Abort,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Builds the configuration, replays the trace, and reports the result.
fn run(cli: &Cli) -> Result<(), CsimError> {
    let config = build_config(cli)?;

    let stats = if cli.verbose {
        replay_file_with(&cli.trace, &config, |record, outcome| {
            println!("{record} {outcome}");
        })?
    } else {
        replay_file(&cli.trace, &config)?
    };

    report_stats(cli, &stats)
}

/// Resolves the run configuration from the optional config file and the flags.
///
/// Without `--config`, all of `-s`, `-E`, and `-b` are required.
fn build_config(cli: &Cli) -> Result<Config, CsimError> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| {
                CsimError::InvalidConfiguration(format!(
                    "could not read config '{}': {e}",
                    path.display()
                ))
            })?;
            Config::from_json(&json)?
        }
        None => {
            if cli.set_bits.is_none() || cli.ways.is_none() || cli.block_bits.is_none() {
                return Err(CsimError::InvalidConfiguration(
                    "-s, -E and -b are required unless --config is given".to_string(),
                ));
            }
            Config::default()
        }
    };

    config.cache = CacheConfig::from_signed(
        cli.set_bits
            .unwrap_or_else(|| i64::from(config.cache.set_bits)),
        cli.ways
            .unwrap_or_else(|| i64::try_from(config.cache.ways).unwrap_or(i64::MAX)),
        cli.block_bits
            .unwrap_or_else(|| i64::from(config.cache.block_bits)),
    )?;
    if let Some(policy) = cli.on_malformed {
        config.replay.on_malformed = policy.into();
    }

    tracing::debug!(
        ?config,
        block_bytes = config.cache.block_bytes(),
        "configuration resolved"
    );
    Ok(config)
}

/// Prints the summary line (and JSON if requested) and writes the results file.
fn report_stats(cli: &Cli, stats: &ReplayStats) -> Result<(), CsimError> {
    if stats.malformed > 0 {
        tracing::warn!(count = stats.malformed, "malformed trace records were skipped");
    }

    println!("{}", report::summary_line(stats));
    if cli.json {
        println!("{}", report::stats_json(stats)?);
    }

    if !cli.no_results {
        report::write_results(&cli.results, stats)?;
    }
    Ok(())
}
