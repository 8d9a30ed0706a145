//! Configuration for the adaptive-huffman driver.
//!
//! Command-line options are parsed with `clap` and resolved into a
//! [`Config`]. The tool works with zero arguments: it runs the classic
//! `aacbdad` demo. Sample sizes and seeds are printed with `--print-config`
//! so runs are reproducible.

use std::path::PathBuf;

use adaptive_huffman_core::codec::code_unit;
use adaptive_huffman_core::config::DEFAULT_RANK_CEILING;
use adaptive_huffman_core::TreeConfig;
use anyhow::{bail, Context, Result};
use clap::Parser;

/// Message encoded when no input is given.
pub const DEMO_MESSAGE: &str = "aacbdad";

#[derive(Parser, Debug)]
#[command(
    name = "adaptive-huffman",
    about = "One-pass adaptive Huffman encoder/decoder over 8-bit symbols"
)]
pub struct Cli {
    /// Text to encode; every character must be in U+0000..=U+00FF
    #[arg(long, conflicts_with_all = ["input", "sample", "decode"])]
    pub message: Option<String>,

    /// File whose bytes are encoded
    #[arg(long, conflicts_with_all = ["sample", "decode"])]
    pub input: Option<PathBuf>,

    /// Encode a generated sample message of this many bytes
    #[arg(long, conflicts_with = "decode")]
    pub sample: Option<usize>,

    /// Seed for the sample generator (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Decode a file holding a `0`/`1` bit string instead of encoding
    #[arg(long)]
    pub decode: Option<PathBuf>,

    /// Write the bit string (or, with --decode, the decoded bytes) here
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the stream and tree after every symbol
    #[arg(long)]
    pub trace: bool,

    /// Print the final tree
    #[arg(long)]
    pub dump: bool,

    /// Rank given to the initial NYT node; bounds the tree size
    #[arg(long, default_value_t = DEFAULT_RANK_CEILING)]
    pub rank_ceiling: u32,

    /// Print the resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the statistics summary
    #[arg(long)]
    pub no_stats: bool,

    /// Log filter, e.g. `debug` or `adaptive_huffman_core=trace`
    /// (default: RUST_LOG, else `warn`)
    #[arg(long)]
    pub log: Option<String>,
}

/// Where the message to encode comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Message(Vec<u8>),
    File(PathBuf),
    Sample { seed: u64, size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Encode, decode, and verify
    RoundTrip(Source),
    /// Decode a stored bit string
    Decode(PathBuf),
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,

    /// Output file path (None = print only)
    pub output: Option<PathBuf>,

    // === Display ===
    pub trace: bool,
    pub dump: bool,
    pub print_config: bool,
    pub print_stats: bool,

    // === Codec ===
    pub tree: TreeConfig,

    /// Explicit log filter; None defers to RUST_LOG
    pub log_filter: Option<String>,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.seed.is_some() && cli.sample.is_none() {
            bail!("--seed only applies together with --sample");
        }

        let mode = if let Some(path) = cli.decode {
            Mode::Decode(path)
        } else if let Some(path) = cli.input {
            Mode::RoundTrip(Source::File(path))
        } else if let Some(size) = cli.sample {
            let seed = cli.seed.unwrap_or_else(time_seed);
            Mode::RoundTrip(Source::Sample { seed, size })
        } else {
            let text = cli.message.as_deref().unwrap_or(DEMO_MESSAGE);
            let bytes = text
                .chars()
                .map(code_unit)
                .collect::<adaptive_huffman_core::Result<Vec<u8>>>()
                .context("--message must consist of 8-bit characters")?;
            Mode::RoundTrip(Source::Message(bytes))
        };

        Ok(Config {
            mode,
            output: cli.output,
            trace: cli.trace,
            dump: cli.dump,
            print_config: cli.print_config,
            print_stats: !cli.no_stats,
            tree: TreeConfig::new(cli.rank_ceiling),
            log_filter: cli.log,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.mode {
            Mode::Decode(path) => println!("Mode: decode {}", path.display()),
            Mode::RoundTrip(Source::Message(bytes)) => {
                println!("Mode: round trip of a {}-byte message", bytes.len())
            }
            Mode::RoundTrip(Source::File(path)) => {
                println!("Mode: round trip of {}", path.display())
            }
            Mode::RoundTrip(Source::Sample { seed, size }) => {
                println!("Mode: round trip of a {size}-byte sample (seed {seed})")
            }
        }
        match &self.output {
            Some(path) => println!("Output file: {}", path.display()),
            None => println!("Output file: (none)"),
        }
        println!(
            "Rank ceiling: {} (up to {} symbols)",
            self.tree.rank_ceiling,
            self.tree.max_symbols()
        );
        println!("Trace: {}", self.trace);
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
