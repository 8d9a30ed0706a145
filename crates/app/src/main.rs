//! adaptive-huffman: encode a message, decode it back, and report.
//!
//! With `--trace`, the compressed stream and the tree are printed after
//! every symbol on both the encoding and the decoding side.

mod config;
mod input_gen;

use std::fs;

use adaptive_huffman_core::{BitCursor, BitString, CodecStats, Decoder, Encoder};
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Cli, Config, Mode, Source};

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    init_tracing(config.log_filter.as_deref())?;

    if config.print_config {
        config.print();
    }

    match &config.mode {
        Mode::RoundTrip(source) => {
            let message = load_message(source)?;
            run_round_trip(&config, &message)
        }
        Mode::Decode(path) => run_decode(&config, path),
    }
}

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter {directives:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_message(source: &Source) -> Result<Vec<u8>> {
    match source {
        Source::Message(bytes) => Ok(bytes.clone()),
        Source::File(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        Source::Sample { seed, size } => {
            info!(seed, size, "generating sample message");
            Ok(input_gen::generate_sample_message(*seed, *size))
        }
    }
}

/// Render bytes one character per code unit.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn run_round_trip(config: &Config, message: &[u8]) -> Result<()> {
    println!("Message: {}", latin1(message));

    let mut encoder = Encoder::with_config(config.tree);
    let bits = if config.trace {
        println!("=== ENCODING ===");
        for (index, &symbol) in message.iter().enumerate() {
            encoder.encode_symbol(symbol)?;
            println!(
                "\nAfter encoding {:?} (symbol #{}), the compressed stream is '{}'",
                char::from(symbol),
                index + 1,
                encoder.output()
            );
            print!("{}", encoder.tree());
        }
        encoder.output().clone()
    } else {
        encoder.encode(message)?
    };
    println!("\nCompressed stream: {bits}");

    let mut decoder = Decoder::with_config(config.tree);
    let decoded = if config.trace {
        println!("\n=== DECODING ===");
        let mut cursor = BitCursor::new(&bits);
        while let Some(step) = decoder.decode_next(&mut cursor) {
            let symbol = step?;
            println!(
                "\nAfter decoding {:?} (symbol #{}), the decoded message is '{}'",
                char::from(symbol),
                decoder.output().len(),
                latin1(decoder.output())
            );
            print!("{}", decoder.tree());
        }
        decoder.output().to_vec()
    } else {
        decoder.decode(&bits)?
    };
    println!("\nDecoded message: {}", latin1(&decoded));

    if let Some(path) = &config.output {
        fs::write(path, format!("{bits}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), bits = bits.len(), "wrote compressed stream");
    }

    if config.dump {
        println!("\n=== Final tree ===");
        print!("{}", encoder.tree());
    }

    if config.print_stats {
        print_stats("Encoder", encoder.stats());
    }

    if decoded != message {
        bail!("round trip failed: decoded message differs from the input");
    }
    println!("\nVerification: SUCCESS");
    Ok(())
}

fn run_decode(config: &Config, path: &std::path::Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let bits: BitString = text
        .trim_end()
        .parse()
        .with_context(|| format!("{} is not a 0/1 bit string", path.display()))?;

    let mut decoder = Decoder::with_config(config.tree);
    let decoded = decoder
        .decode(&bits)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    match &config.output {
        Some(out) => fs::write(out, &decoded)
            .with_context(|| format!("failed to write {}", out.display()))?,
        None => println!("{}", latin1(&decoded)),
    }

    if config.dump {
        println!("\n=== Final tree ===");
        print!("{}", decoder.tree());
    }
    if config.print_stats {
        print_stats("Decoder", decoder.stats());
    }
    Ok(())
}

fn print_stats(side: &str, stats: &CodecStats) {
    println!("\n=== {side} statistics ===");
    print!("{}", stats.summary());
}
