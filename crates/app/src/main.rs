//! prefix-code: build a code, encode, validate, decode, verify.
//!
//! Pipeline: config -> code book -> encode -> code trie -> validate ->
//! decode -> compare with the input text.

mod code_gen;
mod config;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use prefix_code_core::{CodeBook, CodeTrie};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, CodeSource, Config};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run with --help for usage");
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    if config.print_config {
        config.print();
    }

    // The code seed is offset from the config seed so the code shape does
    // not repeat the draws that picked the alphabet and text.
    let book = match &config.code {
        CodeSource::Manual(pairs) => pairs.iter().cloned().collect::<CodeBook>(),
        CodeSource::Random(alphabet) => {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
            code_gen::random_code(alphabet, &mut rng)
        }
    };
    info!(symbols = book.len(), seed = config.seed, "code book ready");

    if config.print_stats {
        book.stats().print_summary();
    }

    let encoded = if config.strict {
        book.encode_strict(&config.text)?
    } else {
        let (encoded, stats) = book.encode_with_stats(&config.text);
        if !stats.is_lossless() {
            warn!(
                skipped = stats.symbols_skipped,
                "text contains symbols without a codeword; they were dropped"
            );
        }
        if config.print_stats {
            stats.print_summary();
        }
        encoded
    };
    info!(bits = encoded.len(), "encoded");

    let trie = CodeTrie::from_code_book(&book);
    if !trie.is_valid() {
        return Err(format!(
            "code is not a complete prefix-free code ({} prefix conflicts, {} reachable symbols of {})",
            trie.conflicts(),
            trie.leaf_count(),
            book.len()
        )
        .into());
    }

    let decoded = trie.decode(&encoded)?;

    let expected: String = config.text.chars().filter(|&c| book.contains(c)).collect();
    if decoded != expected {
        return Err(format!(
            "round trip mismatch: decoded {} symbols, expected {}",
            decoded.chars().count(),
            expected.chars().count()
        )
        .into());
    }

    println!("✓ Round trip succeeded");
    println!(
        "  {} symbols -> {} bits -> {} symbols",
        config.text.chars().count(),
        encoded.len(),
        decoded.chars().count()
    );
    Ok(())
}
