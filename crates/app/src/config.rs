//! Command-line options and the run they resolve to.
//!
//! Codewords come from repeated `--code SYM=BITS` flags, taken in the order
//! given. Without them the driver invents a complete code over `--alphabet`,
//! or over a seeded random subset of [`DEFAULT_SYMBOLS`]. The text to encode
//! is `--text` or `--text-len` symbols drawn from that alphabet.
//!
//! Everything random is drawn from one seed, which `--print-config` shows
//! so a surprising run can be repeated with `--seed`.

use clap::Parser;
use prefix_code_core::BitSequence;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::code_gen;

/// Symbols the random alphabet is drawn from.
pub const DEFAULT_SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyz .,!?";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "prefix-code",
    about = "Build a prefix-free code, encode text with it, validate the trie and decode it back"
)]
pub struct Args {
    /// Random seed for determinism (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Symbols to generate a random code for (default: random subset)
    #[arg(long, conflicts_with = "code")]
    pub alphabet: Option<String>,

    /// Codeword for one symbol, as SYM=BITS (repeatable)
    #[arg(long = "code", value_name = "SYM=BITS")]
    pub code: Vec<String>,

    /// Text to encode (default: random text over the alphabet)
    #[arg(long)]
    pub text: Option<String>,

    /// Length of the generated text
    #[arg(long, default_value_t = 64)]
    pub text_len: usize,

    /// Fail on symbols that have no codeword instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print code and encode statistics
    #[arg(long)]
    pub no_stats: bool,

    /// Tracing filter, e.g. "debug" (default: $RUST_LOG, then "warn")
    #[arg(long)]
    pub log: Option<String>,
}

/// Where the codewords come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// Codewords given on the command line, in the order given
    Manual(Vec<(char, BitSequence)>),

    /// A random complete code over these symbols (ascending, distinct)
    Random(Vec<char>),
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seed used for every random choice
    pub seed: u64,

    /// Codeword source
    pub code: CodeSource,

    /// Text to encode
    pub text: String,

    /// Use strict encoding
    pub strict: bool,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print statistics
    pub print_stats: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// If no seed is provided, uses a time-based one. Every default drawn
    /// below comes from that seed, so printing it is enough to repeat a run.
    pub fn from_args(args: Args) -> Result<Self, String> {
        let seed = args.seed.unwrap_or_else(time_seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let code = if args.code.is_empty() {
            let alphabet = match args.alphabet {
                Some(symbols) => dedup_sorted(symbols.chars()),
                None => random_alphabet(&mut rng),
            };
            if alphabet.len() < 2 {
                return Err("alphabet needs at least two distinct symbols".to_string());
            }
            CodeSource::Random(alphabet)
        } else {
            let pairs = args
                .code
                .iter()
                .map(|spec| parse_code_spec(spec))
                .collect::<Result<Vec<_>, _>>()?;
            CodeSource::Manual(pairs)
        };

        let text = match args.text {
            Some(text) => text,
            None => {
                let alphabet = code.alphabet();
                if alphabet.is_empty() {
                    String::new()
                } else {
                    code_gen::generate_text(&alphabet, args.text_len, &mut rng)
                }
            }
        };

        Ok(Config {
            seed,
            code,
            text,
            strict: args.strict,
            print_config: args.print_config,
            print_stats: !args.no_stats,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        match &self.code {
            CodeSource::Manual(pairs) => {
                println!("Code: {} manual codewords", pairs.len());
                for (symbol, sequence) in pairs {
                    println!("  {symbol:?} = {sequence}");
                }
            }
            CodeSource::Random(alphabet) => {
                println!(
                    "Code: random, {} symbols {:?}",
                    alphabet.len(),
                    alphabet.iter().collect::<String>()
                );
            }
        }
        println!("Text: {} symbols", self.text.chars().count());
        println!("Strict: {}", self.strict);
        println!();
    }
}

impl CodeSource {
    /// The distinct symbols this source assigns codewords to, ascending.
    pub fn alphabet(&self) -> Vec<char> {
        match self {
            CodeSource::Manual(pairs) => dedup_sorted(pairs.iter().map(|(symbol, _)| *symbol)),
            CodeSource::Random(alphabet) => alphabet.clone(),
        }
    }
}

/// Parse `SYM=BITS`, e.g. `a=010`. The symbol is the single char before
/// the first `=`, so `==1` assigns `1` to `=`.
fn parse_code_spec(spec: &str) -> Result<(char, BitSequence), String> {
    let mut chars = spec.chars();
    let (Some(symbol), Some('=')) = (chars.next(), chars.next()) else {
        return Err(format!("invalid --code {spec:?}: expected SYM=BITS"));
    };
    let sequence = chars
        .as_str()
        .parse::<BitSequence>()
        .map_err(|e| format!("invalid --code {spec:?}: {e}"))?;
    Ok((symbol, sequence))
}

fn random_alphabet(rng: &mut ChaCha8Rng) -> Vec<char> {
    let symbols: Vec<char> = DEFAULT_SYMBOLS.chars().collect();
    let count = rng.gen_range(2..=symbols.len());
    dedup_sorted(symbols.choose_multiple(rng, count).copied())
}

fn dedup_sorted(symbols: impl IntoIterator<Item = char>) -> Vec<char> {
    let mut out: Vec<char> = symbols.into_iter().collect();
    out.sort_unstable();
    out.dedup();
    out
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
