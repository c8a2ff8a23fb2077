//! Statistics about codes and encode runs.
//!
//! This module provides observable insight into a code and its use:
//! - Codeword lengths (shortest, longest, average)
//! - Kraft sum, which tells whether the lengths could form a complete
//!   prefix-free code
//! - Per-encode counts (symbols read, encoded, skipped; bits emitted)
//!
//! # Design
//!
//! Both structs are plain values computed on demand. They are cheap to
//! clone and carry no references into the book they describe.
//!
//! Completeness is decided from the exact length histogram, not from the
//! floating-point Kraft sum, which cannot tell `1 - 2^-60` from `1`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Shape of a code book's codewords.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeStats {
    /// Number of distinct symbols
    pub symbols: usize,

    /// Shortest codeword length in bits (0 if the book is empty)
    pub min_len: usize,

    /// Longest codeword length in bits (0 if the book is empty)
    pub max_len: usize,

    /// Sum of all codeword lengths
    pub total_bits: usize,

    /// Number of codewords of each length
    pub length_counts: BTreeMap<usize, u64>,
}

impl CodeStats {
    /// Fold one codeword length into the totals.
    pub fn record(&mut self, len: usize) {
        if self.symbols == 0 {
            self.min_len = len;
            self.max_len = len;
        } else {
            self.min_len = self.min_len.min(len);
            self.max_len = self.max_len.max(len);
        }
        self.symbols += 1;
        self.total_bits += len;
        *self.length_counts.entry(len).or_insert(0) += 1;
    }

    /// Mean codeword length (unweighted by symbol frequency).
    ///
    /// Returns 0.0 for an empty book.
    pub fn average_len(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.total_bits as f64 / self.symbols as f64
        }
    }

    /// Sum of 2^-len over every codeword, for display.
    ///
    /// Added shortest terms first so deep codewords are not lost to
    /// rounding, but still approximate; use [`is_complete`](Self::is_complete)
    /// and [`satisfies_kraft`](Self::satisfies_kraft) for decisions.
    pub fn kraft_sum(&self) -> f64 {
        self.length_counts
            .iter()
            .rev()
            .map(|(&len, &count)| count as f64 * 0.5f64.powi(len.min(i32::MAX as usize) as i32))
            .sum()
    }

    /// Kraft sum above one means the lengths cannot be prefix-free.
    pub fn satisfies_kraft(&self) -> bool {
        match self.kraft_parts() {
            (0, _) => true,
            (1, fractional) => !fractional,
            _ => false,
        }
    }

    /// Kraft sum of exactly one: every internal trie node has two children.
    pub fn is_complete(&self) -> bool {
        self.kraft_parts() == (1, false)
    }

    /// Integer part of the Kraft sum and whether a fraction remains.
    ///
    /// Counts are carried from the longest length up to length zero, two
    /// codewords of length `n` making one of length `n - 1`.
    fn kraft_parts(&self) -> (u64, bool) {
        let mut carry: u64 = 0;
        let mut fractional = false;
        let mut level = self.max_len;

        let mut lift = |carry: u64, gap: usize| -> u64 {
            if gap >= 64 {
                fractional |= carry != 0;
                return 0;
            }
            fractional |= carry & ((1u64 << gap) - 1) != 0;
            carry >> gap
        };

        for (&len, &count) in self.length_counts.iter().rev() {
            carry = lift(carry, level - len).saturating_add(count);
            level = len;
        }
        carry = lift(carry, level);

        (carry, fractional)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Code ===");
        println!("Symbols: {}", self.symbols);
        println!(
            "Codeword length: min {} / max {} / avg {:.2} bits",
            self.min_len,
            self.max_len,
            self.average_len()
        );
        println!("Kraft sum: {:.6}", self.kraft_sum());
        if self.is_complete() {
            println!("Completeness: complete");
        } else if self.satisfies_kraft() {
            println!("Completeness: incomplete (unused branches)");
        } else {
            println!("Completeness: over-full (not prefix-free)");
        }
        println!();
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "symbols={}", self.symbols);
        let _ = writeln!(out, "min_len={}", self.min_len);
        let _ = writeln!(out, "max_len={}", self.max_len);
        let _ = writeln!(out, "avg_len={:.4}", self.average_len());
        let _ = writeln!(out, "kraft_sum={:.6}", self.kraft_sum());
        out
    }
}

/// Counts from a single encode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Symbols read from the input text
    pub symbols_read: u64,

    /// Symbols that had a codeword
    pub symbols_encoded: u64,

    /// Symbols dropped because the book has no codeword for them
    pub symbols_skipped: u64,

    /// Bits in the encoded output
    pub bits_emitted: u64,
}

impl EncodeStats {
    /// True if every input symbol made it into the output.
    pub fn is_lossless(&self) -> bool {
        self.symbols_skipped == 0
    }

    /// Output bits per encoded symbol.
    ///
    /// Returns 0.0 if nothing was encoded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols_encoded == 0 {
            0.0
        } else {
            self.bits_emitted as f64 / self.symbols_encoded as f64
        }
    }

    /// Encoded size relative to one byte per input symbol.
    pub fn compression_ratio(&self) -> f64 {
        if self.symbols_read == 0 {
            0.0
        } else {
            self.bits_emitted as f64 / (self.symbols_read as f64 * 8.0)
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("=== Encode ===");
        println!("Symbols read: {}", self.symbols_read);
        println!("Symbols encoded: {}", self.symbols_encoded);
        println!("Symbols skipped: {}", self.symbols_skipped);
        println!("Bits emitted: {}", self.bits_emitted);
        println!("Bits/symbol: {:.2}", self.bits_per_symbol());
        println!("Ratio vs 8-bit: {:.1}%", self.compression_ratio() * 100.0);
        println!();
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "symbols_read={}\n\
             symbols_encoded={}\n\
             symbols_skipped={}\n\
             bits_emitted={}\n\
             bits_per_symbol={:.4}\n",
            self.symbols_read,
            self.symbols_encoded,
            self.symbols_skipped,
            self.bits_emitted,
            self.bits_per_symbol(),
        )
    }
}
