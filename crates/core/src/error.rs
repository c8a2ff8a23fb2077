//! Error types for prefix-code operations.
//!
//! Most conditions in this crate are reported as ordinary values: an unknown
//! symbol is `None`/`false`, a malformed trie is `is_valid() == false`. The
//! errors below cover the cases where a caller asked for a checked result.

use thiserror::Error;

/// Top-level error type for the crate.
///
/// Each variant corresponds to a failure domain:
/// - Bit sequence: parsing a textual bit string
/// - Code: strict encoding and checked decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bit sequence construction failed (e.g., a digit other than 0/1)
    #[error("bit sequence error: {0}")]
    BitSeq(#[from] BitSeqError),

    /// Encode or decode failed
    #[error("code error: {0}")]
    Code(#[from] CodeError),
}

/// Bit sequence errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitSeqError {
    /// A character other than `0`, `1`, whitespace or `_` in a bit string
    #[error("invalid bit digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}

/// Encode/decode errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Strict encoding met a symbol that has no codeword
    #[error("symbol {symbol:?} at position {position} has no codeword")]
    UnknownSymbol { symbol: char, position: usize },

    /// Decoding tried to follow a branch the trie does not have
    #[error("no branch for bit at position {position}")]
    MalformedSequence { position: usize },

    /// Input ended in the middle of a codeword
    #[error("sequence ends mid-codeword ({trailing_bits} trailing bits)")]
    IncompleteCodeword { trailing_bits: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
