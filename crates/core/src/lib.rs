//! prefix-code-core: prefix-free binary codes for a finite alphabet
//!
//! This library provides the two structures behind table-driven entropy
//! coding:
//! - A code book mapping each symbol to its codeword, used to encode text
//! - A code trie whose root-to-leaf paths are the codewords, used to
//!   validate the code and to decode bit sequences
//!
//! # Architecture
//!
//! - `bits`: Packed bit sequences (codewords and encoded messages)
//! - `codebook`: Symbol → codeword search tree, encode
//! - `node`: Trie node sum type and its validity predicate
//! - `trie`: Code trie construction, validation, streaming decode
//! - `stats`: Codeword length and encode statistics
//!
//! # Design Principles
//!
//! - **No panics**: Checked operations return structured errors
//! - **Absence is a value**: Unknown symbols are `None`/`false`, an
//!   ill-formed trie is `is_valid() == false`
//! - **Deterministic**: Traversal order is ascending by symbol, so the same
//!   code book always builds the same trie
//!
//! Optimal (frequency-driven) code construction is out of scope; any
//! prefix-free assignment can be loaded into a [`CodeBook`].

pub mod bits;
pub mod codebook;
pub mod error;
pub mod node;
pub mod stats;
pub mod trie;

// Re-export commonly used types
pub use bits::BitSequence;
pub use codebook::CodeBook;
pub use error::{Error, Result};
pub use node::TrieNode;
pub use trie::CodeTrie;
