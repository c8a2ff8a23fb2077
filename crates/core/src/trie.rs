//! Code trie: the decoding side of a prefix-free code.
//!
//! Every codeword is a root-to-leaf path; a 0 bit takes the `zero` branch
//! and a 1 bit the `one` branch. Decoding walks the path bit by bit and
//! emits the leaf's symbol, then starts again from the root.
//!
//! # Insertion and validity
//!
//! [`CodeTrie::put`] never refuses a codeword. When two codewords overlap
//! (one is a proper prefix of the other) the node they share would have to
//! be a leaf and an internal node at once. `put` keeps the later shape and
//! records the overlap as a prefix conflict; [`CodeTrie::is_valid`] then
//! reports false for good. Validity is only ever checked on request.
//!
//! # Decoding
//!
//! ```text
//!            root
//!           0/  \1
//!          'a'   *
//!              0/ \1
//!             'b' 'c'
//!
//!   bits:  0 | 1 0 | 1 1
//!   out:   a |  b  |  c
//! ```
//!
//! Decoding assumes a valid trie and input made of whole codewords. A
//! missing branch or a trailing partial codeword is reported as a
//! [`CodeError`] rather than guessed around.

use tracing::{debug, trace};

use crate::bits::BitSequence;
use crate::codebook::CodeBook;
use crate::error::{CodeError, Result};
use crate::node::TrieNode;

/// Binary decoding trie for a prefix-free code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTrie {
    root: TrieNode,
    /// Number of `put` calls that overlapped an existing codeword
    conflicts: usize,
}

impl CodeTrie {
    /// An empty trie: a single internal node with no branches.
    ///
    /// Not valid until codewords are put into it.
    pub fn new() -> Self {
        Self::from_root(TrieNode::placeholder())
    }

    /// Wrap an existing tree.
    pub fn from_root(root: TrieNode) -> Self {
        Self { root, conflicts: 0 }
    }

    /// Build a trie holding every codeword of `book`.
    ///
    /// Codewords are inserted in ascending symbol order, so the same book
    /// always yields the same trie.
    pub fn from_code_book(book: &CodeBook) -> Self {
        let mut trie = Self::new();
        for (symbol, sequence) in book.entries() {
            trace!(symbol = ?symbol, codeword = %sequence, "inserting codeword");
            trie.put(sequence, symbol);
        }
        debug!(
            symbols = book.len(),
            conflicts = trie.conflicts,
            valid = trie.is_valid(),
            "built code trie from code book"
        );
        trie
    }

    /// True if no codewords overlapped and every node is a leaf or an
    /// internal node with both branches.
    pub fn is_valid(&self) -> bool {
        self.conflicts == 0 && self.root.is_valid_tree()
    }

    /// Make the node addressed by `sequence` a leaf for `symbol`.
    ///
    /// Missing branches along the path are created as empty internal nodes.
    /// An empty sequence addresses the root.
    pub fn put(&mut self, sequence: &BitSequence, symbol: char) {
        let mut node = &mut self.root;
        for bit in sequence {
            if let TrieNode::Leaf(shadowed) = *node {
                self.conflicts += 1;
                debug!(
                    symbol = ?symbol,
                    shadowed = ?shadowed,
                    "existing codeword is a prefix of the new codeword"
                );
            }
            node = node.branch_mut(bit);
        }

        match node {
            TrieNode::Leaf(existing) if *existing != symbol => {
                debug!(old = ?existing, new = ?symbol, "codeword reassigned to a new symbol");
            }
            TrieNode::Internal { zero, one } if zero.is_some() || one.is_some() => {
                self.conflicts += 1;
                debug!(symbol = ?symbol, "codeword is a prefix of an existing codeword");
            }
            _ => {}
        }
        *node = TrieNode::Leaf(symbol);
    }

    /// Decode a sequence of whole codewords.
    ///
    /// # Errors
    /// - `CodeError::MalformedSequence` if a bit selects a branch that does
    ///   not exist
    /// - `CodeError::IncompleteCodeword` if the input stops mid-codeword
    pub fn decode(&self, sequence: &BitSequence) -> Result<String> {
        let mut decoder = self.decoder();
        let mut out = String::new();

        for bit in sequence {
            if let Some(symbol) = decoder.push(bit)? {
                out.push(symbol);
            }
        }

        decoder.finish()?;
        Ok(out)
    }

    /// Start a streaming decode at the root.
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder {
            root: &self.root,
            cursor: &self.root,
            position: 0,
            pending: 0,
        }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of overlapping insertions seen so far.
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Number of symbols reachable in the trie.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest path from the root.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Every leaf's symbol with the path that reaches it.
    ///
    /// Paths are listed depth-first, `zero` branch before `one`.
    pub fn codewords(&self) -> Vec<(char, BitSequence)> {
        let mut out = Vec::new();
        // The path is shared: each entry records how long it was at the
        // parent and which bit leads here
        let mut path = BitSequence::new();
        let mut pending = vec![(&self.root, 0, None)];

        while let Some((node, parent_len, bit)) = pending.pop() {
            path.truncate(parent_len);
            path.extend(bit);

            match node {
                TrieNode::Leaf(symbol) => out.push((*symbol, path.clone())),
                TrieNode::Internal { zero, one } => {
                    // Stack order: one is pushed first so zero pops first
                    for (bit, child) in [(true, one.as_deref()), (false, zero.as_deref())] {
                        if let Some(child) = child {
                            pending.push((child, path.len(), Some(bit)));
                        }
                    }
                }
            }
        }

        out
    }

    /// Rebuild the symbol → codeword table from the trie's leaves.
    pub fn to_code_book(&self) -> CodeBook {
        self.codewords().into_iter().collect()
    }
}

impl Default for CodeTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&CodeBook> for CodeTrie {
    fn from(book: &CodeBook) -> Self {
        Self::from_code_book(book)
    }
}

impl From<TrieNode> for CodeTrie {
    fn from(root: TrieNode) -> Self {
        Self::from_root(root)
    }
}

impl From<&CodeTrie> for CodeBook {
    fn from(trie: &CodeTrie) -> Self {
        trie.to_code_book()
    }
}

/// Bit-at-a-time decoder over a [`CodeTrie`].
///
/// Holds a cursor into the trie. Each pushed bit moves the cursor down one
/// branch; reaching a leaf yields its symbol and returns the cursor to the
/// root. After an error the decoder is left where it was before the
/// offending bit.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    root: &'a TrieNode,
    cursor: &'a TrieNode,
    /// Bits consumed so far
    position: usize,
    /// Bits consumed since the last emitted symbol
    pending: usize,
}

impl<'a> Decoder<'a> {
    /// Feed one bit; returns the symbol if this bit completes a codeword.
    ///
    /// # Errors
    /// `CodeError::MalformedSequence` if the cursor has no branch for `bit`.
    pub fn push(&mut self, bit: bool) -> Result<Option<char>> {
        let next = self
            .cursor
            .child(bit)
            .ok_or(CodeError::MalformedSequence {
                position: self.position,
            })?;
        self.position += 1;

        match next.symbol() {
            Some(symbol) => {
                self.cursor = self.root;
                self.pending = 0;
                Ok(Some(symbol))
            }
            None => {
                self.cursor = next;
                self.pending += 1;
                Ok(None)
            }
        }
    }

    /// True if the cursor is at the root, i.e. between codewords.
    pub fn is_at_boundary(&self) -> bool {
        self.pending == 0
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check that the input ended on a codeword boundary.
    ///
    /// # Errors
    /// `CodeError::IncompleteCodeword` with the number of dangling bits.
    pub fn finish(self) -> Result<()> {
        if self.pending > 0 {
            return Err(CodeError::IncompleteCodeword {
                trailing_bits: self.pending,
            }
            .into());
        }
        Ok(())
    }
}
