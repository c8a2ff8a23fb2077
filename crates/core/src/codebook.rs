//! Symbol code book: the symbol → codeword table used for encoding.
//!
//! The book is an unbalanced binary search tree keyed by symbol. Every
//! search (`contains`, `lookup`, the insertion walk) uses the same descent:
//! smaller symbols go left, larger go right, equal stops.
//!
//! # First insertion wins
//!
//! Adding a symbol that is already present does nothing. The codeword
//! recorded first stays for the life of the book; there is no removal.
//!
//! # Unknown symbols
//!
//! [`CodeBook::encode`] drops symbols that have no codeword without
//! reporting them. Callers that need every symbol encoded should check
//! [`CodeBook::contains_all`] first, or use [`CodeBook::encode_strict`].
//!
//! # Example
//! ```
//! use prefix_code_core::CodeBook;
//!
//! let mut book = CodeBook::new();
//! book.add('a', "0".parse().unwrap());
//! book.add('b', "10".parse().unwrap());
//! book.add('c', "11".parse().unwrap());
//!
//! assert_eq!(book.encode("abc").to_string(), "01011");
//! assert_eq!(book.symbols().collect::<String>(), "abc");
//! ```

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::bits::BitSequence;
use crate::error::{CodeError, Result};
use crate::stats::{CodeStats, EncodeStats};

/// One entry of the search tree.
#[derive(Debug)]
struct BookNode {
    symbol: char,
    sequence: BitSequence,
    left: Option<Box<BookNode>>,
    right: Option<Box<BookNode>>,
}

impl BookNode {
    fn new(symbol: char, sequence: BitSequence) -> Self {
        Self {
            symbol,
            sequence,
            left: None,
            right: None,
        }
    }
}

/// Mapping from symbol to codeword.
///
/// # Invariants
/// - Every symbol in a left subtree is less than its parent's symbol, every
///   symbol in a right subtree greater
/// - `len` equals the number of nodes
///
/// Sorted insertion degrades the tree into a chain as long as the book, so
/// cloning and dropping walk it with an explicit stack.
#[derive(Default)]
pub struct CodeBook {
    root: Option<Box<BookNode>>,
    len: usize,
}

impl CodeBook {
    /// Create an empty code book.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Add `symbol` with its codeword, unless the symbol is already present.
    ///
    /// A repeated symbol keeps the codeword it was first added with.
    pub fn add(&mut self, symbol: char, sequence: BitSequence) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match symbol.cmp(&node.symbol) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    debug!(
                        symbol = ?symbol,
                        kept = %node.sequence,
                        ignored = %sequence,
                        "symbol already in code book; keeping first codeword"
                    );
                    return;
                }
            };
        }
        *slot = Some(Box::new(BookNode::new(symbol, sequence)));
        self.len += 1;
    }

    /// True if `symbol` has a codeword.
    pub fn contains(&self, symbol: char) -> bool {
        self.find(symbol).is_some()
    }

    /// True if every symbol of `text` has a codeword.
    ///
    /// Scans left to right and stops at the first miss. The empty string
    /// is trivially covered.
    pub fn contains_all(&self, text: &str) -> bool {
        text.chars().all(|symbol| self.contains(symbol))
    }

    /// The codeword for `symbol`, or `None` if it was never added.
    pub fn lookup(&self, symbol: char) -> Option<&BitSequence> {
        self.find(symbol).map(|node| &node.sequence)
    }

    /// Concatenate the codewords of `text`'s symbols, in order.
    ///
    /// Symbols without a codeword are skipped, so the output is shorter
    /// than expected whenever `contains_all(text)` is false.
    pub fn encode(&self, text: &str) -> BitSequence {
        let mut out = BitSequence::new();
        for symbol in text.chars() {
            if let Some(sequence) = self.lookup(symbol) {
                out.append(sequence);
            }
        }
        out
    }

    /// Like [`encode`](Self::encode), but fail on the first unknown symbol.
    ///
    /// # Errors
    /// `CodeError::UnknownSymbol` with the symbol and its char index.
    pub fn encode_strict(&self, text: &str) -> Result<BitSequence> {
        let mut out = BitSequence::new();
        for (position, symbol) in text.chars().enumerate() {
            match self.lookup(symbol) {
                Some(sequence) => out.append(sequence),
                None => return Err(CodeError::UnknownSymbol { symbol, position }.into()),
            }
        }
        Ok(out)
    }

    /// Like [`encode`](Self::encode), also counting what was read, skipped
    /// and emitted.
    pub fn encode_with_stats(&self, text: &str) -> (BitSequence, EncodeStats) {
        let mut out = BitSequence::new();
        let mut stats = EncodeStats::default();

        for symbol in text.chars() {
            stats.symbols_read += 1;
            match self.lookup(symbol) {
                Some(sequence) => {
                    out.append(sequence);
                    stats.symbols_encoded += 1;
                }
                None => stats.symbols_skipped += 1,
            }
        }

        stats.bits_emitted = out.len() as u64;
        if stats.symbols_skipped > 0 {
            debug!(skipped = stats.symbols_skipped, "encode dropped unknown symbols");
        }
        (out, stats)
    }

    /// Symbols in ascending order.
    ///
    /// Each call starts a fresh traversal.
    pub fn symbols(&self) -> Symbols<'_> {
        Symbols {
            entries: self.entries(),
        }
    }

    /// `(symbol, codeword)` pairs in ascending symbol order.
    pub fn entries(&self) -> Entries<'_> {
        let mut entries = Entries { stack: Vec::new() };
        entries.push_left_spine(self.root.as_deref());
        entries
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no symbol has been added.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Codeword length statistics.
    pub fn stats(&self) -> CodeStats {
        let mut stats = CodeStats::default();
        for (_, sequence) in self.entries() {
            stats.record(sequence.len());
        }
        stats
    }

    fn find(&self, symbol: char) -> Option<&BookNode> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match symbol.cmp(&node.symbol) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }
}

impl Clone for CodeBook {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Visit(Option<&'a BookNode>),
            Build(&'a BookNode),
        }

        // Post-order: both subtrees are on `built` before their parent
        let mut steps = vec![Step::Visit(self.root.as_deref())];
        let mut built: Vec<Option<Box<BookNode>>> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(None) => built.push(None),
                Step::Visit(Some(node)) => {
                    steps.push(Step::Build(node));
                    steps.push(Step::Visit(node.right.as_deref()));
                    steps.push(Step::Visit(node.left.as_deref()));
                }
                Step::Build(node) => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    built.push(Some(Box::new(BookNode {
                        symbol: node.symbol,
                        sequence: node.sequence.clone(),
                        left,
                        right,
                    })));
                }
            }
        }

        Self {
            root: built.pop().flatten(),
            len: self.len,
        }
    }
}

impl Drop for CodeBook {
    fn drop(&mut self) {
        let mut pending: Vec<Box<BookNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl fmt::Debug for CodeBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().map(|(symbol, sequence)| (symbol, sequence.to_string())))
            .finish()
    }
}

/// Pairs are added in order, so for a repeated symbol the first pair wins.
impl FromIterator<(char, BitSequence)> for CodeBook {
    fn from_iter<I: IntoIterator<Item = (char, BitSequence)>>(iter: I) -> Self {
        let mut book = CodeBook::new();
        book.extend(iter);
        book
    }
}

impl Extend<(char, BitSequence)> for CodeBook {
    fn extend<I: IntoIterator<Item = (char, BitSequence)>>(&mut self, iter: I) {
        for (symbol, sequence) in iter {
            self.add(symbol, sequence);
        }
    }
}

impl<'a> IntoIterator for &'a CodeBook {
    type Item = (char, &'a BitSequence);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

/// In-order iterator over a [`CodeBook`]'s entries.
///
/// Holds the path of nodes whose left subtrees have been visited but which
/// have not been yielded yet.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    stack: Vec<&'a BookNode>,
}

impl<'a> Entries<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a BookNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = (char, &'a BitSequence);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.symbol, &node.sequence))
    }
}

/// In-order iterator over a [`CodeBook`]'s symbols.
#[derive(Debug, Clone)]
pub struct Symbols<'a> {
    entries: Entries<'a>,
}

impl Iterator for Symbols<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.entries.next().map(|(symbol, _)| symbol)
    }
}
