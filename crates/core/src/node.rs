//! Code trie nodes.
//!
//! A node is either a leaf carrying one symbol or an internal node with a
//! `zero` and a `one` branch. An internal node is only *valid* once both
//! branches exist; a missing branch is a placeholder left behind by a
//! partial insertion.
//!
//! A codeword can be arbitrarily long, so a tree may be one long chain.
//! Every walk over a subtree (validation, counting, cloning, comparison and
//! drop) keeps its own stack instead of recursing.

/// A node of a [`CodeTrie`](crate::trie::CodeTrie).
#[derive(Debug)]
pub enum TrieNode {
    /// Terminal node: following the path to here spells this symbol's codeword.
    Leaf(char),

    /// Branch node, taken by a 0 bit (`zero`) or a 1 bit (`one`).
    Internal {
        zero: Option<Box<TrieNode>>,
        one: Option<Box<TrieNode>>,
    },
}

impl TrieNode {
    /// A leaf holding `symbol`.
    pub fn leaf(symbol: char) -> Self {
        TrieNode::Leaf(symbol)
    }

    /// An internal node with both branches present.
    pub fn internal(zero: TrieNode, one: TrieNode) -> Self {
        TrieNode::Internal {
            zero: Some(Box::new(zero)),
            one: Some(Box::new(one)),
        }
    }

    /// An internal node with no branches yet.
    pub fn placeholder() -> Self {
        TrieNode::Internal {
            zero: None,
            one: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TrieNode::Leaf(_))
    }

    /// The symbol of a leaf; `None` for internal nodes.
    pub fn symbol(&self) -> Option<char> {
        match self {
            TrieNode::Leaf(symbol) => Some(*symbol),
            TrieNode::Internal { .. } => None,
        }
    }

    pub fn zero(&self) -> Option<&TrieNode> {
        self.child(false)
    }

    pub fn one(&self) -> Option<&TrieNode> {
        self.child(true)
    }

    /// The branch selected by `bit`, if present.
    pub fn child(&self, bit: bool) -> Option<&TrieNode> {
        match self {
            TrieNode::Leaf(_) => None,
            TrieNode::Internal { zero, one } => {
                if bit {
                    one.as_deref()
                } else {
                    zero.as_deref()
                }
            }
        }
    }

    /// A leaf, or an internal node with both branches.
    pub fn is_valid_node(&self) -> bool {
        match self {
            TrieNode::Leaf(_) => true,
            TrieNode::Internal { zero, one } => zero.is_some() && one.is_some(),
        }
    }

    /// `is_valid_node` holds here and at every descendant.
    pub fn is_valid_tree(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                TrieNode::Leaf(_) => {}
                TrieNode::Internal {
                    zero: Some(zero),
                    one: Some(one),
                } => {
                    pending.push(zero);
                    pending.push(one);
                }
                TrieNode::Internal { .. } => return false,
            }
        }
        true
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                TrieNode::Leaf(_) => count += 1,
                TrieNode::Internal { zero, one } => {
                    pending.extend(zero.as_deref());
                    pending.extend(one.as_deref());
                }
            }
        }
        count
    }

    /// Length of the longest root-to-node path in this subtree.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            if let TrieNode::Internal { zero, one } = node {
                for child in [zero.as_deref(), one.as_deref()].into_iter().flatten() {
                    pending.push((child, depth + 1));
                }
            }
        }
        deepest
    }

    /// The branch selected by `bit`, created as a placeholder if missing.
    ///
    /// A leaf is turned into a placeholder first, discarding its symbol.
    pub(crate) fn branch_mut(&mut self, bit: bool) -> &mut TrieNode {
        match self {
            TrieNode::Internal { zero, one } => {
                let slot = if bit { one } else { zero };
                &mut **slot.get_or_insert_with(|| Box::new(TrieNode::placeholder()))
            }
            TrieNode::Leaf(_) => {
                *self = TrieNode::placeholder();
                self.branch_mut(bit)
            }
        }
    }
}

impl Clone for TrieNode {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Visit(&'a TrieNode),
            Missing,
            Build,
        }

        // Post-order: both branches are on `built` before their parent
        let mut steps = vec![Step::Visit(self)];
        let mut built: Vec<Option<Box<TrieNode>>> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(TrieNode::Leaf(symbol)) => {
                    built.push(Some(Box::new(TrieNode::Leaf(*symbol))));
                }
                Step::Visit(TrieNode::Internal { zero, one }) => {
                    steps.push(Step::Build);
                    for child in [one, zero] {
                        steps.push(child.as_deref().map_or(Step::Missing, Step::Visit));
                    }
                }
                Step::Missing => built.push(None),
                Step::Build => {
                    let one = built.pop().flatten();
                    let zero = built.pop().flatten();
                    built.push(Some(Box::new(TrieNode::Internal { zero, one })));
                }
            }
        }

        match built.pop().flatten() {
            Some(root) => *root,
            None => TrieNode::placeholder(),
        }
    }
}

impl PartialEq for TrieNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (TrieNode::Leaf(a), TrieNode::Leaf(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    TrieNode::Internal { zero, one },
                    TrieNode::Internal {
                        zero: other_zero,
                        one: other_one,
                    },
                ) => {
                    for (a, b) in [(zero, other_zero), (one, other_one)] {
                        match (a.as_deref(), b.as_deref()) {
                            (Some(a), Some(b)) => pending.push((a, b)),
                            (None, None) => {}
                            _ => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for TrieNode {}

impl Drop for TrieNode {
    fn drop(&mut self) {
        let TrieNode::Internal { zero, one } = self else {
            return;
        };
        let mut pending: Vec<Box<TrieNode>> = zero.take().into_iter().chain(one.take()).collect();
        while let Some(mut node) = pending.pop() {
            if let TrieNode::Internal { zero, one } = &mut *node {
                pending.extend(zero.take());
                pending.extend(one.take());
            }
        }
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::placeholder()
    }
}
