//! Integration tests for the code book / code trie pair.
//!
//! These tests verify end-to-end behavior: codewords -> code book -> encode
//! -> derived trie -> validate -> decode, with verification that output
//! matches input.

use std::collections::BTreeSet;

use prefix_code_core::{
    error::{CodeError, Error},
    BitSequence, CodeBook, CodeTrie, TrieNode,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bits(s: &str) -> BitSequence {
    s.parse().expect("test bit string")
}

/// Assign a complete prefix-free code to `symbols` by repeatedly splitting a
/// random leaf of the code tree. Needs at least two symbols so every
/// codeword is at least one bit long.
fn random_complete_code(symbols: &[char], seed: u64) -> CodeBook {
    assert!(symbols.len() >= 2);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut codewords = vec![BitSequence::new()];

    while codewords.len() < symbols.len() {
        let victim = codewords.swap_remove(rng.gen_range(0..codewords.len()));
        for bit in [false, true] {
            let mut child = victim.clone();
            child.push(bit);
            codewords.push(child);
        }
    }

    symbols.iter().copied().zip(codewords).collect()
}

fn random_text(symbols: &[char], len: usize, seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| symbols[rng.gen_range(0..symbols.len())])
        .collect()
}

#[test]
fn test_round_trip_abc() {
    let mut book = CodeBook::new();
    book.add('a', bits("0"));
    book.add('b', bits("10"));
    book.add('c', bits("11"));

    let trie = CodeTrie::from_code_book(&book);
    assert!(trie.is_valid());

    for text in ["", "a", "abc", "cccbbbaaa", "abacabacabacaba"] {
        assert!(book.contains_all(text));
        let encoded = book.encode(text);
        assert_eq!(trie.decode(&encoded).unwrap(), text);
    }
}

#[test]
fn test_unknown_symbol_breaks_round_trip_silently() {
    let mut book = CodeBook::new();
    book.add('a', bits("0"));
    book.add('b', bits("1"));

    let text = "abxba";
    assert!(!book.contains_all(text));

    // The dropped 'x' leaves no trace in the output
    let trie = CodeTrie::from_code_book(&book);
    assert_eq!(trie.decode(&book.encode(text)).unwrap(), "abba");

    // The strict encoder refuses instead
    assert!(matches!(
        book.encode_strict(text),
        Err(Error::Code(CodeError::UnknownSymbol { symbol: 'x', position: 2 }))
    ));
}

#[test]
fn test_prefix_conflict_from_code_book() {
    let mut book = CodeBook::new();
    book.add('a', bits("0"));
    book.add('b', bits("01"));
    book.add('c', bits("1"));

    let trie = CodeTrie::from_code_book(&book);
    assert!(!trie.is_valid());
    assert_eq!(trie.conflicts(), 1);
}

#[test]
fn test_prefix_conflict_regardless_of_symbol_order() {
    // Here the longer codeword's symbol sorts first, so it is put first
    let mut book = CodeBook::new();
    book.add('b', bits("0"));
    book.add('a', bits("01"));
    book.add('c', bits("1"));

    assert!(!CodeTrie::from_code_book(&book).is_valid());
}

#[test]
fn test_incomplete_code_is_invalid() {
    // Prefix-free, but the 11 branch is unused
    let mut book = CodeBook::new();
    book.add('a', bits("0"));
    book.add('b', bits("10"));

    let trie = CodeTrie::from_code_book(&book);
    assert!(!trie.is_valid());
    assert!(!book.stats().is_complete());
}

#[test]
fn test_manual_tree_matches_derived_tree() {
    let manual = CodeTrie::from_root(TrieNode::internal(
        TrieNode::internal(TrieNode::leaf('e'), TrieNode::leaf('t')),
        TrieNode::internal(
            TrieNode::leaf('a'),
            TrieNode::internal(TrieNode::leaf('o'), TrieNode::leaf('n')),
        ),
    ));
    assert!(manual.is_valid());

    let book = manual.to_code_book();
    assert_eq!(book.symbols().collect::<String>(), "aenot");
    assert_eq!(book.lookup('n'), Some(&bits("111")));

    let derived = CodeTrie::from_code_book(&book);
    assert_eq!(derived, manual);
    assert_eq!(derived.decode(&book.encode("tenant")).unwrap(), "tenant");
}

#[test]
fn test_seeded_random_codes_round_trip() {
    let alphabet: Vec<char> = "abcdefghijklmnopqrstuvwxyz .,!?".chars().collect();

    for seed in 0..32u64 {
        let book = random_complete_code(&alphabet, seed);
        let trie = CodeTrie::from_code_book(&book);
        assert!(trie.is_valid(), "seed {seed}");
        assert_eq!(trie.leaf_count(), alphabet.len());

        let text = random_text(&alphabet, 500, seed ^ 0xA5A5);
        let (encoded, stats) = book.encode_with_stats(&text);
        assert!(stats.is_lossless());
        assert_eq!(trie.decode(&encoded).unwrap(), text, "seed {seed}");
    }
}

#[test]
fn test_streaming_decode_matches_batch_decode() {
    let alphabet: Vec<char> = "αβγδεζηθ".chars().collect();
    let book = random_complete_code(&alphabet, 7);
    let trie = CodeTrie::from_code_book(&book);
    let text = random_text(&alphabet, 200, 8);
    let encoded = book.encode(&text);

    let mut decoder = trie.decoder();
    let mut streamed = String::new();
    for bit in &encoded {
        if let Some(symbol) = decoder.push(bit).unwrap() {
            streamed.push(symbol);
        }
    }
    assert!(decoder.is_at_boundary());
    decoder.finish().unwrap();

    assert_eq!(streamed, trie.decode(&encoded).unwrap());
    assert_eq!(streamed, text);
}

#[test]
fn test_truncated_message_is_reported() {
    let alphabet: Vec<char> = "wxyz".chars().collect();
    let mut book = CodeBook::new();
    for (symbol, code) in alphabet.iter().zip(["00", "01", "10", "11"]) {
        book.add(*symbol, bits(code));
    }
    let trie = CodeTrie::from_code_book(&book);

    let full = book.encode("wxyz");
    let truncated: BitSequence = full.iter().take(full.len() - 1).collect();

    assert!(matches!(
        trie.decode(&truncated),
        Err(Error::Code(CodeError::IncompleteCodeword { trailing_bits: 1 }))
    ));
}

proptest! {
    #[test]
    fn round_trip_holds_for_random_complete_codes(
        symbols in prop::collection::btree_set(any::<char>(), 2..64),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..256),
    ) {
        let symbols: Vec<char> = symbols.into_iter().collect();
        let book = random_complete_code(&symbols, seed);
        let trie = CodeTrie::from_code_book(&book);
        prop_assert!(trie.is_valid());

        let text: String = picks.iter().map(|i| symbols[i.index(symbols.len())]).collect();
        prop_assert_eq!(trie.decode(&book.encode(&text)).unwrap(), text);
    }

    #[test]
    fn symbols_are_ascending_and_first_add_wins(
        pairs in prop::collection::vec((any::<char>(), prop::collection::vec(any::<bool>(), 0..16)), 0..64),
    ) {
        let mut book = CodeBook::new();
        for (symbol, code) in &pairs {
            book.add(*symbol, code.iter().copied().collect());
        }

        let distinct: BTreeSet<char> = pairs.iter().map(|(symbol, _)| *symbol).collect();
        let listed: Vec<char> = book.symbols().collect();
        prop_assert_eq!(&listed, &distinct.into_iter().collect::<Vec<_>>());
        prop_assert_eq!(book.len(), listed.len());

        for symbol in listed {
            let first = pairs
                .iter()
                .find(|(s, _)| *s == symbol)
                .map(|(_, code)| code.iter().copied().collect::<BitSequence>());
            prop_assert_eq!(book.lookup(symbol), first.as_ref());
        }
    }

    #[test]
    fn contains_all_agrees_with_contains(
        known in prop::collection::vec(prop::char::range('a', 'm'), 0..13),
        text in "[a-z]{0,32}",
    ) {
        let book: CodeBook = known.iter().map(|&symbol| (symbol, bits("1"))).collect();
        let expected = text.chars().all(|symbol| book.contains(symbol));
        prop_assert_eq!(book.contains_all(&text), expected);
    }

    #[test]
    fn proper_prefix_pair_is_always_invalid(
        prefix in prop::collection::vec(any::<bool>(), 1..12),
        suffix in prop::collection::vec(any::<bool>(), 1..12),
        longer_first in any::<bool>(),
    ) {
        let short: BitSequence = prefix.iter().copied().collect();
        let long: BitSequence = prefix.iter().chain(suffix.iter()).copied().collect();

        let mut trie = CodeTrie::new();
        if longer_first {
            trie.put(&long, 'b');
            trie.put(&short, 'a');
        } else {
            trie.put(&short, 'a');
            trie.put(&long, 'b');
        }
        prop_assert!(!trie.is_valid());
    }

    #[test]
    fn empty_book_encodes_everything_to_nothing(text in ".{0,32}") {
        let book = CodeBook::new();
        prop_assert!(book.encode(&text).is_empty());
        prop_assert_eq!(book.contains_all(&text), text.is_empty());
    }
}
