//! Random codes and sample text.
//!
//! When no codewords are given, we generate a random *complete* prefix-free
//! code: start from a single empty codeword and keep splitting a randomly
//! chosen codeword `w` into `w0` and `w1` until there is one per symbol.
//! The result is a full binary tree, so the derived trie is always valid.
//!
//! # Design
//!
//! The shape is random, not frequency-driven. Codeword lengths range from
//! a balanced tree to a long chain depending on the seed, which makes the
//! code statistics worth looking at.

use prefix_code_core::{BitSequence, CodeBook};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Build a random complete code for `alphabet`.
///
/// `alphabet` should hold at least two distinct symbols; with one symbol
/// the only codeword is the empty sequence.
pub fn random_code(alphabet: &[char], rng: &mut ChaCha8Rng) -> CodeBook {
    let mut codewords = vec![BitSequence::new()];

    while codewords.len() < alphabet.len() {
        let split = codewords.swap_remove(rng.gen_range(0..codewords.len()));
        for bit in [false, true] {
            let mut child = split.clone();
            child.push(bit);
            codewords.push(child);
        }
    }

    alphabet.iter().copied().zip(codewords).collect()
}

/// Generate `len` symbols drawn uniformly from `alphabet`.
///
/// # Panics
/// If `alphabet` is empty and `len > 0`.
pub fn generate_text(alphabet: &[char], len: usize, rng: &mut ChaCha8Rng) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefix_code_core::CodeTrie;
    use rand::SeedableRng;

    #[test]
    fn test_random_code_is_complete() {
        let alphabet: Vec<char> = "abcdefghij".chars().collect();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let book = random_code(&alphabet, &mut rng);

            assert_eq!(book.len(), alphabet.len());
            assert!(book.stats().is_complete());
            assert!(CodeTrie::from_code_book(&book).is_valid());
        }
    }

    #[test]
    fn test_two_symbols() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let book = random_code(&['x', 'y'], &mut rng);
        assert_eq!(book.stats().max_len, 1);
    }

    #[test]
    fn test_determinism() {
        let alphabet: Vec<char> = "abcdef".chars().collect();
        let mut rng1 = ChaCha8Rng::seed_from_u64(12345);
        let mut rng2 = ChaCha8Rng::seed_from_u64(12345);

        let book1 = random_code(&alphabet, &mut rng1);
        let book2 = random_code(&alphabet, &mut rng2);
        for symbol in alphabet.iter().copied() {
            assert_eq!(book1.lookup(symbol), book2.lookup(symbol));
        }
        assert_eq!(
            generate_text(&alphabet, 100, &mut rng1),
            generate_text(&alphabet, 100, &mut rng2)
        );
    }

    #[test]
    fn test_generate_text() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for len in [0, 1, 100, 1000] {
            let text = generate_text(&['a', 'b'], len, &mut rng);
            assert_eq!(text.chars().count(), len);
            assert!(text.chars().all(|c| c == 'a' || c == 'b'));
        }
    }
}
