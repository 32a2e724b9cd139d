//! Letter queue - weighted letter generation
//!
//! Letters are drawn from a pool built from the target words: each letter
//! appears as often as it occurs in those words, and letters that never occur
//! get a floor weight so every letter stays reachable. The queue is refilled
//! one batch at a time when it runs dry.

use std::collections::VecDeque;

use crate::rng::SimpleRng;
use crate::types::{FLOOR_WEIGHT, QUEUE_BATCH_SIZE};

const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Count of each letter A-Z across `words`, case-insensitive.
///
/// Characters outside A-Z are ignored.
pub fn letter_counts<S: AsRef<str>>(words: &[S]) -> [u32; 26] {
    let mut counts = [0u32; 26];
    for word in words {
        for ch in word.as_ref().chars() {
            let ch = ch.to_ascii_uppercase();
            if ch.is_ascii_uppercase() {
                counts[(ch as u8 - b'A') as usize] += 1;
            }
        }
    }
    counts
}

/// Unbounded, lazily refilled letter sequence
#[derive(Debug, Clone)]
pub struct LetterQueueGenerator {
    weights: [u32; 26],
    /// Each letter repeated by its weight
    pool: Vec<char>,
    batch_size: usize,
    pending: VecDeque<char>,
    rng: SimpleRng,
}

impl LetterQueueGenerator {
    /// Queue with the default floor weight and batch size
    pub fn new<S: AsRef<str>>(target_words: &[S], seed: u32) -> Self {
        Self::with_params(target_words, FLOOR_WEIGHT, QUEUE_BATCH_SIZE, seed)
    }

    pub fn with_params<S: AsRef<str>>(
        target_words: &[S],
        floor_weight: u32,
        batch_size: usize,
        seed: u32,
    ) -> Self {
        let counts = letter_counts(target_words);
        let mut weights = [0u32; 26];
        for (w, &count) in weights.iter_mut().zip(counts.iter()) {
            *w = if count > 0 { count } else { floor_weight };
        }

        let mut pool: Vec<char> = ALPHABET
            .iter()
            .zip(weights.iter())
            .flat_map(|(&ch, &w)| std::iter::repeat(ch).take(w as usize))
            .collect();
        if pool.is_empty() {
            // floor weight 0 with no target letters
            pool.extend_from_slice(&ALPHABET);
        }

        let mut queue = Self {
            weights,
            pool,
            batch_size: batch_size.max(1),
            pending: VecDeque::new(),
            rng: SimpleRng::new(seed),
        };
        queue.refill();
        queue
    }

    /// Queue whose first letters are exactly `prefix`, followed by weighted draws.
    ///
    /// Used to script deterministic games.
    pub fn scripted<S: AsRef<str>>(prefix: &str, target_words: &[S], seed: u32) -> Self {
        let mut queue = Self::new(target_words, seed);
        queue.prime(prefix);
        queue
    }

    /// Put `letters` in front of everything already queued, in order.
    pub fn prime(&mut self, letters: &str) {
        for ch in letters.chars().rev() {
            self.pending.push_front(ch.to_ascii_uppercase());
        }
    }

    fn refill(&mut self) {
        Self::generate_batch(&mut self.rng, &self.pool, self.batch_size, &mut self.pending);
    }

    fn generate_batch(
        rng: &mut SimpleRng,
        pool: &[char],
        batch_size: usize,
        out: &mut VecDeque<char>,
    ) {
        for _ in 0..batch_size {
            let idx = rng.next_range(pool.len() as u32) as usize;
            out.push_back(pool[idx]);
        }
    }

    /// Pop the next letter, refilling first if the queue is empty.
    pub fn dequeue(&mut self) -> char {
        if self.pending.is_empty() {
            self.refill();
        }
        // refill always pushes at least one letter
        self.pending.pop_front().unwrap_or('A')
    }

    /// The next `k` letters without consuming them.
    ///
    /// Letters beyond the current batch are previewed with a copy of the RNG, so
    /// they match what `dequeue` will produce.
    pub fn peek(&self, k: usize) -> Vec<char> {
        let mut out: Vec<char> = self.pending.iter().take(k).copied().collect();
        if out.len() < k {
            let mut preview_rng = self.rng.clone();
            let mut batch = VecDeque::with_capacity(self.batch_size);
            while out.len() < k {
                batch.clear();
                Self::generate_batch(&mut preview_rng, &self.pool, self.batch_size, &mut batch);
                out.extend(batch.iter().take(k - out.len()));
            }
        }
        out
    }

    pub fn peek_next(&self) -> char {
        match self.pending.front() {
            Some(&ch) => ch,
            None => self.peek(1).first().copied().unwrap_or('A'),
        }
    }

    /// Letters generated but not yet dequeued
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Sampling weight of `letter`, 0 for non A-Z characters
    pub fn weight(&self, letter: char) -> u32 {
        let ch = letter.to_ascii_uppercase();
        if ch.is_ascii_uppercase() {
            self.weights[(ch as u8 - b'A') as usize]
        } else {
            0
        }
    }

    /// Get the current RNG state (for restarting a game that continues the sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_counts_ignores_case_and_symbols() {
        let counts = letter_counts(&["Cat", "t-a!"]);
        assert_eq!(counts[(b'C' - b'A') as usize], 1);
        assert_eq!(counts[(b'A' - b'A') as usize], 2);
        assert_eq!(counts[(b'T' - b'A') as usize], 2);
        assert_eq!(counts.iter().sum::<u32>(), 5);
    }

    #[test]
    fn test_weights_use_counts_and_floor() {
        let queue = LetterQueueGenerator::new(&["BANANA"], 1);
        assert_eq!(queue.weight('A'), 3);
        assert_eq!(queue.weight('N'), 2);
        assert_eq!(queue.weight('B'), 1);
        assert_eq!(queue.weight('Q'), FLOOR_WEIGHT);
        assert_eq!(queue.weight('?'), 0);
    }

    #[test]
    fn test_initial_batch_is_generated() {
        let queue = LetterQueueGenerator::new(&["CHAT"], 1);
        assert_eq!(queue.pending_len(), QUEUE_BATCH_SIZE);
    }

    #[test]
    fn test_dequeue_refills_when_empty() {
        let mut queue = LetterQueueGenerator::with_params(&["CHAT"], 1, 3, 5);
        for _ in 0..3 {
            queue.dequeue();
        }
        assert_eq!(queue.pending_len(), 0);
        let ch = queue.dequeue();
        assert!(ch.is_ascii_uppercase());
        assert_eq!(queue.pending_len(), 2);
    }

    #[test]
    fn test_peek_matches_dequeue_across_batches() {
        let mut queue = LetterQueueGenerator::with_params(&["MAISON"], 1, 4, 42);
        let preview = queue.peek(10);
        assert_eq!(preview.len(), 10);
        assert_eq!(queue.pending_len(), 4);

        let drawn: Vec<char> = (0..10).map(|_| queue.dequeue()).collect();
        assert_eq!(preview, drawn);
    }

    #[test]
    fn test_scripted_prefix_comes_first() {
        let mut queue = LetterQueueGenerator::scripted("cat", &["DOG"], 1);
        assert_eq!(queue.peek(3), vec!['C', 'A', 'T']);
        assert_eq!(queue.dequeue(), 'C');
        assert_eq!(queue.dequeue(), 'A');
        assert_eq!(queue.dequeue(), 'T');
        assert_eq!(queue.pending_len(), QUEUE_BATCH_SIZE);
    }

    #[test]
    fn test_zero_floor_without_targets_falls_back_to_alphabet() {
        let words: [&str; 0] = [];
        let mut queue = LetterQueueGenerator::with_params(&words, 0, 8, 3);
        for _ in 0..20 {
            assert!(queue.dequeue().is_ascii_uppercase());
        }
    }

    #[test]
    fn test_zero_floor_only_draws_target_letters() {
        let mut queue = LetterQueueGenerator::with_params(&["AB"], 0, 16, 9);
        for _ in 0..64 {
            let ch = queue.dequeue();
            assert!(ch == 'A' || ch == 'B', "unexpected letter {ch}");
        }
    }

    #[test]
    fn test_same_seed_same_letters() {
        let mut a = LetterQueueGenerator::new(&["JARDIN"], 77);
        let mut b = LetterQueueGenerator::new(&["JARDIN"], 77);
        for _ in 0..120 {
            assert_eq!(a.dequeue(), b.dequeue());
        }
    }
}
