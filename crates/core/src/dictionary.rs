//! Word membership oracle.

use std::collections::HashSet;

/// Answers whether a string is a known word.
///
/// Lookups are case-insensitive.
pub trait Dictionary {
    fn has(&self, word: &str) -> bool;

    /// Longest known word, if the dictionary can tell. Scanners use it to
    /// skip substrings that cannot match.
    fn max_word_len(&self) -> Option<usize> {
        None
    }
}

/// In-memory word set, stored uppercase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: HashSet<String>,
    max_len: usize,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        list.extend(words);
        list
    }

    /// Parse one word per line. Blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Add a word; returns false if it was already present or is empty.
    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim().to_uppercase();
        if word.is_empty() {
            return false;
        }
        self.max_len = self.max_len.max(word.chars().count());
        self.words.insert(word)
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.insert(word.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn has(&self, word: &str) -> bool {
        if word.chars().all(|c| !c.is_ascii_lowercase()) {
            return self.words.contains(word);
        }
        self.words.contains(&word.to_uppercase())
    }

    fn max_word_len(&self) -> Option<usize> {
        Some(self.max_len)
    }
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn has(&self, word: &str) -> bool {
        (**self).has(word)
    }

    fn max_word_len(&self) -> Option<usize> {
        (**self).max_word_len()
    }
}

impl<D: Dictionary + ?Sized> Dictionary for Box<D> {
    fn has(&self, word: &str) -> bool {
        (**self).has(word)
    }

    fn max_word_len(&self) -> Option<usize> {
        (**self).max_word_len()
    }
}
