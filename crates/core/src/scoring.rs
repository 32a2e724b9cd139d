//! Scoring module - points, combo, streak and high score
//!
//! # Per-word points
//!
//! | Component | Rule |
//! |-----------|------|
//! | base | `max(10 x len, 30)`, x1.5 for 6+ letters, x1.2 for 4-5 letters |
//! | combo | `2^(combo-1) x 10` once combo > 1 (combo counts matches in one lock) |
//! | streak | `streak x 5` once streak > 1 (streak counts consecutive scoring locks) |
//! | difficulty | 15 per rare letter (Q W X Y Z K J) |
//! | special | +100 target word, +50 all vowels or all consonants, +75 palindrome |
//!
//! `total = round((base + combo + streak + difficulty) x multiplier) + special`
//!
//! The multiplier comes from a timed power-up and falls back to 1 once it
//! expires. Expiry is checked whenever points are applied and on `update`.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::ports::HighScoreStore;
use crate::scanner::WordMatch;
use crate::types::{
    ScoreStats, PALINDROME_BONUS, PERFECT_WORD_BONUS, RARE_LETTERS, RARE_LETTER_BONUS,
    TARGET_WORD_BONUS, VOWELS,
};

/// Base points for a word of `len` letters
pub fn base_points(len: usize) -> u64 {
    let len = len as u64;
    match len {
        // x1.5 and x1.2 of 10 x len, kept in integers
        6.. => 15 * len,
        4..=5 => 12 * len,
        _ => (10 * len).max(30),
    }
}

/// Combo bonus for the `combo`-th match of a lock
pub fn combo_bonus(combo: u32) -> u64 {
    if combo <= 1 {
        return 0;
    }
    1u64.checked_shl(combo - 1)
        .map_or(u64::MAX, |step| step.saturating_mul(10))
}

pub fn streak_bonus(streak: u32) -> u64 {
    if streak <= 1 {
        0
    } else {
        streak as u64 * 5
    }
}

pub fn difficulty_bonus(word: &str) -> u64 {
    word.chars()
        .filter(|c| RARE_LETTERS.contains(&c.to_ascii_uppercase()))
        .count() as u64
        * RARE_LETTER_BONUS as u64
}

/// Only vowels, or only consonants
pub fn is_perfect_word(word: &str) -> bool {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return false;
    }
    let vowels = letters.iter().filter(|c| VOWELS.contains(c)).count();
    vowels == 0 || vowels == letters.len()
}

pub fn is_palindrome(word: &str) -> bool {
    let chars: Vec<char> = word.chars().map(|c| c.to_ascii_uppercase()).collect();
    chars.len() > 1 && chars.iter().eq(chars.iter().rev())
}

pub fn special_bonus(word: &str, is_target: bool) -> u64 {
    let mut bonus = 0;
    if is_target {
        bonus += TARGET_WORD_BONUS as u64;
    }
    if is_perfect_word(word) {
        bonus += PERFECT_WORD_BONUS as u64;
    }
    if is_palindrome(word) {
        bonus += PALINDROME_BONUS as u64;
    }
    bonus
}

/// Components of one word's points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsBreakdown {
    pub base: u64,
    pub combo: u64,
    pub streak: u64,
    pub difficulty: u64,
    pub special: u64,
    pub multiplier: f64,
    pub total: u64,
}

impl PointsBreakdown {
    pub fn compute(word: &str, combo: u32, streak: u32, is_target: bool, multiplier: f64) -> Self {
        let base = base_points(word.chars().count());
        let combo = combo_bonus(combo);
        let streak = streak_bonus(streak);
        let difficulty = difficulty_bonus(word);
        let special = special_bonus(word, is_target);

        let scaled = base
            .saturating_add(combo)
            .saturating_add(streak)
            .saturating_add(difficulty) as f64
            * multiplier;
        let total = (scaled.round() as u64).saturating_add(special);

        Self {
            base,
            combo,
            streak,
            difficulty,
            special,
            multiplier,
            total,
        }
    }
}

/// A scored match
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredWord {
    pub word: String,
    pub points: u64,
    pub breakdown: PointsBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveMultiplier {
    factor: f64,
    expires_at_ms: u64,
}

/// Owns score, combo and streak state for one session
pub struct ScoreEngine {
    score: u64,
    high_score: u64,
    combo: u32,
    max_combo: u32,
    streak: u32,
    max_streak: u32,
    words_completed: u32,
    letters_placed: u32,
    bonus_points: u64,
    multiplier: Option<ActiveMultiplier>,
    targets: HashSet<String>,
    found_targets: BTreeSet<String>,
    store: Box<dyn HighScoreStore>,
    sealed: bool,
}

impl std::fmt::Debug for ScoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreEngine")
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("combo", &self.combo)
            .field("streak", &self.streak)
            .field("words_completed", &self.words_completed)
            .field("sealed", &self.sealed)
            .finish_non_exhaustive()
    }
}

impl ScoreEngine {
    /// Create an engine and load the stored high score.
    ///
    /// A failed load is logged and treated as no high score.
    pub fn new<S: AsRef<str>>(target_words: &[S], store: Box<dyn HighScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                warn!("failed to load high score: {err}");
                0
            }
        };

        Self {
            score: 0,
            high_score,
            combo: 0,
            max_combo: 0,
            streak: 0,
            max_streak: 0,
            words_completed: 0,
            letters_placed: 0,
            bonus_points: 0,
            multiplier: None,
            targets: target_words
                .iter()
                .map(|w| w.as_ref().trim().to_uppercase())
                .filter(|w| !w.is_empty())
                .collect(),
            found_targets: BTreeSet::new(),
            store,
            sealed: false,
        }
    }

    /// Clear per-game state, keeping the high score and store
    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.words_completed = 0;
        self.letters_placed = 0;
        self.bonus_points = 0;
        self.multiplier = None;
        self.found_targets.clear();
        self.sealed = false;
    }

    /// Reject every further mutation
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn record_letter_placed(&mut self) {
        if !self.sealed {
            self.letters_placed += 1;
        }
    }

    /// Score the matches of one lock, in order.
    ///
    /// A lock with no matches breaks the streak.
    pub fn apply_matches(&mut self, matches: &[WordMatch], now_ms: u64) -> Vec<ScoredWord> {
        if self.sealed {
            return Vec::new();
        }

        self.combo = 0;
        if matches.is_empty() {
            self.streak = 0;
            return Vec::new();
        }

        self.update(now_ms);
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);

        let multiplier = self.current_multiplier();
        let mut scored = Vec::with_capacity(matches.len());
        for m in matches {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);

            let is_target = self.is_target(&m.word);
            let breakdown =
                PointsBreakdown::compute(&m.word, self.combo, self.streak, is_target, multiplier);

            self.add_points(breakdown.total);
            self.bonus_points = self
                .bonus_points
                .saturating_add(breakdown.total.saturating_sub(breakdown.base));
            self.words_completed += 1;
            if is_target {
                self.found_targets.insert(m.word.to_uppercase());
            }

            debug!(
                word = %m.word,
                combo = self.combo,
                streak = self.streak,
                points = breakdown.total,
                "word scored"
            );
            scored.push(ScoredWord {
                word: m.word.clone(),
                points: breakdown.total,
                breakdown,
            });
        }
        scored
    }

    fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(err) = self.store.save(self.high_score) {
                warn!("failed to save high score {}: {err}", self.high_score);
            }
        }
    }

    /// Start a timed multiplier, replacing any active one.
    pub fn activate_multiplier(&mut self, factor: f64, duration_ms: u64, now_ms: u64) -> bool {
        if self.sealed || !factor.is_finite() || factor <= 0.0 || duration_ms == 0 {
            return false;
        }
        self.multiplier = Some(ActiveMultiplier {
            factor,
            expires_at_ms: now_ms.saturating_add(duration_ms),
        });
        true
    }

    /// Expire the multiplier once its time has passed
    pub fn update(&mut self, now_ms: u64) {
        if let Some(active) = self.multiplier {
            if now_ms >= active.expires_at_ms {
                debug!(factor = active.factor, "multiplier expired");
                self.multiplier = None;
            }
        }
    }

    pub fn current_multiplier(&self) -> f64 {
        self.multiplier.map_or(1.0, |m| m.factor)
    }

    /// Milliseconds left on the multiplier, 0 when none is active
    pub fn multiplier_remaining_ms(&self, now_ms: u64) -> u64 {
        self.multiplier
            .map_or(0, |m| m.expires_at_ms.saturating_sub(now_ms))
    }

    pub fn is_target(&self, word: &str) -> bool {
        self.targets.contains(&word.to_uppercase())
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn words_completed(&self) -> u32 {
        self.words_completed
    }

    pub fn letters_placed(&self) -> u32 {
        self.letters_placed
    }

    /// Points earned above the base value of each word
    pub fn bonus_points(&self) -> u64 {
        self.bonus_points
    }

    pub fn average_points_per_word(&self) -> f64 {
        if self.words_completed == 0 {
            0.0
        } else {
            self.score as f64 / self.words_completed as f64
        }
    }

    /// `(distinct target words completed, total target words)`
    pub fn target_progress(&self) -> (usize, usize) {
        (self.found_targets.len(), self.targets.len())
    }

    pub fn found_targets(&self) -> impl Iterator<Item = &str> {
        self.found_targets.iter().map(String::as_str)
    }

    pub fn stats(&self) -> ScoreStats {
        ScoreStats {
            score: self.score,
            high_score: self.high_score,
            combo: self.combo,
            max_combo: self.max_combo,
            words_completed: self.words_completed,
            letters_placed: self.letters_placed,
            streak: self.streak,
            max_streak: self.max_streak,
        }
    }
}
