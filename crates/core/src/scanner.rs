//! Word scanner - finds dictionary words in the grid
//!
//! Every line in each enabled direction is split into maximal runs of
//! occupied cells. Each substring of a run that is at least `min_len` long is
//! looked up in the dictionary; every hit is reported, overlaps included.
//!
//! # Ordering
//!
//! Matches come out in direction order (horizontal, vertical, diagonal down,
//! diagonal up), then line order, then start offset, then length. Scoring
//! walks them in this order, so the order decides which match gets which
//! combo step.
//!
//! Line order per direction:
//! - horizontal: rows top to bottom, read left to right
//! - vertical: columns left to right, read top to bottom
//! - diagonal down: starts along the top row, then down the left column
//! - diagonal up: starts along the top row, then down the right column

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::dictionary::Dictionary;
use crate::grid::LetterGrid;
use crate::types::{Position, ScanDirection, MIN_WORD_LEN};

/// A dictionary word found along one line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordMatch {
    pub word: String,
    /// Cells in reading order
    pub cells: Vec<Position>,
    pub direction: ScanDirection,
}

impl WordMatch {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordScanner {
    directions: ArrayVec<ScanDirection, 4>,
    min_len: usize,
}

impl Default for WordScanner {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WordScanner {
    /// Scanner over rows and columns, plus both diagonals when `diagonals` is set.
    pub fn new(diagonals: bool) -> Self {
        let mut directions = ArrayVec::new();
        directions.push(ScanDirection::Horizontal);
        directions.push(ScanDirection::Vertical);
        if diagonals {
            directions.push(ScanDirection::DiagonalDown);
            directions.push(ScanDirection::DiagonalUp);
        }
        Self {
            directions,
            min_len: MIN_WORD_LEN,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    pub fn directions(&self) -> &[ScanDirection] {
        &self.directions
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// All matches in scan order. Does not touch the grid.
    pub fn scan<G, D>(&self, grid: &G, dictionary: &D) -> Vec<WordMatch>
    where
        G: LetterGrid + ?Sized,
        D: Dictionary + ?Sized,
    {
        let max_len = dictionary.max_word_len();
        if max_len.is_some_and(|m| m < self.min_len) {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut run: Vec<(Position, char)> = Vec::new();
        let mut word = String::new();

        for &direction in &self.directions {
            let (drow, dcol) = direction.step();
            for start in line_starts(direction, grid.rows(), grid.cols()) {
                run.clear();
                let mut pos = start;
                loop {
                    let in_bounds = pos.row >= 0
                        && pos.col >= 0
                        && pos.row < grid.rows() as i16
                        && pos.col < grid.cols() as i16;
                    let letter = if in_bounds { grid.letter_at(pos) } else { None };

                    match letter {
                        Some(ch) => run.push((pos, ch)),
                        None => {
                            self.scan_run(&run, direction, dictionary, max_len, &mut word, &mut matches);
                            run.clear();
                        }
                    }

                    if !in_bounds {
                        break;
                    }
                    pos = pos.offset(drow, dcol);
                }
            }
        }

        matches
    }

    fn scan_run<D: Dictionary + ?Sized>(
        &self,
        run: &[(Position, char)],
        direction: ScanDirection,
        dictionary: &D,
        max_len: Option<usize>,
        word: &mut String,
        out: &mut Vec<WordMatch>,
    ) {
        if run.len() < self.min_len {
            return;
        }

        for start in 0..run.len() {
            let longest = run.len() - start;
            let longest = max_len.map_or(longest, |m| longest.min(m));
            for len in self.min_len..=longest {
                let slice = &run[start..start + len];
                word.clear();
                word.extend(slice.iter().map(|&(_, ch)| ch));
                if dictionary.has(word) {
                    out.push(WordMatch {
                        word: word.clone(),
                        cells: slice.iter().map(|&(pos, _)| pos).collect(),
                        direction,
                    });
                }
            }
        }
    }
}

/// First cell of every line in `direction`, in line order.
fn line_starts(direction: ScanDirection, rows: u16, cols: u16) -> Vec<Position> {
    let rows = rows as i16;
    let cols = cols as i16;
    match direction {
        ScanDirection::Horizontal => (0..rows).map(|r| Position::new(r, 0)).collect(),
        ScanDirection::Vertical => (0..cols).map(|c| Position::new(0, c)).collect(),
        ScanDirection::DiagonalDown => (0..cols)
            .map(|c| Position::new(0, c))
            .chain((1..rows).map(|r| Position::new(r, 0)))
            .collect(),
        ScanDirection::DiagonalUp => (0..cols)
            .map(|c| Position::new(0, c))
            .chain((1..rows).map(|r| Position::new(r, cols - 1)))
            .collect(),
    }
}

/// Union of the cells of all matches, each cell once.
pub fn matched_cells(matches: &[WordMatch]) -> Vec<Position> {
    matches
        .iter()
        .flat_map(|m| m.cells.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordList;
    use crate::grid::GridStore;

    fn words(list: &[&str]) -> WordList {
        WordList::from_words(list.iter().copied())
    }

    #[test]
    fn test_horizontal_word() {
        let grid = GridStore::from_ascii(&["....", ".CAT"]);
        let matches = WordScanner::new(false).scan(&grid, &words(&["CAT"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].word, "CAT");
        assert_eq!(matches[0].direction, ScanDirection::Horizontal);
        assert_eq!(
            matches[0].cells,
            vec![Position::new(1, 1), Position::new(1, 2), Position::new(1, 3)]
        );
    }

    #[test]
    fn test_vertical_word_reads_top_to_bottom() {
        let grid = GridStore::from_ascii(&["D..", "O..", "G.."]);
        let matches = WordScanner::new(false).scan(&grid, &words(&["DOG", "GOD"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].word, "DOG");
        assert_eq!(matches[0].direction, ScanDirection::Vertical);
    }

    #[test]
    fn test_words_are_not_read_backwards() {
        let grid = GridStore::from_ascii(&["TAC"]);
        assert!(WordScanner::new(true).scan(&grid, &words(&["CAT"])).is_empty());
    }

    #[test]
    fn test_overlapping_matches_all_reported_in_offset_order() {
        // CHATON contains CHAT, HAT and CHATON
        let grid = GridStore::from_ascii(&["CHATON"]);
        let matches = WordScanner::new(false).scan(&grid, &words(&["CHAT", "HAT", "CHATON"]));
        let found: Vec<&str> = matches.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(found, vec!["CHAT", "CHATON", "HAT"]);
    }

    #[test]
    fn test_gap_splits_runs() {
        let grid = GridStore::from_ascii(&["CA.T"]);
        assert!(WordScanner::new(false).scan(&grid, &words(&["CAT"])).is_empty());
    }

    #[test]
    fn test_diagonals_only_when_enabled() {
        let grid = GridStore::from_ascii(&["C..", ".A.", "..T"]);
        let dict = words(&["CAT"]);
        assert!(WordScanner::new(false).scan(&grid, &dict).is_empty());

        let matches = WordScanner::new(true).scan(&grid, &dict);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].direction, ScanDirection::DiagonalDown);
    }

    #[test]
    fn test_diagonal_up_reads_from_top_right() {
        let grid = GridStore::from_ascii(&["...S", "..U.", ".N.."]);
        let matches = WordScanner::new(true).scan(&grid, &words(&["SUN"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].direction, ScanDirection::DiagonalUp);
        assert_eq!(
            matches[0].cells,
            vec![Position::new(0, 3), Position::new(1, 2), Position::new(2, 1)]
        );
    }

    #[test]
    fn test_direction_order() {
        // CAT across the top and down the left column share the C
        let grid = GridStore::from_ascii(&["CAT", "A..", "T.."]);
        let matches = WordScanner::new(true).scan(&grid, &words(&["CAT"]));
        let dirs: Vec<ScanDirection> = matches.iter().map(|m| m.direction).collect();
        assert_eq!(dirs, vec![ScanDirection::Horizontal, ScanDirection::Vertical]);
        assert_eq!(matched_cells(&matches).len(), 5);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let grid = GridStore::from_ascii(&["LIONS", "ARBRE", "CHATS"]);
        let dict = words(&["LION", "ARBRE", "CHAT", "ION", "LAC"]);
        let scanner = WordScanner::new(true);
        assert_eq!(scanner.scan(&grid, &dict), scanner.scan(&grid.snapshot(), &dict));
    }

    #[test]
    fn test_min_len_respected() {
        let grid = GridStore::from_ascii(&["ON"]);
        let dict = words(&["ON"]);
        assert!(WordScanner::new(false).scan(&grid, &dict).is_empty());
        assert_eq!(WordScanner::new(false).with_min_len(2).scan(&grid, &dict).len(), 1);
    }
}
