//! Grid module - owns the letter grid
//!
//! The grid is a `rows x cols` array where each cell is empty or holds one
//! placed letter. Storage is a flat row-major vector sized once per session.
//! Coordinates: `(row, col)` with row 0 at the top and col 0 on the left.
//! The spawn cell for new letters is `(0, cols / 2)`.

use crate::types::{Cell, PlacedLetter, Position};

/// Result of probing a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellProbe {
    Empty,
    Occupied,
    OutOfBounds,
}

/// Read access to letters, shared by the live grid and its snapshots.
pub trait LetterGrid {
    fn rows(&self) -> u16;
    fn cols(&self) -> u16;
    /// Letter at `pos`, `None` when empty or out of bounds.
    fn letter_at(&self, pos: Position) -> Option<char>;
}

/// The letter grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridStore {
    rows: u16,
    cols: u16,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl GridStore {
    /// Create an empty grid
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(rows: u16, cols: u16) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        }
    }

    /// Build a grid from text rows, `.` marks an empty cell.
    ///
    /// Handy for fixtures:
    ///
    /// ```
    /// use letter_cascade_core::GridStore;
    /// use letter_cascade_core::types::Position;
    ///
    /// let grid = GridStore::from_ascii(&["...", "CAT"]);
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.letter(Position::new(1, 2)), Some('T'));
    /// ```
    pub fn from_ascii(lines: &[&str]) -> Self {
        let rows = lines.len() as u16;
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let mut grid = Self::new(rows, cols);
        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch != '.' && ch != ' ' {
                    grid.place(Position::new(r as i16, c as i16), ch.to_ascii_uppercase(), 0);
                }
            }
        }
        grid
    }

    /// Render the grid back into text rows, `.` for empty cells.
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| {
                        self.letter(Position::new(r as i16, c as i16))
                            .unwrap_or('.')
                    })
                    .collect()
            })
            .collect()
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 || pos.row >= self.rows as i16 || pos.col >= self.cols as i16 {
            return None;
        }
        Some(pos.row as usize * self.cols as usize + pos.col as usize)
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cell where new letters appear
    pub fn spawn_position(&self) -> Position {
        Position::new(0, (self.cols / 2) as i16)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn letter(&self, pos: Position) -> Option<char> {
        self.get(pos).flatten().map(|placed| placed.character)
    }

    pub fn probe(&self, pos: Position) -> CellProbe {
        match self.get(pos) {
            None => CellProbe::OutOfBounds,
            Some(None) => CellProbe::Empty,
            Some(Some(_)) => CellProbe::Occupied,
        }
    }

    /// True only for an in-bounds empty cell; out of bounds blocks.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.probe(pos) == CellProbe::Empty
    }

    /// Place a letter into an empty cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is occupied or out of bounds.
    pub fn place(&mut self, pos: Position, character: char, tick: u64) {
        let Some(i) = self.index(pos) else {
            panic!("place out of bounds at ({}, {})", pos.row, pos.col);
        };
        if let Some(existing) = self.cells[i] {
            panic!(
                "place into occupied cell ({}, {}) holding '{}'",
                pos.row, pos.col, existing.character
            );
        }
        self.cells[i] = Some(PlacedLetter {
            character,
            placed_at_tick: tick,
        });
    }

    /// Clear every listed cell as one step and return how many held a letter.
    ///
    /// All coordinates are validated before any cell changes.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of bounds.
    pub fn remove(&mut self, cells: &[Position]) -> usize {
        if let Some(bad) = cells.iter().find(|&&pos| !self.in_bounds(pos)) {
            panic!("remove out of bounds at ({}, {})", bad.row, bad.col);
        }

        let mut cleared = 0;
        for &pos in cells {
            if let Some(i) = self.index(pos) {
                if self.cells[i].take().is_some() {
                    cleared += 1;
                }
            }
        }
        cleared
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Occupied cells over total cells, in `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        self.occupied_count() as f64 / self.total_cells() as f64
    }

    /// True if no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Owned read-only copy for scanners and renderers
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
        }
    }
}

impl LetterGrid for GridStore {
    fn rows(&self) -> u16 {
        self.rows
    }

    fn cols(&self) -> u16 {
        self.cols
    }

    fn letter_at(&self, pos: Position) -> Option<char> {
        self.letter(pos)
    }
}

/// Immutable copy of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
}

impl GridSnapshot {
    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.row < 0 || pos.col < 0 || pos.row >= self.rows as i16 || pos.col >= self.cols as i16 {
            return None;
        }
        Some(self.cells[pos.row as usize * self.cols as usize + pos.col as usize])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl LetterGrid for GridSnapshot {
    fn rows(&self) -> u16 {
        self.rows
    }

    fn cols(&self) -> u16 {
        self.cols
    }

    fn letter_at(&self, pos: Position) -> Option<char> {
        self.get(pos).flatten().map(|placed| placed.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = GridStore::new(14, 10);
        assert_eq!(grid.rows(), 14);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.fill_ratio(), 0.0);
        assert_eq!(grid.spawn_position(), Position::new(0, 5));
    }

    #[test]
    fn test_probe_reports_out_of_bounds() {
        let grid = GridStore::new(3, 3);
        assert_eq!(grid.probe(Position::new(-1, 0)), CellProbe::OutOfBounds);
        assert_eq!(grid.probe(Position::new(0, 3)), CellProbe::OutOfBounds);
        assert_eq!(grid.probe(Position::new(2, 2)), CellProbe::Empty);
        assert!(!grid.is_empty(Position::new(3, 0)));
    }

    #[test]
    fn test_place_and_remove() {
        let mut grid = GridStore::new(3, 3);
        grid.place(Position::new(2, 1), 'A', 7);
        assert_eq!(grid.probe(Position::new(2, 1)), CellProbe::Occupied);
        assert_eq!(
            grid.get(Position::new(2, 1)),
            Some(Some(PlacedLetter {
                character: 'A',
                placed_at_tick: 7
            }))
        );

        let cleared = grid.remove(&[Position::new(2, 1), Position::new(0, 0)]);
        assert_eq!(cleared, 1);
        assert!(grid.is_empty(Position::new(2, 1)));
    }

    #[test]
    fn test_remove_same_cell_twice_counts_once() {
        let mut grid = GridStore::from_ascii(&["CAT"]);
        let p = Position::new(0, 1);
        assert_eq!(grid.remove(&[p, p]), 1);
        assert_eq!(grid.to_ascii(), vec!["C.T".to_string()]);
    }

    #[test]
    #[should_panic(expected = "occupied")]
    fn test_place_into_occupied_cell_panics() {
        let mut grid = GridStore::new(2, 2);
        grid.place(Position::new(0, 0), 'A', 0);
        grid.place(Position::new(0, 0), 'B', 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_place_out_of_bounds_panics() {
        let mut grid = GridStore::new(2, 2);
        grid.place(Position::new(2, 0), 'A', 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_remove_validates_before_clearing() {
        let mut grid = GridStore::from_ascii(&["AB"]);
        grid.remove(&[Position::new(0, 0), Position::new(5, 5)]);
    }

    #[test]
    fn test_fill_ratio() {
        let grid = GridStore::from_ascii(&["AB", "C."]);
        assert!((grid.fill_ratio() - 0.75).abs() < f64::EPSILON);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut grid = GridStore::from_ascii(&["A."]);
        let snap = grid.snapshot();
        grid.place(Position::new(0, 1), 'B', 1);
        assert_eq!(snap.letter_at(Position::new(0, 1)), None);
        assert_eq!(snap.letter_at(Position::new(0, 0)), Some('A'));
        assert_eq!(grid.letter_at(Position::new(0, 1)), Some('B'));
    }
}
