//! Terminal conditions.
//!
//! Checked after every lock, first match wins:
//!
//! 0. `ALL_TARGETS_FOUND`: only when victory is enabled, every target word found
//! 1. `GRID_BLOCKED`: the spawn cell is occupied
//! 2. `GRID_FULL`: fill ratio at or above the threshold
//! 3. `TIME_LIMIT`: unpaused play time at or above the limit
//! 4. `NO_VALID_MOVES`: no empty cell is reachable by the next letter

use crate::grid::GridStore;
use crate::types::{GameOverReason, DEFAULT_GRID_FULL_RATIO, DEFAULT_TIME_LIMIT_MS};

/// Session facts the grid alone cannot provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameOverContext {
    pub spawn_blocked: bool,
    pub play_time_ms: u64,
    /// At least one target word exists and all of them were completed
    pub all_targets_found: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverEvaluator {
    grid_full_ratio: f64,
    time_limit_ms: Option<u64>,
    victory_on_all_targets: bool,
}

impl Default for GameOverEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_FULL_RATIO, Some(DEFAULT_TIME_LIMIT_MS))
    }
}

impl GameOverEvaluator {
    pub fn new(grid_full_ratio: f64, time_limit_ms: Option<u64>) -> Self {
        Self {
            grid_full_ratio,
            time_limit_ms,
            victory_on_all_targets: false,
        }
    }

    /// End the game as a win once every target word is found
    pub fn with_victory_on_all_targets(mut self, enabled: bool) -> Self {
        self.victory_on_all_targets = enabled;
        self
    }

    pub fn time_limit_ms(&self) -> Option<u64> {
        self.time_limit_ms
    }

    pub fn check(&self, grid: &GridStore, ctx: GameOverContext) -> Option<GameOverReason> {
        if self.victory_on_all_targets && ctx.all_targets_found {
            return Some(GameOverReason::AllTargetsFound);
        }
        if ctx.spawn_blocked {
            return Some(GameOverReason::GridBlocked);
        }
        if grid.fill_ratio() >= self.grid_full_ratio {
            return Some(GameOverReason::GridFull);
        }
        if self.time_expired(ctx.play_time_ms) {
            return Some(GameOverReason::TimeLimit);
        }
        if !has_reachable_cell(grid) {
            return Some(GameOverReason::NoValidMoves);
        }
        None
    }

    pub fn time_expired(&self, play_time_ms: u64) -> bool {
        self.time_limit_ms.is_some_and(|limit| play_time_ms >= limit)
    }
}

/// True if some empty cell is reachable by a letter spawned now.
///
/// A letter enters at the spawn cell and can always lock where it enters,
/// so an empty spawn cell is itself a reachable cell.
pub fn has_reachable_cell(grid: &GridStore) -> bool {
    grid.is_empty(grid.spawn_position())
}

/// Write-once terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameOverState {
    reason: Option<GameOverReason>,
}

impl GameOverState {
    pub fn is_over(&self) -> bool {
        self.reason.is_some()
    }

    pub fn reason(&self) -> Option<GameOverReason> {
        self.reason
    }

    /// Record the reason; returns false if the game had already ended.
    pub fn set(&mut self, reason: GameOverReason) -> bool {
        if self.reason.is_some() {
            return false;
        }
        self.reason = Some(reason);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxed() -> GameOverEvaluator {
        GameOverEvaluator::new(1.0, None)
    }

    #[test]
    fn test_empty_grid_is_playable() {
        let grid = GridStore::new(14, 10);
        assert_eq!(GameOverEvaluator::default().check(&grid, GameOverContext::default()), None);
    }

    #[test]
    fn test_spawn_blocked_wins_over_everything() {
        let grid = GridStore::from_ascii(&["XXX", "XXX"]);
        let ctx = GameOverContext {
            spawn_blocked: true,
            play_time_ms: u64::MAX,
            ..GameOverContext::default()
        };
        assert_eq!(
            GameOverEvaluator::default().check(&grid, ctx),
            Some(GameOverReason::GridBlocked)
        );
    }

    #[test]
    fn test_grid_full_threshold() {
        // 17 of 20 cells = 0.85
        let grid = GridStore::from_ascii(&[".XX..", "XXXXX", "XXXXX", "XXXXX"]);
        let ctx = GameOverContext {
            spawn_blocked: false,
            play_time_ms: 0,
            ..GameOverContext::default()
        };
        // spawn (0, 2) is occupied here but the flag is what counts
        assert_eq!(
            GameOverEvaluator::default().check(&grid, ctx),
            Some(GameOverReason::GridFull)
        );
    }

    #[test]
    fn test_time_limit() {
        let grid = GridStore::new(5, 5);
        let eval = GameOverEvaluator::new(0.85, Some(1_000));
        let mut ctx = GameOverContext {
            spawn_blocked: false,
            play_time_ms: 999,
            ..GameOverContext::default()
        };
        assert_eq!(eval.check(&grid, ctx), None);
        ctx.play_time_ms = 1_000;
        assert_eq!(eval.check(&grid, ctx), Some(GameOverReason::TimeLimit));
        assert!(!relaxed().time_expired(u64::MAX));
    }

    #[test]
    fn test_boxed_in_spawn_is_still_playable() {
        // spawn (0, 1) is empty with every neighbour taken
        let grid = GridStore::from_ascii(&["X.X", "XXX", "..."]);
        assert!(has_reachable_cell(&grid));
        assert_eq!(relaxed().check(&grid, GameOverContext::default()), None);
    }

    #[test]
    fn test_no_valid_moves_when_spawn_is_taken() {
        let grid = GridStore::from_ascii(&["XXX", "...", "..."]);
        assert!(!has_reachable_cell(&grid));
        assert_eq!(
            relaxed().check(&grid, GameOverContext::default()),
            Some(GameOverReason::NoValidMoves)
        );
    }

    #[test]
    fn test_reachable_through_a_shaft() {
        let grid = GridStore::from_ascii(&["X.X", "X.X", "XX."]);
        // (1, 1) is reachable by moving down once
        assert!(has_reachable_cell(&grid));
    }

    #[test]
    fn test_victory_only_when_enabled() {
        let grid = GridStore::from_ascii(&["XXX", "XXX"]);
        let ctx = GameOverContext {
            spawn_blocked: true,
            all_targets_found: true,
            ..GameOverContext::default()
        };
        assert_eq!(relaxed().check(&grid, ctx), Some(GameOverReason::GridBlocked));
        assert_eq!(
            relaxed().with_victory_on_all_targets(true).check(&grid, ctx),
            Some(GameOverReason::AllTargetsFound)
        );

        let open = GridStore::new(3, 3);
        let unfinished = GameOverContext::default();
        assert_eq!(relaxed().with_victory_on_all_targets(true).check(&open, unfinished), None);
    }

    #[test]
    fn test_game_over_state_is_write_once() {
        let mut state = GameOverState::default();
        assert!(!state.is_over());
        assert!(state.set(GameOverReason::GridFull));
        assert!(!state.set(GameOverReason::TimeLimit));
        assert_eq!(state.reason(), Some(GameOverReason::GridFull));
    }
}
