//! Game session - owns every component and runs the lock pipeline
//!
//! The host drives a session with two inputs:
//!
//! - [`GameSession::update`] once per frame with the elapsed milliseconds.
//!   Gravity fires whenever the accumulated time reaches the level's fall
//!   interval.
//! - [`GameSession::apply_action`] for player input.
//!
//! Every lock runs the same pipeline, to completion, before the next letter
//! spawns:
//!
//! ```text
//! lock -> scan -> score -> remove matched cells -> level -> game over check -> spawn
//! ```
//!
//! Once the game is over every mutating call is a no-op until [`GameSession::restart`].

use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::dictionary::{Dictionary, WordList};
use crate::error::ConfigError;
use crate::falling::{FallingLetter, FallingLetterController, SpawnOutcome, TickOutcome};
use crate::game_over::{GameOverContext, GameOverEvaluator, GameOverState};
use crate::grid::{GridSnapshot, GridStore};
use crate::level::LevelController;
use crate::ports::{
    Clock, GameEvents, HighScoreStore, MemoryHighScoreStore, MonotonicClock, NoopEvents,
};
use crate::queue::LetterQueueGenerator;
use crate::scanner::{matched_cells, WordScanner};
use crate::scoring::{ScoreEngine, ScoredWord};
use crate::snapshot::SessionSnapshot;
use crate::types::{
    FinalStats, GameAction, GameOverReason, MoveDirection, ScoreStats, NEXT_PREVIEW_LEN,
};

/// Target words plus the injected oracle
struct SessionDictionary {
    targets: WordList,
    extra: Option<Box<dyn Dictionary>>,
}

impl Dictionary for SessionDictionary {
    fn has(&self, word: &str) -> bool {
        self.targets.has(word) || self.extra.as_ref().is_some_and(|d| d.has(word))
    }

    fn max_word_len(&self) -> Option<usize> {
        let targets = self.targets.max_word_len().unwrap_or(0);
        match &self.extra {
            None => Some(targets),
            Some(extra) => extra.max_word_len().map(|len| len.max(targets)),
        }
    }
}

/// Wires collaborators into a [`GameSession`]
///
/// Anything not supplied falls back to an in-process default: no events, a
/// monotonic clock, an in-memory high score and a queue seeded from the config.
pub struct SessionBuilder {
    config: SessionConfig,
    dictionary: Option<Box<dyn Dictionary>>,
    events: Option<Box<dyn GameEvents>>,
    clock: Option<Box<dyn Clock>>,
    store: Option<Box<dyn HighScoreStore>>,
    queue: Option<LetterQueueGenerator>,
    grid: Option<GridStore>,
}

impl SessionBuilder {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            dictionary: None,
            events: None,
            clock: None,
            store: None,
            queue: None,
            grid: None,
        }
    }

    /// Extra words on top of the target words
    pub fn dictionary(mut self, dictionary: Box<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn events(mut self, events: Box<dyn GameEvents>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn high_score_store(mut self, store: Box<dyn HighScoreStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn queue(mut self, queue: LetterQueueGenerator) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Start from a pre-filled grid instead of an empty one
    pub fn grid(mut self, grid: GridStore) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn build(self) -> Result<GameSession, ConfigError> {
        let config = self.config;
        config.validate()?;

        let (rows, cols) = config.grid_dims();
        let grid = match self.grid {
            Some(grid) if grid.rows() != rows || grid.cols() != cols => {
                return Err(ConfigError::GridMismatch {
                    rows,
                    cols,
                    actual_rows: grid.rows(),
                    actual_cols: grid.cols(),
                });
            }
            Some(grid) => grid,
            None => GridStore::new(rows, cols),
        };

        let queue = self.queue.unwrap_or_else(|| {
            LetterQueueGenerator::with_params(
                &config.target_words,
                config.floor_weight,
                config.queue_batch_size,
                config.seed,
            )
        });
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryHighScoreStore::new()));

        info!(
            rows,
            cols,
            targets = config.target_words.len(),
            diagonals = config.diagonal_words,
            difficulty = config.difficulty.as_str(),
            "session built"
        );

        Ok(GameSession {
            grid,
            queue,
            controller: FallingLetterController::new(),
            scanner: WordScanner::new(config.diagonal_words).with_min_len(config.min_word_len),
            dictionary: SessionDictionary {
                targets: WordList::from_words(&config.target_words),
                extra: self.dictionary,
            },
            scores: ScoreEngine::new(&config.target_words, store),
            level: LevelController::new(config.progression, config.difficulty),
            evaluator: GameOverEvaluator::new(config.grid_full_ratio, config.time_limit_ms)
                .with_victory_on_all_targets(config.victory_on_all_targets),
            game_over: GameOverState::default(),
            final_stats: None,
            events: self.events.unwrap_or_else(|| Box::new(NoopEvents)),
            clock: self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
            last_words: Vec::new(),
            drop_timer_ms: 0,
            lock_count: 0,
            episode_id: 0,
            started: false,
            paused: false,
            started_at_ms: 0,
            paused_at_ms: None,
            paused_total_ms: 0,
            frozen_play_time_ms: None,
            config,
        })
    }
}

/// One game: grid, queue, falling letter, scoring, level and game-over state
pub struct GameSession {
    config: SessionConfig,
    grid: GridStore,
    queue: LetterQueueGenerator,
    controller: FallingLetterController,
    scanner: WordScanner,
    dictionary: SessionDictionary,
    scores: ScoreEngine,
    level: LevelController,
    evaluator: GameOverEvaluator,
    game_over: GameOverState,
    final_stats: Option<FinalStats>,
    events: Box<dyn GameEvents>,
    clock: Box<dyn Clock>,
    /// Words scored by the most recent lock
    last_words: Vec<ScoredWord>,
    drop_timer_ms: u32,
    /// Locks so far; stamped on placed letters
    lock_count: u64,
    /// Increments on restart
    episode_id: u32,
    started: bool,
    paused: bool,
    started_at_ms: u64,
    paused_at_ms: Option<u64>,
    paused_total_ms: u64,
    /// Play time captured at game over
    frozen_play_time_ms: Option<u64>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("grid", &self.grid)
            .field("falling", &self.controller.letter())
            .field("scores", &self.scores)
            .field("level", &self.level)
            .field("game_over", &self.game_over)
            .field("started", &self.started)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Session with default collaborators
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        SessionBuilder::new(config).build()
    }

    pub fn builder(config: SessionConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Start the clock and spawn the first letter. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.started_at_ms = self.clock.now_ms();
        info!(episode = self.episode_id, "game started");
        self.spawn_next();
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.started || self.paused || self.game_over.is_over() {
            return false;
        }
        self.paused = true;
        self.paused_at_ms = Some(self.clock.now_ms());
        debug!("paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        let now = self.clock.now_ms();
        if let Some(at) = self.paused_at_ms.take() {
            self.paused_total_ms += now.saturating_sub(at);
        }
        self.paused = false;
        debug!("resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Start a fresh game with the same configuration.
    ///
    /// The high score is kept and the letter queue carries on from where it was.
    pub fn restart(&mut self) {
        self.grid.clear();
        self.controller.reset();
        self.scores.reset();
        self.level.reset();
        self.game_over = GameOverState::default();
        self.final_stats = None;
        self.last_words.clear();
        self.drop_timer_ms = 0;
        self.lock_count = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.started = false;
        self.paused = false;
        self.paused_at_ms = None;
        self.paused_total_ms = 0;
        self.frozen_play_time_ms = None;
        self.start();
    }

    fn playable(&self) -> bool {
        self.started && !self.paused && !self.game_over.is_over()
    }

    /// Advance gravity and timers by `elapsed_ms`. Returns true if anything changed.
    pub fn update(&mut self, elapsed_ms: u32) -> bool {
        if !self.playable() {
            return false;
        }

        self.scores.update(self.clock.now_ms());
        if self.evaluator.time_expired(self.play_time_ms()) {
            self.end_game(GameOverReason::TimeLimit);
            return true;
        }

        if self.controller.letter().is_none() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.level.fall_interval_ms() {
            return false;
        }
        self.drop_timer_ms = 0;

        match self.controller.tick(&self.grid) {
            TickOutcome::Moved => true,
            TickOutcome::Landed => {
                self.resolve_lock();
                true
            }
            TickOutcome::Idle => false,
        }
    }

    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_letter(MoveDirection::Left),
            GameAction::MoveRight => self.move_letter(MoveDirection::Right),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate(true),
            GameAction::RotateCcw => self.rotate(false),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    pub fn move_letter(&mut self, dir: MoveDirection) -> bool {
        if !self.playable() {
            return false;
        }
        self.controller.try_move(dir, &self.grid)
    }

    /// One cell down. A blocked soft drop leaves locking to gravity.
    pub fn soft_drop(&mut self) -> bool {
        self.move_letter(MoveDirection::Down)
    }

    /// Drop to the landing cell and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        match self.controller.hard_drop(&self.grid) {
            Some(rows) => {
                debug!(rows, "hard drop");
                self.resolve_lock();
                true
            }
            None => false,
        }
    }

    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.playable() {
            return false;
        }
        self.controller.rotate(clockwise)
    }

    /// Start a timed score multiplier, replacing any active one
    pub fn activate_multiplier(&mut self, factor: f64, duration_ms: u64) -> bool {
        if !self.playable() {
            return false;
        }
        let now = self.clock.now_ms();
        self.scores.activate_multiplier(factor, duration_ms, now)
    }

    /// Multiplier with the configured factor and duration
    pub fn activate_power_up(&mut self) -> bool {
        self.activate_multiplier(self.config.multiplier_factor, self.config.multiplier_duration_ms)
    }

    fn spawn_next(&mut self) {
        match self.controller.spawn(&self.grid, &mut self.queue) {
            SpawnOutcome::Spawned(_) => self.drop_timer_ms = 0,
            SpawnOutcome::Blocked => self.end_game(GameOverReason::GridBlocked),
            SpawnOutcome::Halted => {}
        }
    }

    fn resolve_lock(&mut self) {
        let tick = self.lock_count;
        let Some(locked) = self.controller.lock(&mut self.grid, tick) else {
            return;
        };
        self.lock_count += 1;
        self.scores.record_letter_placed();
        self.events.on_letter_locked(locked.character, locked.position);

        let matches = self.scanner.scan(&self.grid, &self.dictionary);
        let scored = self.scores.apply_matches(&matches, self.clock.now_ms());
        for word in &scored {
            self.events.on_word_completed(&word.word, word.points);
        }
        self.last_words = scored;

        if !matches.is_empty() {
            let cells = matched_cells(&matches);
            let removed = self.grid.remove(&cells);
            debug!(words = matches.len(), removed, "cleared matched letters");
            self.events.on_letters_cleared(&cells);
        }

        if let Some(change) = self
            .level
            .update(self.scores.words_completed(), self.scores.score())
        {
            self.events.on_level_up(change.old_level, change.new_level);
        }

        let (found, total) = self.scores.target_progress();
        let ctx = GameOverContext {
            spawn_blocked: !self.grid.is_empty(self.grid.spawn_position()),
            play_time_ms: self.play_time_ms(),
            all_targets_found: total > 0 && found == total,
        };
        if let Some(reason) = self.evaluator.check(&self.grid, ctx) {
            self.end_game(reason);
            return;
        }

        self.spawn_next();
    }

    fn end_game(&mut self, reason: GameOverReason) {
        let play_time_ms = self.play_time_ms();
        if !self.game_over.set(reason) {
            return;
        }
        self.frozen_play_time_ms = Some(play_time_ms);
        self.controller.halt();
        self.scores.seal();

        let stats = FinalStats {
            score: self.scores.score(),
            words_completed: self.scores.words_completed(),
            letters_placed: self.scores.letters_placed(),
            play_time_ms,
            level_reached: self.level.level(),
            max_combo: self.scores.max_combo(),
        };
        self.final_stats = Some(stats);
        info!(
            reason = reason.as_str(),
            score = stats.score,
            words = stats.words_completed,
            level = stats.level_reached,
            "game over"
        );
        self.events.on_game_over(reason, &stats);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn grid_snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn falling_letter(&self) -> Option<FallingLetter> {
        self.controller.letter()
    }

    pub fn landing_row(&self) -> Option<i16> {
        self.controller.landing_row(&self.grid)
    }

    /// Upcoming letters for the preview
    pub fn next_letters(&self) -> Vec<char> {
        self.queue.peek(NEXT_PREVIEW_LEN)
    }

    pub fn score_stats(&self) -> ScoreStats {
        self.scores.stats()
    }

    /// Set once the game ends
    pub fn final_stats(&self) -> Option<FinalStats> {
        self.final_stats
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.level.fall_interval_ms()
    }

    /// Milliseconds played, excluding pauses
    pub fn play_time_ms(&self) -> u64 {
        if let Some(frozen) = self.frozen_play_time_ms {
            return frozen;
        }
        if !self.started {
            return 0;
        }
        let now = self.clock.now_ms();
        let paused_now = self.paused_at_ms.map_or(0, |at| now.saturating_sub(at));
        now.saturating_sub(self.started_at_ms)
            .saturating_sub(self.paused_total_ms + paused_now)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_over()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over.reason()
    }

    pub fn last_words(&self) -> &[ScoredWord] {
        &self.last_words
    }

    /// `(distinct target words found, total target words)`
    pub fn target_progress(&self) -> (usize, usize) {
        self.scores.target_progress()
    }

    pub fn found_targets(&self) -> Vec<String> {
        self.scores.found_targets().map(str::to_string).collect()
    }

    /// Points earned above base word value
    pub fn bonus_points(&self) -> u64 {
        self.scores.bonus_points()
    }

    pub fn average_points_per_word(&self) -> f64 {
        self.scores.average_points_per_word()
    }

    pub fn current_multiplier(&self) -> f64 {
        self.scores.current_multiplier()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (targets_found, targets_total) = self.scores.target_progress();
        SessionSnapshot {
            grid: self.grid.snapshot(),
            falling: self.controller.letter(),
            landing_row: self.landing_row(),
            next_letters: self.next_letters(),
            stats: self.scores.stats(),
            level: self.level.level(),
            fall_interval_ms: self.level.fall_interval_ms(),
            multiplier: self.scores.current_multiplier(),
            multiplier_remaining_ms: self.scores.multiplier_remaining_ms(self.clock.now_ms()),
            play_time_ms: self.play_time_ms(),
            time_limit_ms: self.evaluator.time_limit_ms(),
            started: self.started,
            paused: self.paused,
            game_over: self.game_over.reason(),
            targets_found,
            targets_total,
            last_words: self
                .last_words
                .iter()
                .map(|w| (w.word.clone(), w.points))
                .collect(),
        }
    }
}
