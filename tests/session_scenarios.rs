//! End-to-end game scenarios driven through the session API

use letter_cascade::core::{
    EventLog, GameEvent, GameSession, GridStore, LetterQueueGenerator, ManualClock,
    SessionBuilder, SessionConfig, WordList,
};
use letter_cascade::types::{GameAction, GameOverReason, MoveDirection, Position};
use letter_cascade::JsonFileHighScoreStore;

fn config(rows: u16, cols: u16) -> SessionConfig {
    SessionConfig {
        rows,
        cols,
        target_words: Vec::new(),
        time_limit_ms: None,
        ..SessionConfig::default()
    }
}

fn build(
    config: SessionConfig,
    grid: Option<GridStore>,
    letters: &str,
    words: &[&str],
) -> (GameSession, EventLog, ManualClock) {
    let events = EventLog::new();
    let clock = ManualClock::new();
    let mut builder = SessionBuilder::new(config)
        .dictionary(Box::new(WordList::from_words(words)))
        .queue(LetterQueueGenerator::scripted(letters, &["CHAT"], 3))
        .events(Box::new(events.clone()))
        .clock(Box::new(clock.clone()));
    if let Some(grid) = grid {
        builder = builder.grid(grid);
    }
    let mut game = builder.build().unwrap();
    game.start();
    (game, events, clock)
}

fn count_word_events(events: &EventLog) -> usize {
    events
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::WordCompleted { .. }))
        .count()
}

#[test]
fn test_cat_on_the_bottom_row() {
    let (mut game, events, _) = build(config(14, 10), None, "CAT", &["CAT"]);

    // C to column 3
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::HardDrop);
    // A to column 4
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::HardDrop);
    // T stays in column 5
    game.apply_action(GameAction::HardDrop);

    assert_eq!(events.completed_words(), vec![("CAT".to_string(), 30)]);
    for col in 3..=5 {
        assert!(game.grid().is_empty(Position::new(13, col)));
    }
    assert_eq!(game.grid().occupied_count(), 0);

    let stats = game.score_stats();
    assert_eq!(stats.words_completed, 1);
    assert_eq!(stats.letters_placed, 3);
    assert_eq!(stats.streak, 1);
}

#[test]
fn test_one_lock_completes_two_words() {
    let grid = GridStore::from_ascii(&[
        ".....", //
        ".....",
        "CA...",
        "XXOXX",
        "XXPXX",
    ]);
    let (mut game, events, _) = build(config(5, 5), Some(grid), "T", &["CAT", "TOP"]);

    game.apply_action(GameAction::HardDrop);

    let words = events.completed_words();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].0, "CAT");
    assert_eq!(words[1].0, "TOP");
    assert!(words[1].1 > words[0].1);

    let last = game.last_words();
    assert!(last[1].breakdown.combo > last[0].breakdown.combo);
    assert_eq!(game.score_stats().max_combo, 2);

    // C A T and T O P share the T
    for pos in [(2, 0), (2, 1), (2, 2), (3, 2), (4, 2)] {
        assert!(game.grid().is_empty(Position::new(pos.0, pos.1)));
    }
    let cleared = events.events().into_iter().find_map(|e| match e {
        GameEvent::LettersCleared { cells } => Some(cells),
        _ => None,
    });
    assert_eq!(cleared.map(|c| c.len()), Some(5));
}

#[test]
fn test_grid_full_on_next_lock() {
    // 16 of 20 cells; the next letter lands in (1, 2) and makes 17
    let grid = GridStore::from_ascii(&[
        "X...X", //
        "XX.XX",
        "XXXXX",
        "XXXXX",
    ]);
    let (mut game, events, _) = build(config(4, 5), Some(grid), "A", &[]);
    assert!(!game.is_over());

    game.apply_action(GameAction::HardDrop);

    assert_eq!(game.game_over_reason(), Some(GameOverReason::GridFull));
    let over = events.events().into_iter().find_map(|e| match e {
        GameEvent::GameOver { reason, stats } => Some((reason, stats)),
        _ => None,
    });
    let (reason, stats) = over.unwrap();
    assert_eq!(reason, GameOverReason::GridFull);
    assert_eq!(stats.letters_placed, 1);
    assert_eq!(stats.level_reached, 1);
}

#[test]
fn test_boxed_in_spawn_still_takes_a_letter() {
    let grid = GridStore::from_ascii(&[
        ".C...", //
        "..ZZ.",
        ".....",
        ".....",
        ".....",
    ]);
    let (mut game, events, _) = build(config(5, 5), Some(grid), "TA", &["CAT"]);

    // T locks at (0, 3) and walls in the empty spawn cell (0, 2)
    game.apply_action(GameAction::MoveRight);
    game.apply_action(GameAction::HardDrop);
    assert!(!game.is_over());
    assert!(game.grid().is_empty(Position::new(0, 2)));

    // A locks in the spawn cell and spells CAT
    game.apply_action(GameAction::HardDrop);
    assert_eq!(events.completed_words(), vec![("CAT".to_string(), 30)]);
    for col in 1..=3 {
        assert!(game.grid().is_empty(Position::new(0, col)));
    }
    assert!(!game.is_over());
}

fn spell_cat_on_the_bottom_row(game: &mut GameSession) {
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::HardDrop);
    game.apply_action(GameAction::MoveLeft);
    game.apply_action(GameAction::HardDrop);
    game.apply_action(GameAction::HardDrop);
}

#[test]
fn test_victory_when_every_target_is_found() {
    let cfg = SessionConfig {
        target_words: vec!["CAT".to_string()],
        victory_on_all_targets: true,
        ..config(14, 10)
    };
    let (mut game, events, _) = build(cfg, None, "CATX", &[]);
    spell_cat_on_the_bottom_row(&mut game);

    assert_eq!(game.target_progress(), (1, 1));
    assert_eq!(game.game_over_reason(), Some(GameOverReason::AllTargetsFound));
    assert!(game.falling_letter().is_none());
    let over = events.events().into_iter().find_map(|e| match e {
        GameEvent::GameOver { reason, stats } => Some((reason, stats)),
        _ => None,
    });
    let (reason, stats) = over.unwrap();
    assert_eq!(reason, GameOverReason::AllTargetsFound);
    assert_eq!(stats.words_completed, 1);
    assert_eq!(stats.letters_placed, 3);
}

#[test]
fn test_all_targets_found_keeps_playing_by_default() {
    let cfg = SessionConfig {
        target_words: vec!["CAT".to_string()],
        ..config(14, 10)
    };
    let (mut game, _, _) = build(cfg, None, "CATX", &[]);
    spell_cat_on_the_bottom_row(&mut game);

    assert_eq!(game.target_progress(), (1, 1));
    assert!(!game.is_over());
    assert_eq!(game.falling_letter().map(|l| l.character), Some('X'));
}

#[test]
fn test_game_over_is_idempotent() {
    let grid = GridStore::from_ascii(&[
        "X...X", //
        "XX.XX",
        "XXXXX",
        "XXXXX",
    ]);
    let (mut game, events, clock) = build(config(4, 5), Some(grid), "AB", &[]);
    game.apply_action(GameAction::HardDrop);
    assert!(game.is_over());

    let stats = game.final_stats();
    let grid_before = game.grid().to_ascii();
    let events_before = events.events().len();

    clock.advance(60_000);
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::Pause,
    ] {
        assert!(!game.apply_action(action));
    }
    assert!(!game.update(10_000));
    assert!(!game.move_letter(MoveDirection::Down));

    assert_eq!(game.final_stats(), stats);
    assert_eq!(game.grid().to_ascii(), grid_before);
    assert_eq!(events.events().len(), events_before);
}

#[test]
fn test_single_falling_letter() {
    let (mut game, events, _) = build(config(14, 10), None, "", &[]);
    for _ in 0..200 {
        if game.is_over() {
            break;
        }
        assert!(game.falling_letter().is_some());
        game.update(1_000);
    }
    let locks = events
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::LetterLocked { .. }))
        .count();
    assert_eq!(locks as u32, game.score_stats().letters_placed);
    assert_eq!(count_word_events(&events), 0);
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let cfg = SessionConfig {
            seed: 99,
            time_limit_ms: None,
            ..SessionConfig::default()
        };
        let mut game = GameSession::builder(cfg)
            .clock(Box::new(ManualClock::new()))
            .build()
            .unwrap();
        game.start();
        let actions = [
            GameAction::MoveLeft,
            GameAction::HardDrop,
            GameAction::MoveRight,
            GameAction::MoveRight,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::HardDrop,
        ];
        for i in 0..60 {
            game.apply_action(actions[i % actions.len()]);
            game.update(400);
        }
        (game.grid().to_ascii(), game.score_stats(), game.next_letters())
    };

    assert_eq!(play(), play());
}

#[test]
fn test_pause_stops_gravity_and_clock() {
    let cfg = SessionConfig {
        time_limit_ms: Some(5_000),
        ..config(14, 10)
    };
    let (mut game, _, clock) = build(cfg, None, "A", &[]);

    assert!(game.pause());
    for _ in 0..10 {
        clock.advance(1_000);
        assert!(!game.update(1_000));
    }
    assert_eq!(game.falling_letter().map(|l| l.row), Some(0));
    assert!(!game.is_over());

    assert!(game.resume());
    assert!(game.update(1_000));
    assert_eq!(game.falling_letter().map(|l| l.row), Some(1));
}

#[test]
fn test_time_limit_checked_after_lock() {
    let cfg = SessionConfig {
        time_limit_ms: Some(3_000),
        ..config(14, 10)
    };
    let (mut game, _, clock) = build(cfg, None, "AB", &[]);
    clock.advance(3_000);
    game.apply_action(GameAction::HardDrop);
    assert_eq!(game.game_over_reason(), Some(GameOverReason::TimeLimit));
    assert_eq!(game.final_stats().map(|s| s.letters_placed), Some(1));
}

#[test]
fn test_level_up_after_five_words() {
    // Each T lands on the next A B pair in the column and spells TAB
    let mut lines = vec!["..."; 4];
    for _ in 0..5 {
        lines.push(".A.");
        lines.push(".B.");
    }
    let grid = GridStore::from_ascii(&lines);
    let (mut game, events, _) = build(config(14, 3), Some(grid), "TTTTT", &["TAB"]);

    for i in 0..5 {
        assert_eq!(game.level(), 1, "level before word {}", i + 1);
        assert!(game.apply_action(GameAction::HardDrop));
    }

    assert_eq!(game.score_stats().words_completed, 5);
    assert_eq!(game.score_stats().streak, 5);
    assert_eq!(game.level(), 2);
    assert_eq!(game.fall_interval_ms(), 900);
    assert_eq!(game.grid().occupied_count(), 0);

    let changes: Vec<_> = events
        .events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::LevelUp { old_level, new_level } => Some((old_level, new_level)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![(1, 2)]);
}

#[test]
fn test_high_score_survives_sessions() {
    let path = std::env::temp_dir().join(format!(
        "letter-cascade-scenario-{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let play = |letters: &str| {
        let mut game = SessionBuilder::new(config(14, 10))
            .dictionary(Box::new(WordList::from_words(&["CAT"])))
            .queue(LetterQueueGenerator::scripted(letters, &["CHAT"], 3))
            .clock(Box::new(ManualClock::new()))
            .high_score_store(Box::new(JsonFileHighScoreStore::new(&path)))
            .build()
            .unwrap();
        game.start();
        game.apply_action(GameAction::MoveLeft);
        game.apply_action(GameAction::MoveLeft);
        game.apply_action(GameAction::HardDrop);
        game.apply_action(GameAction::MoveLeft);
        game.apply_action(GameAction::HardDrop);
        game.apply_action(GameAction::HardDrop);
        game.score_stats()
    };

    let first = play("CAT");
    assert_eq!(first.score, 30);
    assert_eq!(first.high_score, 30);

    // No word this time; the stored best carries over
    let second = play("DOG");
    assert_eq!(second.score, 0);
    assert_eq!(second.high_score, 30);

    let _ = std::fs::remove_file(&path);
}
