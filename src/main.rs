//! Letter Cascade terminal runner (default binary).
//!
//! Environment:
//!
//! - `LETTER_CASCADE_CONFIG`: path to a JSON session config
//! - `LETTER_CASCADE_*`: per-field overrides, see `SessionConfig`
//! - `LETTER_CASCADE_HIGHSCORE`: high-score file
//! - `LETTER_CASCADE_LOG`: log file; logging is off when unset (`RUST_LOG` filters)

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::info;
use tracing_subscriber::EnvFilter;

use letter_cascade::core::{GameSession, MonotonicClock, SessionConfig, WordList};
use letter_cascade::input::{handle_key_event, should_quit};
use letter_cascade::term::{FrameBuffer, GameView, TerminalRenderer};
use letter_cascade::types::TICK_MS;
use letter_cascade::JsonFileHighScoreStore;

const BUILTIN_WORDS: &str = include_str!("words.txt");

fn main() -> Result<()> {
    init_logging()?;

    let config = load_config()?;
    let mut game = build_session(config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Some(stats) = game.final_stats() {
        info!(score = stats.score, words = stats.words_completed, "final stats");
    }
    result
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var("LETTER_CASCADE_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
    else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {path}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Defaults, then the JSON file, then environment overrides
fn load_config() -> Result<SessionConfig> {
    let mut config = match std::env::var("LETTER_CASCADE_CONFIG") {
        Ok(path) if !path.trim().is_empty() => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            SessionConfig::from_json_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        _ => SessionConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn build_session(config: SessionConfig) -> Result<GameSession> {
    let mut words = WordList::from_text(BUILTIN_WORDS);
    words.extend(&config.target_words);

    let store = JsonFileHighScoreStore::from_env();
    info!(path = %store.path().display(), words = words.len(), "building session");

    let game = GameSession::builder(config)
        .dictionary(Box::new(words))
        .clock(Box::new(MonotonicClock::new()))
        .high_score_store(Box::new(store))
        .build()?;
    Ok(game)
}

fn run(term: &mut TerminalRenderer, game: &mut GameSession) -> Result<()> {
    game.start();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let viewport = term.viewport()?;
        view.render_into(&game.snapshot(), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick {
            last_tick = Instant::now();
            game.update(elapsed.as_millis() as u32);
        }
    }
}
