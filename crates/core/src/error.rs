//! Error types.

use thiserror::Error;

/// Invalid session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Grid has zero rows or columns.
    #[error("grid dimensions must be non-zero (got {rows}x{cols})")]
    EmptyGrid { rows: u16, cols: u16 },
    /// Grid dimension beyond what a signed 16-bit position can address.
    #[error("grid dimensions must be at most 32767 (got {rows}x{cols})")]
    GridTooLarge { rows: u16, cols: u16 },
    /// Grid too narrow to fit the shortest word in any direction.
    #[error("grid {rows}x{cols} cannot hold a word of {min_word_len} letters")]
    GridTooSmall {
        rows: u16,
        cols: u16,
        min_word_len: usize,
    },
    /// Fill ratio outside (0, 1].
    #[error("grid_full_ratio must be in (0, 1], got {0}")]
    InvalidFullRatio(f64),
    /// Shortest word length below 1.
    #[error("min_word_len must be at least 1")]
    InvalidMinWordLen,
    /// Time limit of zero; `null` disables the limit.
    #[error("time_limit_ms must be positive, use null to disable the limit")]
    ZeroTimeLimit,
    /// Queue batch size of zero.
    #[error("queue_batch_size must be at least 1")]
    InvalidBatchSize,
    /// Multiplier factor or duration not usable.
    #[error("invalid multiplier: factor {factor}, duration {duration_ms}ms")]
    InvalidMultiplier { factor: f64, duration_ms: u64 },
    /// Starting grid does not match the configured dimensions.
    #[error("starting grid is {actual_rows}x{actual_cols}, config expects {rows}x{cols}")]
    GridMismatch {
        rows: u16,
        cols: u16,
        actual_rows: u16,
        actual_cols: u16,
    },
    /// Unknown value in an environment override.
    #[error("invalid value for {key}: {value:?}")]
    InvalidOverride { key: &'static str, value: String },
    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// High-score persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed high score data: {0}")]
    Malformed(String),
    #[error("high score storage unavailable")]
    Unavailable,
}
