//! Letter Cascade (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and adds the file-backed
//! high-score store used by the terminal binary.

pub mod store;

pub use letter_cascade_core as core;
pub use letter_cascade_input as input;
pub use letter_cascade_term as term;
pub use letter_cascade_types as types;

pub use store::JsonFileHighScoreStore;
