//! Terminal input.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Terminals
//! repeat held keys on their own, so presses map one-to-one to actions.

pub mod map;

pub use letter_cascade_types as types;

pub use map::{handle_key_event, should_quit};
