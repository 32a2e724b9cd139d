//! Terminal rendering for Letter Cascade.
//!
//! A small, game-oriented layer: [`GameView`] draws a session snapshot into a
//! [`FrameBuffer`], and [`TerminalRenderer`] flushes the cells that changed
//! since the last frame. No widget toolkit; each grid cell is two terminal
//! columns wide so the grid stays roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use letter_cascade_core as core;
pub use letter_cascade_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
