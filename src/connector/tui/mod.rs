//! Interactive terminal chat built on ratatui and crossterm.

mod app;
mod render;

pub use app::{run_chat, ChatApp};
pub use render::{FrameLayout, INPUT_HEIGHT, MAX_VISIBLE_OPTIONS, OVERLAY_WIDTH};
