//! Pure domain services: no I/O, no async, safe to call on every keystroke.

mod overlay_placement;
mod token_composer;
mod trigger_matcher;

pub use overlay_placement::*;
pub use token_composer::*;
pub use trigger_matcher::*;
