//! # Application Layer
//!
//! Connector ports plus the use cases driving the mention typeahead:
//! registry lookups, timed searches, debouncing, the selector overlay and
//! the chat input host that ties them together.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
