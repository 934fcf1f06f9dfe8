//! # Domain Layer
//!
//! Connector-independent models and pure services for the mention typeahead:
//! trigger matching, token composition and overlay placement.
//! This layer knows nothing about HTTP, terminals or async runtimes.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
