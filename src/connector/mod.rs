//! # Connector Layer
//!
//! Adapters implementing the application ports:
//! - Connector backends (HTTP, plus an in-memory mock)
//! - Terminal caret measurement
//! - The CLI container, router and controllers
//! - The interactive terminal chat

pub mod adapter;
pub mod api;
pub mod tui;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
pub use tui::{run_chat, ChatApp};
