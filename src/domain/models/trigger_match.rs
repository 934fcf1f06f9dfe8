use serde::Serialize;

use super::ConnectorId;

/// An active `@<connector>_` trigger found before the caret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerMatch {
    connector: ConnectorId,
    query: String,
    start: usize,
}

impl TriggerMatch {
    pub fn new(connector: ConnectorId, query: impl Into<String>, start: usize) -> Self {
        Self {
            connector,
            query: query.into(),
            start,
        }
    }

    pub fn connector(&self) -> ConnectorId {
        self.connector
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Byte offset of the `@` in the source text.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Same trigger occurrence, possibly with a different query.
    pub fn same_session(&self, other: &TriggerMatch) -> bool {
        self.connector == other.connector && self.start == other.start
    }
}
