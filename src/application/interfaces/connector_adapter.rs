use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::domain::{ConnectorId, CreateResult, DomainError, SearchItem};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Options passed to [`ConnectorAdapter::search`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    limit: usize,
    filters: Option<Map<String, Value>>,
    cancellation: Option<CancellationToken>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_LIMIT)
    }
}

impl SearchOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            filters: None,
            cancellation: None,
        }
    }

    pub fn with_filters(mut self, filters: Map<String, Value>) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn filters(&self) -> Option<&Map<String, Value>> {
        self.filters.as_ref()
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// A searchable external data source reachable through an `@<prefix>` trigger.
///
/// Implementations should honour the cancellation token in
/// [`SearchOptions`] and return [`DomainError::Cancelled`] once it fires.
#[async_trait]
pub trait ConnectorAdapter: Send + Sync {
    fn id(&self) -> ConnectorId;

    /// Trigger typed in chat text, e.g. `@jira_`.
    fn prefix(&self) -> &str {
        self.id().default_prefix()
    }

    fn display_name(&self) -> &str {
        self.id().display_name()
    }

    async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchItem>, DomainError>;

    /// Create a resource on the connector. Not every connector supports it.
    async fn quick_create(&self, _payload: Map<String, Value>) -> Result<CreateResult, DomainError> {
        Err(DomainError::unsupported(format!(
            "{} does not support quick create",
            self.display_name()
        )))
    }
}
