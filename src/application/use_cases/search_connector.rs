use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::application::{ConnectorAdapter, SearchOptions, DEFAULT_SEARCH_LIMIT};
use crate::application::use_cases::ConnectorRegistry;
use crate::domain::{ConnectorId, DomainError, SearchItem};

/// Upper bound on a single connector search before it is reported as failed.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SearchConnectorUseCase {
    registry: Arc<ConnectorRegistry>,
    timeout: Option<Duration>,
    default_limit: usize,
}

impl SearchConnectorUseCase {
    pub fn new(registry: Arc<ConnectorRegistry>) -> Self {
        Self {
            registry,
            timeout: Some(DEFAULT_SEARCH_TIMEOUT),
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn registry(&self) -> &Arc<ConnectorRegistry> {
        &self.registry
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn execute(
        &self,
        connector: ConnectorId,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchItem>, DomainError> {
        let adapter = self
            .registry
            .get(connector)
            .ok_or_else(|| DomainError::not_found(format!("connector '{}' is not registered", connector)))?;

        self.run(adapter.as_ref(), query, options).await
    }

    pub async fn search(
        &self,
        connector: ConnectorId,
        query: &str,
    ) -> Result<Vec<SearchItem>, DomainError> {
        self.execute(connector, query, SearchOptions::new(self.default_limit))
            .await
    }

    /// Run one search under the configured timeout, racing the options'
    /// cancellation token.
    pub async fn run(
        &self,
        adapter: &dyn ConnectorAdapter,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchItem>, DomainError> {
        info!(
            "Searching {} for \"{}\" (limit={})",
            adapter.display_name(),
            query,
            options.limit()
        );
        let start_time = Instant::now();

        let token = options.cancellation().cloned();
        let search = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, adapter.search(query, options))
                    .await
                    .map_err(|_| DomainError::timeout(limit.as_millis() as u64))?,
                None => adapter.search(query, options).await,
            }
        };

        let result = match token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(DomainError::Cancelled),
                    result = search => result,
                }
            }
            None => search.await,
        };

        match &result {
            Ok(items) => info!(
                "Found {} {} results in {:.2}s",
                items.len(),
                adapter.display_name(),
                start_time.elapsed().as_secs_f64()
            ),
            Err(DomainError::Cancelled) => {}
            Err(e) if e.is_timeout() => warn!(
                "{} search for \"{}\" gave up: {}",
                adapter.display_name(),
                query,
                e
            ),
            Err(e) => warn!("{} search for \"{}\" failed: {}", adapter.display_name(), query, e),
        }

        result
    }
}
