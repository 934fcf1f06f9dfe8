use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{ConnectorAdapter, SearchOptions};
use crate::domain::{ConnectorId, CreateResult, DomainError, SearchItem};

/// In-memory connector serving a fixed item list.
///
/// Filters items by a case-insensitive substring match on id, title and
/// snippet. Can be configured to fail or to respond slowly, and records every
/// query it receives.
pub struct MockConnector {
    id: ConnectorId,
    items: Vec<SearchItem>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    /// A connector pre-filled with sample items for `id`.
    pub fn new(id: ConnectorId) -> Self {
        Self::with_items(id, sample_items(id))
    }

    pub fn with_items(id: ConnectorId, items: Vec<SearchItem>) -> Self {
        Self {
            id,
            items,
            failure: None,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every search fails with `message`.
    pub fn failing(id: ConnectorId, message: impl Into<String>) -> Self {
        let mut connector = Self::with_items(id, Vec::new());
        connector.failure = Some(message.into());
        connector
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queries received so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl ConnectorAdapter for MockConnector {
    fn id(&self) -> ConnectorId {
        self.id
    }

    async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchItem>, DomainError> {
        self.calls.lock().await.push(query.to_string());
        debug!("{} mock search for '{}'", self.id, query);

        if let Some(delay) = self.delay {
            match options.cancellation() {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(DomainError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }

        if let Some(ref message) = self.failure {
            return Err(DomainError::search(message.clone()));
        }

        Ok(self
            .items
            .iter()
            .filter(|item| item.matches(query))
            .take(options.limit())
            .cloned()
            .collect())
    }

    async fn quick_create(&self, payload: Map<String, Value>) -> Result<CreateResult, DomainError> {
        let title = payload
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::invalid_input("payload needs a 'title' string"))?;

        let id = match self.id {
            ConnectorId::Jira => format!("MOCK-{}", self.items.len() + 1),
            ConnectorId::Confluence => format!("{}", 100_000 + self.items.len() + 1),
        };
        let url = format!("https://{}.example.test/{}", self.id, id);

        Ok(CreateResult::new(id).with_url(url).with_title(title))
    }
}

fn sample_items(id: ConnectorId) -> Vec<SearchItem> {
    match id {
        ConnectorId::Jira => [
            ("TEST-1", "Issue TEST-1", "bug", "Login button unresponsive on Safari"),
            ("TEST-2", "Issue TEST-2", "task", "Rotate staging OAuth client secret"),
            ("OPS-14", "Nightly export times out", "bug", "Export job exceeds 30 min window"),
            ("OPS-21", "Add connector health check", "story", "Expose /health for each connector"),
            ("WEB-7", "Chat input mentions", "epic", "Typeahead for @jira_ and @confluence_"),
        ]
        .into_iter()
        .map(|(key, title, kind, snippet)| {
            SearchItem::new(
                key,
                title,
                format!("https://jira.example.test/browse/{}", key),
                kind,
            )
            .with_snippet(snippet)
            .with_metadata("key", key)
        })
        .collect(),
        ConnectorId::Confluence => [
            ("65537", "Team Handbook", "Onboarding, rituals and contacts"),
            ("65601", "Project Phoenix Roadmap", "Quarterly milestones for Phoenix"),
            ("65822", "Incident Runbook", "Steps for paging and escalation"),
            ("66010", "OAuth Setup Guide", "Registering Atlassian OAuth apps"),
        ]
        .into_iter()
        .map(|(page_id, title, snippet)| {
            SearchItem::new(
                page_id,
                title,
                format!("https://confluence.example.test/pages/{}", page_id),
                "page",
            )
            .with_snippet(snippet)
            .with_metadata("space", "ENG")
        })
        .collect(),
    }
}
