use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::application::{ConnectorAdapter, SearchOptions};
use crate::domain::{ConnectorId, CreateResult, DomainError, SearchItem};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Search responses come either as a bare array or wrapped in `{ "items": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Items(Vec<SearchItem>),
    Wrapped { items: Vec<SearchItem> },
}

impl SearchResponse {
    fn into_items(self) -> Vec<SearchItem> {
        match self {
            SearchResponse::Items(items) | SearchResponse::Wrapped { items } => items,
        }
    }
}

/// Connector backed by the connectors HTTP backend.
///
/// ```text
/// GET  {base}/connectors/{id}/search?q=<query>&limit=<n>[&filters=<json>]
/// POST {base}/connectors/{id}/create
/// ```
///
/// The request is raced against the search options' cancellation token, so a
/// superseded search releases its connection as soon as it is cancelled.
pub struct HttpConnector {
    id: ConnectorId,
    client: reqwest::Client,
    base_url: String,
}

impl HttpConnector {
    pub fn new(id: ConnectorId, base_url: impl Into<String>) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            id,
            client,
            base_url: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn jira(base_url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(ConnectorId::Jira, base_url)
    }

    pub fn confluence(base_url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(ConnectorId::Confluence, base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/connectors/{}/{}", self.base_url, self.id, action)
    }

    async fn send_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchItem>, DomainError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("limit", options.limit().to_string()),
        ];
        if let Some(filters) = options.filters() {
            params.push(("filters", serde_json::to_string(filters)?));
        }

        let response = self
            .client
            .get(self.endpoint("search"))
            .query(&params)
            .send()
            .await
            .map_err(|e| DomainError::search(format!("{} search failed: {}", self.id.display_name(), e)))?;

        if !response.status().is_success() {
            return Err(self.error_from(response, "search").await);
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            DomainError::serialization(format!(
                "{} returned an unexpected search response: {}",
                self.id.display_name(),
                e
            ))
        })?;

        let mut items = body.into_items();
        items.truncate(options.limit());
        Ok(items)
    }

    async fn error_from(&self, response: reqwest::Response, action: &str) -> DomainError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("{} {} returned {}: {}", self.id.display_name(), action, status, body);

        let detail = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        });

        match detail {
            Some(detail) => DomainError::search(format!(
                "{} {} failed ({}): {}",
                self.id.display_name(),
                action,
                status,
                detail
            )),
            None => DomainError::search(format!(
                "{} {} failed ({})",
                self.id.display_name(),
                action,
                status
            )),
        }
    }
}

#[async_trait]
impl ConnectorAdapter for HttpConnector {
    fn id(&self) -> ConnectorId {
        self.id
    }

    async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchItem>, DomainError> {
        debug!("GET {} q={:?}", self.endpoint("search"), query);

        match options.cancellation() {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(DomainError::Cancelled),
                    result = self.send_search(query, &options) => result,
                }
            }
            None => self.send_search(query, &options).await,
        }
    }

    async fn quick_create(&self, payload: Map<String, Value>) -> Result<CreateResult, DomainError> {
        debug!("POST {}", self.endpoint("create"));

        let response = self
            .client
            .post(self.endpoint("create"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::search(format!("{} create failed: {}", self.id.display_name(), e)))?;

        if !response.status().is_success() {
            return Err(self.error_from(response, "create").await);
        }

        response.json().await.map_err(|e| {
            DomainError::serialization(format!(
                "{} returned an unexpected create response: {}",
                self.id.display_name(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let connector = HttpConnector::confluence("http://backend.test:3001/").unwrap();

        assert_eq!(connector.base_url(), "http://backend.test:3001");
        assert_eq!(
            connector.endpoint("search"),
            "http://backend.test:3001/connectors/confluence/search"
        );
    }

    #[test]
    fn test_search_response_accepts_both_shapes() {
        let bare = r#"[{"id":"A-1","title":"Alpha","url":"u","type":"issue"}]"#;
        let wrapped = r#"{"items":[{"id":"A-1","title":"Alpha","url":"u","type":"issue"}]}"#;

        for body in [bare, wrapped] {
            let items = serde_json::from_str::<SearchResponse>(body)
                .unwrap()
                .into_items();
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].id(), "A-1");
        }
    }
}
