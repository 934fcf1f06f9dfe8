use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::{
    ChatInput, ConnectorAdapter, ConnectorRegistry, SearchConnectorUseCase, DEFAULT_DEBOUNCE,
    DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_TIMEOUT,
};
use crate::connector::adapter::{HttpConnector, MockConnector, DEFAULT_BACKEND_URL};
use crate::domain::ConnectorId;

pub const BACKEND_URL_ENV: &str = "CONNECTORS_BACKEND_URL";
pub const DEBOUNCE_MS_ENV: &str = "CONNECTORS_DEBOUNCE_MS";
pub const SEARCH_TIMEOUT_MS_ENV: &str = "CONNECTORS_SEARCH_TIMEOUT_MS";

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub backend_url: String,
    /// Serve searches from in-memory sample data instead of the backend.
    pub mock_connectors: bool,
    pub debounce: Duration,
    /// `None` disables the per-search timeout.
    pub search_timeout: Option<Duration>,
    pub limit: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            mock_connectors: false,
            debounce: DEFAULT_DEBOUNCE,
            search_timeout: Some(DEFAULT_SEARCH_TIMEOUT),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl ContainerConfig {
    /// Defaults overridden by environment variables:
    ///
    /// | Variable                       | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `CONNECTORS_BACKEND_URL`       | `http://localhost:3001` |
    /// | `CONNECTORS_DEBOUNCE_MS`       | `250`                   |
    /// | `CONNECTORS_SEARCH_TIMEOUT_MS` | `10000` (`0` disables)  |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend_url = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.backend_url);

        let debounce = env_parse::<u64>(DEBOUNCE_MS_ENV)
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);

        let search_timeout = match env_parse::<u64>(SEARCH_TIMEOUT_MS_ENV) {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.search_timeout,
        };

        Self {
            backend_url,
            debounce,
            search_timeout,
            ..defaults
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

pub struct Container {
    registry: Arc<ConnectorRegistry>,
    search_use_case: Arc<SearchConnectorUseCase>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let adapters: Vec<Arc<dyn ConnectorAdapter>> = if config.mock_connectors {
            debug!("Using mock connectors");
            ConnectorId::ALL
                .iter()
                .map(|&id| Arc::new(MockConnector::new(id)) as Arc<dyn ConnectorAdapter>)
                .collect()
        } else {
            debug!("Using connector backend at {}", config.backend_url);
            ConnectorId::ALL
                .iter()
                .map(|&id| {
                    HttpConnector::new(id, config.backend_url.as_str())
                        .map(|adapter| Arc::new(adapter) as Arc<dyn ConnectorAdapter>)
                })
                .collect::<Result<_, _>>()?
        };

        Self::with_adapters(config, adapters)
    }

    /// Build the container around an explicit set of adapters.
    pub fn with_adapters(
        config: ContainerConfig,
        adapters: Vec<Arc<dyn ConnectorAdapter>>,
    ) -> Result<Self> {
        let registry = adapters
            .into_iter()
            .fold(ConnectorRegistry::builder(), |builder, adapter| {
                builder.register(adapter)
            })
            .build()?;
        let registry = Arc::new(registry);

        let search_use_case = Arc::new(
            SearchConnectorUseCase::new(Arc::clone(&registry))
                .with_timeout(config.search_timeout)
                .with_default_limit(config.limit),
        );

        Ok(Self {
            registry,
            search_use_case,
            config,
        })
    }

    pub fn registry(&self) -> &Arc<ConnectorRegistry> {
        &self.registry
    }

    pub fn search_use_case(&self) -> Arc<SearchConnectorUseCase> {
        Arc::clone(&self.search_use_case)
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// A fresh chat input wired to this container's connectors.
    pub fn chat_input(&self) -> ChatInput {
        ChatInput::new(self.search_use_case()).with_debounce(self.config.debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_container_registers_all_connectors() {
        let container = Container::new(ContainerConfig {
            mock_connectors: true,
            ..ContainerConfig::default()
        })
        .unwrap();

        assert_eq!(container.registry().len(), 2);
        assert!(container.registry().by_prefix("@confluence_").is_some());
    }

    #[test]
    fn test_limit_and_timeout_flow_into_use_case() {
        let container = Container::new(ContainerConfig {
            limit: 3,
            search_timeout: None,
            ..ContainerConfig::default()
        })
        .unwrap();

        assert_eq!(container.search_use_case().default_limit(), 3);
        assert_eq!(container.search_use_case().timeout(), None);
    }

    #[test]
    fn test_http_container_builds_client_per_connector() {
        let container = Container::new(ContainerConfig {
            backend_url: "http://backend.test:3001/".to_string(),
            ..ContainerConfig::default()
        })
        .unwrap();

        assert_eq!(container.registry().len(), 2);
        assert!(container.registry().get(ConnectorId::Jira).is_some());
    }

    #[test]
    fn test_duplicate_adapters_are_rejected() {
        let adapters: Vec<Arc<dyn ConnectorAdapter>> = vec![
            Arc::new(MockConnector::new(ConnectorId::Jira)),
            Arc::new(MockConnector::new(ConnectorId::Jira)),
        ];

        assert!(Container::with_adapters(ContainerConfig::default(), adapters).is_err());
    }
}
