use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ConnectorAdapter;
use crate::domain::{parse_trigger_at_caret, ConnectorId, DomainError, TriggerMatch};

/// Immutable set of connectors available to a chat input.
///
/// Built once with [`ConnectorRegistry::builder`] and shared behind an `Arc`;
/// there is no process-wide registry.
pub struct ConnectorRegistry {
    adapters: Vec<Arc<dyn ConnectorAdapter>>,
    by_id: HashMap<ConnectorId, usize>,
    by_prefix: HashMap<String, usize>,
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| (a.id(), a.prefix().to_string())))
            .finish()
    }
}

impl ConnectorRegistry {
    pub fn builder() -> ConnectorRegistryBuilder {
        ConnectorRegistryBuilder::default()
    }

    pub fn get(&self, id: ConnectorId) -> Option<Arc<dyn ConnectorAdapter>> {
        self.by_id.get(&id).map(|&i| Arc::clone(&self.adapters[i]))
    }

    pub fn by_prefix(&self, prefix: &str) -> Option<Arc<dyn ConnectorAdapter>> {
        self.by_prefix
            .get(prefix)
            .map(|&i| Arc::clone(&self.adapters[i]))
    }

    /// Adapters in registration order.
    pub fn adapters(&self) -> &[Arc<dyn ConnectorAdapter>] {
        &self.adapters
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn parse_trigger_at_caret(&self, text: &str, caret: usize) -> Option<TriggerMatch> {
        parse_trigger_at_caret(
            self.adapters.iter().map(|a| (a.id(), a.prefix())),
            text,
            caret,
        )
    }
}

#[derive(Default)]
pub struct ConnectorRegistryBuilder {
    adapters: Vec<Arc<dyn ConnectorAdapter>>,
}

impl ConnectorRegistryBuilder {
    pub fn register(mut self, adapter: Arc<dyn ConnectorAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn build(self) -> Result<ConnectorRegistry, DomainError> {
        let mut by_id = HashMap::new();
        let mut by_prefix = HashMap::new();

        for (i, adapter) in self.adapters.iter().enumerate() {
            if adapter.prefix().is_empty() {
                return Err(DomainError::invalid_input(format!(
                    "connector '{}' has an empty prefix",
                    adapter.id()
                )));
            }
            if by_id.insert(adapter.id(), i).is_some() {
                return Err(DomainError::invalid_input(format!(
                    "connector '{}' registered twice",
                    adapter.id()
                )));
            }
            if by_prefix.insert(adapter.prefix().to_string(), i).is_some() {
                return Err(DomainError::invalid_input(format!(
                    "prefix '{}' registered twice",
                    adapter.prefix()
                )));
            }
        }

        Ok(ConnectorRegistry {
            adapters: self.adapters,
            by_id,
            by_prefix,
        })
    }
}
