use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConnectorId, SearchItem, TokenField};

/// Connector-tagged reference emitted once per committed selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReference {
    connector: ConnectorId,
    #[serde(rename = "type")]
    item_type: String,
    id: String,
    title: String,
    url: String,
    meta: Map<String, Value>,
}

impl StructuredReference {
    pub fn from_item(connector: ConnectorId, item: &SearchItem) -> Self {
        Self {
            connector,
            item_type: item.item_type().to_string(),
            id: item.id().to_string(),
            title: item.title().to_string(),
            url: item.url().to_string(),
            meta: item.metadata().clone(),
        }
    }

    pub fn connector(&self) -> ConnectorId {
        self.connector
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Bracketed literal inserted into the message text, e.g. `[@jira ABC-123]`.
    pub fn token(&self) -> String {
        let value = match self.connector.token_field() {
            TokenField::Id => self.id.as_str(),
            TokenField::Title if self.title.trim().is_empty() => self.id.as_str(),
            TokenField::Title => self.title.as_str(),
        };
        format!("[@{} {}]", self.connector.as_str(), value)
    }

    /// Chip label: the title, or the id when the title is blank.
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// A committed selection: the normalized reference plus the raw item for
/// callers that need provider-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub reference: StructuredReference,
    pub item: SearchItem,
}

impl Selection {
    pub fn new(connector: ConnectorId, item: SearchItem) -> Self {
        Self {
            reference: StructuredReference::from_item(connector, &item),
            item,
        }
    }
}
