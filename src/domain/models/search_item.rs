use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized search result returned by a connector backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    id: String,
    title: String,
    url: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snippet: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl SearchItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        item_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            item_type: item_type.into(),
            icon: None,
            snippet: None,
            metadata: Map::new(),
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
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

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Secondary line shown under the title: the snippet, or the url without one.
    pub fn subtitle(&self) -> &str {
        match self.snippet.as_deref() {
            Some(snippet) if !snippet.trim().is_empty() => snippet,
            _ => &self.url,
        }
    }

    /// Case-insensitive match against id, title and snippet.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.id.to_lowercase().contains(&needle)
            || self.title.to_lowercase().contains(&needle)
            || self
                .snippet
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}

/// Result of a connector quick-create call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResult {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl CreateResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
            title: None,
            metadata: Map::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_item_from_backend_json() {
        let json = r#"{
            "id": "TEST-1",
            "title": "Issue TEST-1",
            "url": "https://jira.example/browse/TEST-1",
            "type": "issue",
            "metadata": { "key": "TEST-1" }
        }"#;

        let item: SearchItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id(), "TEST-1");
        assert_eq!(item.item_type(), "issue");
        assert_eq!(item.snippet(), None);
        assert_eq!(item.metadata().get("key"), Some(&Value::from("TEST-1")));
    }

    #[test]
    fn test_metadata_defaults_to_empty() {
        let json = r#"{"id":"1","title":"t","url":"u","type":"page","snippet":null}"#;
        let item: SearchItem = serde_json::from_str(json).unwrap();
        assert!(item.metadata().is_empty());
    }

    #[test]
    fn test_subtitle_falls_back_to_url() {
        let item = SearchItem::new("1", "Title", "http://x/1", "page");
        assert_eq!(item.subtitle(), "http://x/1");

        let item = item.with_snippet("Quarterly roadmap");
        assert_eq!(item.subtitle(), "Quarterly roadmap");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let item = SearchItem::new("ABC-12", "Login page broken", "u", "issue");
        assert!(item.matches("abc"));
        assert!(item.matches("LOGIN"));
        assert!(item.matches(""));
        assert!(!item.matches("signup"));
    }
}
