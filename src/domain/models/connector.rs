use serde::{Deserialize, Serialize};

/// Which field of a selected item ends up inside the inserted text token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Id,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorId {
    Jira,
    Confluence,
}

impl ConnectorId {
    pub const ALL: [ConnectorId; 2] = [ConnectorId::Jira, ConnectorId::Confluence];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorId::Jira => "jira",
            ConnectorId::Confluence => "confluence",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jira" => Some(ConnectorId::Jira),
            "confluence" => Some(ConnectorId::Confluence),
            _ => None,
        }
    }

    /// Trigger typed in free text to open the selector for this connector.
    pub fn default_prefix(&self) -> &'static str {
        match self {
            ConnectorId::Jira => "@jira_",
            ConnectorId::Confluence => "@confluence_",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConnectorId::Jira => "Jira",
            ConnectorId::Confluence => "Confluence",
        }
    }

    pub fn provider_initial(&self) -> char {
        match self {
            ConnectorId::Jira => 'J',
            ConnectorId::Confluence => 'C',
        }
    }

    /// Jira tokens carry the issue key, Confluence tokens the page title.
    pub fn token_field(&self) -> TokenField {
        match self {
            ConnectorId::Jira => TokenField::Id,
            ConnectorId::Confluence => TokenField::Title,
        }
    }
}

impl std::fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConnectorId {
    type Err = crate::domain::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::domain::DomainError::invalid_input(format!("unknown connector '{}'", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_id_parse() {
        assert_eq!(ConnectorId::parse("jira"), Some(ConnectorId::Jira));
        assert_eq!(ConnectorId::parse(" Confluence "), Some(ConnectorId::Confluence));
        assert_eq!(ConnectorId::parse("github"), None);
        assert!("slack".parse::<ConnectorId>().is_err());
    }

    #[test]
    fn test_connector_id_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectorId::Confluence).unwrap();
        assert_eq!(json, "\"confluence\"");
    }

    #[test]
    fn test_default_prefixes() {
        assert_eq!(ConnectorId::Jira.default_prefix(), "@jira_");
        assert_eq!(ConnectorId::Confluence.default_prefix(), "@confluence_");
    }
}
