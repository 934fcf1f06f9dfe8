use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    SearchError(String),

    #[error("Search timed out after {0} ms")]
    Timeout(u64),

    #[error("Search cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    pub fn timeout(millis: u64) -> Self {
        Self::Timeout(millis)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_matching_variants() {
        let err = DomainError::internal("Failed to build HTTP client");
        assert_eq!(err, DomainError::Internal("Failed to build HTTP client".into()));
        assert_eq!(err.to_string(), "Internal error: Failed to build HTTP client");

        assert!(DomainError::timeout(250).is_timeout());
        assert!(!DomainError::search("down").is_timeout());
        assert!(DomainError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_json_errors_become_serialization() {
        let err: DomainError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DomainError::Serialization(_)));
    }
}
