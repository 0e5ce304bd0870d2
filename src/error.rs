use thiserror::Error;

/// Main error type for the price engine
#[derive(Error, Debug)]
pub enum PriceEngineError {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Lookup provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Query correction oracle errors
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Identity resolution failed; wraps the provider or oracle error
    #[error("Could not resolve game for query '{query}': {source}")]
    Resolution {
        query: String,
        #[source]
        source: Box<PriceEngineError>,
    },

    /// Query rejected before any lookup
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Caller cancelled or deadline elapsed
    #[error("Lookup cancelled")]
    Cancelled,

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl PriceEngineError {
    pub(crate) fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PriceEngineError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub(crate) fn resolution(query: impl Into<String>, source: PriceEngineError) -> Self {
        PriceEngineError::Resolution {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// True when the error came from a caller cancellation, wrapped or not
    pub fn is_cancelled(&self) -> bool {
        match self {
            PriceEngineError::Cancelled => true,
            PriceEngineError::Resolution { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

impl From<String> for PriceEngineError {
    fn from(s: String) -> Self {
        PriceEngineError::Other(s)
    }
}

impl From<&str> for PriceEngineError {
    fn from(s: &str) -> Self {
        PriceEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PriceEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_wraps_source() {
        let err = PriceEngineError::resolution(
            "haf life",
            PriceEngineError::Oracle("upstream returned 503".into()),
        );
        let text = err.to_string();
        assert!(text.contains("haf life"));
        assert!(text.contains("503"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_cancelled() {
        assert!(PriceEngineError::Cancelled.is_cancelled());
        assert!(PriceEngineError::resolution("q", PriceEngineError::Cancelled).is_cancelled());
        assert!(!PriceEngineError::from("boom").is_cancelled());
    }
}
