//! Error types for the Star Wars API client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors raised while talking to a paginated JSON API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote answered with HTTP 429.
    #[error("rate limit exceeded for {url}")]
    RateLimited { url: String },

    /// Any other non-2xx response.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    RequestFailed {
        url: String,
        status: u16,
        message: String,
    },

    /// Connection, TLS or timeout failure before a status was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not a JSON object of the expected shape.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// `open()` was called on a session that is already open.
    #[error("session is already open")]
    SessionAlreadyOpen,

    /// A request or `close()` was issued without an open session.
    #[error("session is not open")]
    SessionNotOpen,
}

impl FetchError {
    /// True when the remote signalled throttling.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }

    /// True for scoped-resource discipline violations.
    ///
    /// These are programmer errors and should not be retried.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            FetchError::SessionAlreadyOpen | FetchError::SessionNotOpen
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RateLimited { .. } => Some(429),
            FetchError::RequestFailed { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let limited = FetchError::RateLimited {
            url: "https://swapi.dev/api/people/".into(),
        };
        assert!(limited.is_rate_limited());
        assert!(!limited.is_misuse());
        assert_eq!(limited.status(), Some(429));

        let failed = FetchError::RequestFailed {
            url: "https://swapi.dev/api/people/".into(),
            status: 500,
            message: "boom".into(),
        };
        assert!(!failed.is_rate_limited());
        assert_eq!(failed.status(), Some(500));

        assert!(FetchError::SessionNotOpen.is_misuse());
        assert!(FetchError::SessionAlreadyOpen.is_misuse());
        assert_eq!(FetchError::SessionNotOpen.status(), None);
    }

    #[test]
    fn test_display_includes_context() {
        let failed = FetchError::RequestFailed {
            url: "https://swapi.dev/api/planets/1/".into(),
            status: 404,
            message: "Not found".into(),
        };
        let text = failed.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("https://swapi.dev/api/planets/1/"));
    }
}
