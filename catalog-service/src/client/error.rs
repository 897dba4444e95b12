//! Client error types

use thiserror::Error;

/// Failure of a catalog API call
///
/// Every variant is fatal to the aggregation that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS or protocol failure
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The response body could not be turned into the expected records
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The configured base URL is not an absolute http(s) URL
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        if err.is_timeout() {
            Self::Timeout { url }
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                url,
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        let err = ClientError::Status {
            status: 404,
            url: "http://127.0.0.1:8000/api/products/9".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "http://127.0.0.1:8000/api/products/9 returned HTTP 404"
        );

        let err = ClientError::Decode("expected array".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(ClientError::from(err), ClientError::Decode(_)));
    }
}
