//! Error types for quakemap.
//!
//! Uses `thiserror` for library-style error definitions. Fetch failures
//! and malformed payloads are reported as distinct variants.

use thiserror::Error;

/// Errors that can occur while fetching a feed or building a map.
#[derive(Error, Debug)]
pub enum QuakemapError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading a local feed file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API returned an error status
    #[error("USGS API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid response structure
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Event validation failed
    #[error("Invalid event data: {0}")]
    Validation(String),

    /// Magnitude scale is not exhaustive or not ordered
    #[error("Invalid magnitude scale: {0}")]
    InvalidScale(String),
}

impl QuakemapError {
    /// Whether this error came from the network rather than the payload.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. } | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_are_distinct_from_payload_failures() {
        let api = QuakemapError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(api.is_fetch_failure());
        assert!(!QuakemapError::Validation("no coordinates".into()).is_fetch_failure());
        assert!(!QuakemapError::InvalidResponse("wrong type".into()).is_fetch_failure());
    }

    #[test]
    fn test_api_error_message() {
        let err = QuakemapError::Api {
            status: 404,
            message: "not found".into(),
        };
        assert_eq!(err.to_string(), "USGS API error (HTTP 404): not found");
    }
}
