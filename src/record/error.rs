//! Error types for record store operations.

use thiserror::Error;

/// Errors that can occur while talking to the record store.
#[derive(Error, Debug)]
pub enum RecordError {
    /// API key or base id not configured
    #[error("Missing record store credential: {name}")]
    MissingCredentials {
        /// Name of the missing setting
        name: String,
    },

    /// The configured API URL cannot address a table
    #[error("Invalid record store URL: {url}")]
    InvalidUrl {
        /// The offending URL
        url: String,
    },

    /// Connection, TLS or timeout failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Record store returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, if any
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RecordError {
    /// Create a missing credentials error.
    pub fn missing_credentials(name: impl Into<String>) -> Self {
        Self::MissingCredentials { name: name.into() }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create a status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}
