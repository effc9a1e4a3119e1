//! Error types for Digi-Key API operations.
//!
//! # Security Note
//!
//! Error messages never include the client secret or bearer tokens.
//! Response bodies are included only for non-success statuses, where the API
//! returns a problem description rather than credentials.

use thiserror::Error;

/// Result type for Digi-Key operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while fetching search results.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A required credential environment variable is not set.
    #[error("missing API credential: environment variable {var} is not set")]
    MissingCredential {
        /// Name of the environment variable.
        var: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("network error calling {url}")]
    Network {
        /// Endpoint that was called.
        url: String,
        /// The underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The token endpoint refused to issue a credential.
    #[error("token request failed with status {status}: {message}")]
    Token {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The search endpoint returned a non-success status.
    #[error("API request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("invalid response body: {context}")]
    InvalidBody {
        /// What was being decoded.
        context: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The page size is zero.
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

impl FetchError {
    /// Creates a missing-credential error.
    pub fn missing_credential(var: impl Into<String>) -> Self {
        Self::MissingCredential { var: var.into() }
    }

    /// Creates a network error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a non-success status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid-body error.
    pub fn invalid_body(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidBody {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = FetchError::status(500, "internal error");
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: internal error"
        );
    }

    #[test]
    fn missing_credential_display() {
        let err = FetchError::missing_credential("DIGIKEY_CLIENT_ID");
        assert!(err.to_string().contains("DIGIKEY_CLIENT_ID"));
    }
}
