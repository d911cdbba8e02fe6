//! Error types for NASA/ADS client operations.
//!
//! Messages follow the What/Why/Fix pattern used across the project.

use thiserror::Error;

use super::token::ADS_TOKEN_ENV;

/// Errors that can occur while talking to NASA/ADS.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No API token was available at startup.
    #[error(
        "no NASA/ADS API token found\n\n  \
         Export an ADS API access token to the `{var}` environment variable.\n  \
         On most shells this can be done with:\n\n      \
         export {var}=\"...\"\n\n  \
         Tokens are free; see https://ui.adsabs.harvard.edu/help/api/\n\n  \
         Do not share your token with anyone."
    )]
    MissingCredential {
        /// Environment variable that was checked
        var: &'static str,
    },

    /// The configured API base URL cannot be used
    #[error("invalid NASA/ADS API URL '{url}': {reason}\n  Suggestion: Use an absolute http(s) URL such as https://api.adsabs.harvard.edu/v1")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// HTTP client construction failed
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Underlying builder error
        reason: String,
    },

    /// The request never produced a response
    #[error("request to {endpoint} failed: {reason}\n  Suggestion: Check your network connection")]
    Request {
        /// API endpoint path
        endpoint: String,
        /// Transport-level reason
        reason: String,
    },

    /// NASA/ADS answered with a non-success status
    #[error("NASA/ADS returned HTTP {status} for {endpoint}\n  Suggestion: {suggestion}")]
    Status {
        /// API endpoint path
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response body was not the expected JSON
    #[error("unexpected NASA/ADS response from {endpoint}: {reason}")]
    Decode {
        /// API endpoint path
        endpoint: String,
        /// Deserialization error
        reason: String,
    },

    /// A search returned no documents
    #[error("no NASA/ADS record matched '{query}'\n  Suggestion: Check the identifier or add an adsurl to the entry by hand")]
    EmptyResult {
        /// The search string that was sent
        query: String,
    },
}

impl ClientError {
    /// Creates a `MissingCredential` error for the standard token variable.
    #[must_use]
    pub fn missing_credential() -> Self {
        Self::MissingCredential { var: ADS_TOKEN_ENV }
    }

    /// Creates a `Status` error with a suggestion matched to the status code.
    #[must_use]
    pub fn status(endpoint: &str, status: u16) -> Self {
        let suggestion = match status {
            401 | 403 => format!("Check that `{ADS_TOKEN_ENV}` holds a valid, unexpired token"),
            429 => "NASA/ADS rate limit exceeded. Increase --query-delay-ms or try again later"
                .to_string(),
            s if s >= 500 => "NASA/ADS API unavailable. Try again later".to_string(),
            _ => "Check the request parameters".to_string(),
        };
        Self::Status {
            endpoint: endpoint.to_string(),
            status,
            suggestion,
        }
    }

    /// Creates a `Request` error from a transport failure.
    #[must_use]
    pub fn request(endpoint: &str, error: &reqwest::Error) -> Self {
        Self::Request {
            endpoint: endpoint.to_string(),
            reason: error.to_string(),
        }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(endpoint: &str, reason: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if retrying later cannot help.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. } | Self::InvalidBaseUrl { .. } | Self::ClientBuild { .. }
        )
    }
}
