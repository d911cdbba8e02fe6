//! NASA/ADS API credential.
//!
//! The token is read once at startup and handed to [`AdsClient`](super::AdsClient)
//! explicitly. Its value never appears in `Debug` output or logs.

use std::fmt;

use super::ClientError;

/// Environment variable holding the NASA/ADS API token.
pub const ADS_TOKEN_ENV: &str = "ADS_TOKEN";

/// A bearer token for the NASA/ADS API.
#[derive(Clone)]
pub struct AdsToken(String);

impl AdsToken {
    /// Reads the token from [`ADS_TOKEN_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] when the variable is unset
    /// or blank.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_value(std::env::var(ADS_TOKEN_ENV).ok())
    }

    /// Wraps an optional raw value, rejecting absent or blank tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] when `value` is `None` or
    /// only whitespace.
    pub fn from_value(value: Option<String>) -> Result<Self, ClientError> {
        value
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(Self)
            .ok_or_else(ClientError::missing_credential)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdsToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdsToken(<redacted>)")
    }
}
