//! HTTP client construction policy for NASA/ADS requests.
//!
//! Timeouts, User-Agent and compression are decided here once, so the
//! search and export paths behave identically on the wire.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::user_agent;

use super::ClientError;

/// Default NASA/ADS API root.
pub const DEFAULT_API_URL: &str = "https://api.adsabs.harvard.edu/v1";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Network settings for [`AdsClient`](super::AdsClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// API root; `search/query` and `export/bibtex` are joined onto it.
    pub api_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl ClientSettings {
    /// Same settings, pointed at a different API root.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Parses and normalizes the API root so endpoint joins keep its path.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] for unparseable or non-http(s) URLs.
pub(crate) fn parse_api_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw).map_err(|error| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: error.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("scheme '{}' is not supported", url.scheme()),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builds the HTTP client used for all NASA/ADS calls.
///
/// # Errors
///
/// Returns [`ClientError::ClientBuild`] when client construction fails.
pub(crate) fn build_http_client(settings: &ClientSettings) -> Result<Client, ClientError> {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.read_timeout)
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| ClientError::ClientBuild {
            reason: error.to_string(),
        })
}
