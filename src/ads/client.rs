//! NASA/ADS search and export client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::parser::Query;

use super::http_client::{ClientSettings, build_http_client, parse_api_url};
use super::{AdsToken, ClientError};

const SEARCH_ENDPOINT: &str = "search/query";
const EXPORT_ENDPOINT: &str = "export/bibtex";

/// Fields requested when resolving an entry to its bibcode.
pub const RESOLVE_FIELDS: [&str; 2] = ["bibcode", "title"];

/// Sort order for the final BibTeX export.
pub const EXPORT_SORT: &str = "first_author asc";

// ==================== ADS API Response Types ====================

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchRecord>,
}

/// The fields of a search hit that resolution uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchRecord {
    pub bibcode: String,
    #[serde(default)]
    pub title: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    bibcode: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    export: String,
}

// ==================== BibliographicClient ====================

/// Lookup and export operations against a bibliographic database.
///
/// Uses `async_trait` so the orchestrator can hold a `&dyn BibliographicClient`
/// and tests can substitute their own implementation.
#[async_trait]
pub trait BibliographicClient: Send + Sync {
    /// Runs `query` and returns the first hit, or `None` when nothing matched.
    async fn search(
        &self,
        query: &Query,
        fields: &[&str],
    ) -> Result<Option<SearchRecord>, ClientError>;

    /// Exports `codes` as one formatted bibliography text.
    async fn export(&self, codes: &[String], sort: &str) -> Result<String, ClientError>;
}

/// [`BibliographicClient`] backed by the NASA/ADS REST API.
pub struct AdsClient {
    client: Client,
    api_url: Url,
    token: AdsToken,
}

impl AdsClient {
    /// Creates a client for the API root in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the API URL is invalid or the HTTP client
    /// cannot be built.
    #[instrument(skip_all, fields(api_url = %settings.api_url))]
    pub fn new(token: AdsToken, settings: &ClientSettings) -> Result<Self, ClientError> {
        let api_url = parse_api_url(&settings.api_url)?;
        let client = build_http_client(settings)?;
        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.api_url
            .join(path)
            .map_err(|error| ClientError::InvalidBaseUrl {
                url: self.api_url.to_string(),
                reason: error.to_string(),
            })
    }

    /// Sends a search and returns the raw JSON body.
    ///
    /// `params` are sent as given (`q`, `fq`, ...); `fields` becomes `fl`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-success status.
    #[instrument(skip(self, params), fields(param_count = params.len()))]
    pub async fn search_raw(
        &self,
        params: &[(&str, String)],
        fields: &str,
    ) -> Result<String, ClientError> {
        let mut url = self.endpoint(SEARCH_ENDPOINT)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("fl", fields);
        }
        debug!(endpoint = SEARCH_ENDPOINT, "Calling NASA/ADS search");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|error| ClientError::request(SEARCH_ENDPOINT, &error))?;
        read_body(SEARCH_ENDPOINT, response).await
    }

    /// Requests a BibTeX export and returns the raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-success status.
    #[instrument(skip(self, codes), fields(codes = codes.len(), sort = ?sort))]
    pub async fn export_raw(
        &self,
        codes: &[String],
        sort: Option<&str>,
    ) -> Result<String, ClientError> {
        let url = self.endpoint(EXPORT_ENDPOINT)?;
        debug!(endpoint = EXPORT_ENDPOINT, "Calling NASA/ADS export");

        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.expose())
            .json(&ExportRequest {
                bibcode: codes,
                sort,
            })
            .send()
            .await
            .map_err(|error| ClientError::request(EXPORT_ENDPOINT, &error))?;
        read_body(EXPORT_ENDPOINT, response).await
    }
}

impl std::fmt::Debug for AdsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdsClient")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

async fn read_body(endpoint: &str, response: Response) -> Result<String, ClientError> {
    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), endpoint, "NASA/ADS error status");
        return Err(ClientError::status(endpoint, status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|error| ClientError::request(endpoint, &error))
}

/// Extracts the first document from a search response body.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if `body` is not a search response.
pub fn first_search_record(body: &str) -> Result<Option<SearchRecord>, ClientError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|error| ClientError::decode(SEARCH_ENDPOINT, error))?;
    Ok(envelope.response.docs.into_iter().next())
}

/// Extracts the BibTeX text from an export response body.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if `body` is not an export response.
pub fn export_text(body: &str) -> Result<String, ClientError> {
    let parsed: ExportResponse =
        serde_json::from_str(body).map_err(|error| ClientError::decode(EXPORT_ENDPOINT, error))?;
    Ok(parsed.export)
}

#[async_trait]
impl BibliographicClient for AdsClient {
    async fn search(
        &self,
        query: &Query,
        fields: &[&str],
    ) -> Result<Option<SearchRecord>, ClientError> {
        debug!(query = %query, "Resolving query to bibcode");
        let params = [("q", query.to_search_string())];
        let body = self.search_raw(&params, &fields.join(",")).await?;
        first_search_record(&body)
    }

    async fn export(&self, codes: &[String], sort: &str) -> Result<String, ClientError> {
        let body = self.export_raw(codes, Some(sort)).await?;
        export_text(&body)
    }
}
