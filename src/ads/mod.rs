//! NASA/ADS client: credential handling, search, export, and display.
//!
//! # Architecture
//!
//! - [`BibliographicClient`] - Async trait the resolution pipeline talks to
//! - [`AdsClient`] - REST implementation (bearer token, JSON bodies)
//! - [`AdsToken`] - Credential read once from `ADS_TOKEN`
//! - [`AdsSearchQuery`] - Ad hoc term/author/year searches for `adsq`
//! - [`format_document`] - Aligned text rendering of search documents
//!
//! # Example
//!
//! ```no_run
//! use bibchex_core::ads::{AdsClient, AdsToken, BibliographicClient, ClientSettings, RESOLVE_FIELDS};
//! use bibchex_core::parser::Query;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = AdsToken::from_env()?;
//! let client = AdsClient::new(token, &ClientSettings::default())?;
//! let query = Query::new(Some("10.3847/2041-8213/ab0ec7".to_string()), None).ok_or("empty")?;
//! if let Some(record) = client.search(&query, &RESOLVE_FIELDS).await? {
//!     println!("{}", record.bibcode);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod display;
mod error;
mod http_client;
mod search;
mod token;

pub use client::{
    AdsClient, BibliographicClient, EXPORT_SORT, RESOLVE_FIELDS, SearchRecord, export_text,
    first_search_record,
};
pub use display::format_document;
pub use error::ClientError;
pub use http_client::{ClientSettings, DEFAULT_API_URL};
pub use search::{
    AdsSearchQuery, DEFAULT_DATABASE, DEFAULT_SEARCH_FIELDS, SearchQueryError, is_bibcode,
};
pub use token::{ADS_TOKEN_ENV, AdsToken};
