//! Free-form NASA/ADS search queries and bibcode detection.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[allow(clippy::expect_used)]
static BIBCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+\.+[a-zA-Z0-9]+\.+[a-zA-Z0-9]+$").expect("bibcode regex is valid") // Static pattern, safe to panic
});

/// Default fields requested by ad hoc searches.
pub const DEFAULT_SEARCH_FIELDS: &str = "author,date,pub,title,bibcode,citation_count,links_data";

/// Default ADS database filter.
pub const DEFAULT_DATABASE: &str = "astronomy";

/// Returns true if `term` looks like an ADS bibcode (e.g. `2019ApJ...870L..17X`).
#[must_use]
pub fn is_bibcode(term: &str) -> bool {
    BIBCODE_PATTERN.is_match(term)
}

/// A search that cannot be sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchQueryError {
    #[error(
        "not enough information for a NASA/ADS query\n  Suggestion: Provide search terms or at least one --author (a year alone is not enough)"
    )]
    Insufficient,
}

/// An ad hoc NASA/ADS search built from terms and filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdsSearchQuery {
    pub terms: Vec<String>,
    pub authors: Vec<String>,
    pub year: Option<String>,
    pub database: Option<String>,
}

impl AdsSearchQuery {
    /// Terms or authors are required; a year alone matches too much.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.terms.is_empty() || !self.authors.is_empty()
    }

    /// Query parameters: the first component is `q`, the rest are `fq` filters.
    ///
    /// # Errors
    ///
    /// Returns [`SearchQueryError::Insufficient`] when [`Self::is_valid`] is false.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, SearchQueryError> {
        if !self.is_valid() {
            return Err(SearchQueryError::Insufficient);
        }

        let mut components = Vec::new();
        if !self.terms.is_empty() {
            components.push(self.terms.join(" "));
        }
        components.extend(self.authors.iter().map(|author| format!("author:{author}")));
        if let Some(year) = &self.year {
            components.push(format!("year:{year}"));
        }
        if let Some(database) = &self.database {
            components.push(format!("database:{database}"));
        }

        Ok(components
            .into_iter()
            .enumerate()
            .map(|(idx, component)| (if idx == 0 { "q" } else { "fq" }, component))
            .collect())
    }
}
