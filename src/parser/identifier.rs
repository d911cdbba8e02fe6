//! Unambiguous identifier extraction from raw BibTeX entries.
//!
//! Only identifiers that pin down a single work are used: DOI, `arXiv`
//! identifier, and ADS bibcode. Title and author are never consulted.
//!
//! The `doi`, `note`, `url` and `journal` fields are visited in document
//! order and folded into one [`ExtractedIdentifiers`] value. A later field
//! overwrites whatever an earlier field extracted for the same identifier.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

#[allow(clippy::expect_used)]
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<label>doi|note|url|journal)\s*=\s*\{(?P<info>[^\}]+)\}")
        .expect("identifier field regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static ARXIV_NOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"arXiv:\s?(?P<id>\d+\.\d+)").expect("arXiv note regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static BIBCODE_NOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ADS Bibcode:\s?(?P<id>[^ ]+)").expect("bibcode note regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static ARXIV_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"arxiv\.org/(?:abs|pdf)/(?P<id>[^ /]+)").expect("arXiv url regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static BIBCODE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"adsabs\.harvard\.edu/abs/(?P<id>[^ /]+)").expect("bibcode url regex is valid") // Static pattern, safe to panic
});

/// The closed set of fields that can carry an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    Doi,
    Note,
    Url,
    Journal,
}

impl FieldLabel {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "doi" => Some(Self::Doi),
            "note" => Some(Self::Note),
            "url" => Some(Self::Url),
            "journal" => Some(Self::Journal),
            _ => None,
        }
    }
}

/// Raw identifiers accumulated over an entry's fields, before decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedIdentifiers {
    pub doi: Option<String>,
    pub preprint_id: Option<String>,
    pub record_code: Option<String>,
}

impl ExtractedIdentifiers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doi.is_none() && self.preprint_id.is_none() && self.record_code.is_none()
    }

    /// Folds one field occurrence into the accumulator.
    fn absorb(mut self, label: FieldLabel, value: &str) -> Self {
        match label {
            FieldLabel::Doi => self.doi = Some(value.to_string()),
            FieldLabel::Note | FieldLabel::Journal => {
                if let Some(id) = first_capture(&ARXIV_NOTE_PATTERN, value) {
                    self.preprint_id = Some(id);
                }
                if let Some(code) = first_capture(&BIBCODE_NOTE_PATTERN, value) {
                    self.record_code = Some(code);
                }
            }
            FieldLabel::Url => {
                if let Some(id) = first_capture(&ARXIV_URL_PATTERN, value) {
                    self.preprint_id = Some(id);
                }
                if let Some(code) = first_capture(&BIBCODE_URL_PATTERN, value) {
                    self.record_code = Some(code);
                }
            }
        }
        self
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|cap| cap.name("id"))
        .map(|id| id.as_str().to_string())
}

/// A network lookup for one entry: a DOI, an `arXiv` identifier, or both.
///
/// Never empty; construct through [`Query::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    doi: Option<String>,
    preprint_id: Option<String>,
}

impl Query {
    /// Builds a query, or `None` when neither identifier is present.
    #[must_use]
    pub fn new(doi: Option<String>, preprint_id: Option<String>) -> Option<Self> {
        if doi.is_none() && preprint_id.is_none() {
            return None;
        }
        Some(Self { doi, preprint_id })
    }

    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }

    #[must_use]
    pub fn preprint_id(&self) -> Option<&str> {
        self.preprint_id.as_deref()
    }

    /// `(field, value)` pairs in ADS search syntax, DOI first.
    #[must_use]
    pub fn terms(&self) -> Vec<(&'static str, &str)> {
        let mut terms = Vec::with_capacity(2);
        if let Some(doi) = &self.doi {
            terms.push(("doi", doi.as_str()));
        }
        if let Some(id) = &self.preprint_id {
            terms.push(("arXiv", id.as_str()));
        }
        terms
    }

    /// Space-joined `field:value` tokens, e.g. `doi:10.1/x arXiv:2101.00001`.
    #[must_use]
    pub fn to_search_string(&self) -> String {
        self.terms()
            .iter()
            .map(|(field, value)| format!("{field}:{value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_search_string())
    }
}

/// How an entry without an ADS url will be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The entry already names its ADS bibcode.
    DirectCode(String),
    /// The entry needs an ADS search.
    PendingQuery(Query),
    /// No identifying field could be extracted.
    Unresolvable,
}

/// Scans a raw entry's identifier fields in document order.
#[must_use]
pub fn extract_identifiers(raw_entry: &str) -> ExtractedIdentifiers {
    FIELD_PATTERN
        .captures_iter(raw_entry)
        .filter_map(|cap| {
            let label = FieldLabel::from_label(cap.name("label")?.as_str())?;
            let info = cap.name("info")?.as_str();
            trace!(?label, "Identifier field");
            Some((label, info))
        })
        .fold(ExtractedIdentifiers::default(), |acc, (label, info)| {
            acc.absorb(label, info)
        })
}

/// Classifies a raw entry for resolution.
///
/// A bibcode wins over any other identifier found alongside it. Every
/// surviving value is percent-decoded.
#[must_use]
pub fn classify_entry(raw_entry: &str) -> Resolution {
    let found = extract_identifiers(raw_entry);
    if found.is_empty() {
        return Resolution::Unresolvable;
    }
    if let Some(code) = found.record_code {
        return Resolution::DirectCode(percent_decode(code));
    }
    Query::new(
        found.doi.map(percent_decode),
        found.preprint_id.map(percent_decode),
    )
    .map_or(Resolution::Unresolvable, Resolution::PendingQuery)
}

fn percent_decode(value: String) -> String {
    let decoded = urlencoding::decode(&value).map(Cow::into_owned);
    decoded.unwrap_or(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_field_yields_pending_query() {
        let entry = "@article{B20,\n  doi = {10.1/x},\n}";
        let Resolution::PendingQuery(query) = classify_entry(entry) else {
            panic!("expected a pending query");
        };
        assert_eq!(query.doi(), Some("10.1/x"));
        assert_eq!(query.preprint_id(), None);
        assert_eq!(query.to_search_string(), "doi:10.1/x");
    }

    #[test]
    fn test_arxiv_note_and_doi_compose_query() {
        let entry = "@article{k,\n  note = {arXiv: 2101.01234},\n  doi = {10.5/abc},\n}";
        let Resolution::PendingQuery(query) = classify_entry(entry) else {
            panic!("expected a pending query");
        };
        assert_eq!(query.to_search_string(), "doi:10.5/abc arXiv:2101.01234");
    }

    #[test]
    fn test_arxiv_url_extracted() {
        let entry = "@misc{k,\n  url = {https://arxiv.org/abs/2305.11111v2},\n}";
        let Resolution::PendingQuery(query) = classify_entry(entry) else {
            panic!("expected a pending query");
        };
        assert_eq!(query.preprint_id(), Some("2305.11111v2"));
    }

    #[test]
    fn test_record_code_url_later_in_text_wins_over_note_preprint() {
        let entry = "@article{k,
  note = {arXiv:1901.00001},
  url = {https://ui.adsabs.harvard.edu/abs/2019ApJ...870L..17X/abstract},
}";
        assert_eq!(
            classify_entry(entry),
            Resolution::DirectCode("2019ApJ...870L..17X".to_string())
        );
    }

    #[test]
    fn test_later_field_overwrites_earlier_same_identifier() {
        let entry = "@article{k,
  note = {arXiv:1111.1111},
  url = {https://arxiv.org/pdf/2222.2222},
}";
        let found = extract_identifiers(entry);
        assert_eq!(found.preprint_id.as_deref(), Some("2222.2222"));
    }

    #[test]
    fn test_bibcode_note_is_direct_code() {
        let entry = "@article{k,\n  note = {ADS Bibcode: 2020MNRAS.491.1234A},\n}";
        assert_eq!(
            classify_entry(entry),
            Resolution::DirectCode("2020MNRAS.491.1234A".to_string())
        );
    }

    #[test]
    fn test_journal_without_pattern_is_unresolvable() {
        let entry = "@article{k,\n  journal = {The Astrophysical Journal},\n}";
        assert_eq!(classify_entry(entry), Resolution::Unresolvable);
    }

    #[test]
    fn test_journal_arxiv_e_print_is_used() {
        let entry = "@article{k,\n  journal = {arXiv e-prints, arXiv:2009.07000},\n}";
        let Resolution::PendingQuery(query) = classify_entry(entry) else {
            panic!("expected a pending query");
        };
        assert_eq!(query.preprint_id(), Some("2009.07000"));
    }

    #[test]
    fn test_entry_without_fields_is_unresolvable() {
        let entry = "@book{k,\n  title = {Some Book},\n  author = {Doe, J.},\n}";
        assert_eq!(classify_entry(entry), Resolution::Unresolvable);
    }

    #[test]
    fn test_adsurl_field_is_not_a_url_field() {
        let entry = "@article{k,\n  adsurl = {https://ui.adsabs.harvard.edu/abs/2019ApJ...1A},\n}";
        assert_eq!(classify_entry(entry), Resolution::Unresolvable);
    }

    #[test]
    fn test_values_are_percent_decoded() {
        let entry = "@article{k,\n  url = {https://adsabs.harvard.edu/abs/2019A%26A...622A..12B},\n}";
        assert_eq!(
            classify_entry(entry),
            Resolution::DirectCode("2019A&A...622A..12B".to_string())
        );

        let entry = "@article{k,\n  doi = {10.1000/a%2Fb},\n}";
        let Resolution::PendingQuery(query) = classify_entry(entry) else {
            panic!("expected a pending query");
        };
        assert_eq!(query.doi(), Some("10.1000/a/b"));
    }

    #[test]
    fn test_query_new_rejects_empty() {
        assert!(Query::new(None, None).is_none());
        assert!(Query::new(Some("10.1/x".to_string()), None).is_some());
    }
}
