//! Resolution of needed bibliography entries through NASA/ADS.
//!
//! Resolution runs in two phases:
//!
//! 1. [`plan`] partitions the needed entries and classifies each candidate
//!    without touching the network.
//! 2. [`execute`] runs the pending lookups one at a time (with a
//!    [`QueryThrottle`] pause after each), then exports every collected
//!    bibcode in a single request.
//!
//! A failed lookup never aborts the run. It is recorded as a
//! [`LookupFailure`] and the entry's raw text is routed to the unresolved
//! output so nothing silently disappears.

mod error;
mod throttle;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::ads::{BibliographicClient, ClientError, EXPORT_SORT, RESOLVE_FIELDS};
use crate::parser::{Node, NodeSet, Query, Resolution, classify_entry};

pub use error::{LookupFailure, ResolveError};
pub use throttle::{DEFAULT_QUERY_DELAY, QueryThrottle};

#[allow(clippy::expect_used)]
static ADS_MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\badsurl\s*=").expect("ads marker regex is valid") // Static pattern, safe to panic
});

/// Returns true if the raw entry already carries an `adsurl` field.
///
/// Such entries are taken to be ADS exports already and are left alone.
#[must_use]
pub fn is_ads_native(raw: &str) -> bool {
    ADS_MARKER_PATTERN.is_match(raw)
}

/// A candidate entry that needs a search to find its bibcode.
#[derive(Debug, Clone)]
pub struct PendingLookup {
    /// Position of the entry among the resolution candidates.
    pub index: usize,
    pub node: Node,
    pub query: Query,
}

/// The network-free part of resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPlan {
    /// Needed entries that already carry an `adsurl` field.
    pub ads_native: Vec<Node>,
    /// Needed entries without the marker, in bibliography order.
    pub candidates: Vec<Node>,
    /// Bibcodes read straight from candidate entries.
    pub direct_codes: Vec<String>,
    pub pending: Vec<PendingLookup>,
    /// Candidates with no usable identifier at all.
    pub unresolvable: Vec<Node>,
}

impl ResolutionPlan {
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn direct_count(&self) -> usize {
        self.direct_codes.len()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn unresolvable_count(&self) -> usize {
        self.unresolvable.len()
    }
}

/// Partitions `needed` on the ADS marker and classifies every candidate.
///
/// Each entry's raw text is `node.slice(bib_text)`.
#[must_use]
#[instrument(skip_all, fields(needed = needed.len()))]
pub fn plan(needed: &NodeSet, bib_text: &str) -> ResolutionPlan {
    let mut plan = ResolutionPlan::default();

    for node in needed {
        if is_ads_native(node.slice(bib_text)) {
            plan.ads_native.push(node.clone());
        } else {
            plan.candidates.push(node.clone());
        }
    }

    for (index, node) in plan.candidates.iter().enumerate() {
        match classify_entry(node.slice(bib_text)) {
            Resolution::DirectCode(code) => plan.direct_codes.push(code),
            Resolution::PendingQuery(query) => plan.pending.push(PendingLookup {
                index,
                node: node.clone(),
                query,
            }),
            Resolution::Unresolvable => plan.unresolvable.push(node.clone()),
        }
    }

    info!(
        ads_native = plan.ads_native.len(),
        candidates = plan.candidates.len(),
        direct = plan.direct_codes.len(),
        pending = plan.pending.len(),
        unresolvable = plan.unresolvable.len(),
        "Planned resolution"
    );
    plan
}

/// Progress after a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupProgress {
    pub done: usize,
    pub total: usize,
    pub errors: usize,
}

/// Everything resolution produced.
#[derive(Debug, Clone, Default)]
pub struct ResolutionOutcome {
    /// Bibcodes sent to the export, direct codes first.
    pub codes: Vec<String>,
    /// Exported bibliography text; empty when there was nothing to export.
    pub export: String,
    /// Raw texts of entries that could not be resolved: unresolvable
    /// entries first, then failed lookups.
    pub unresolved: Vec<String>,
    pub failures: Vec<LookupFailure>,
    /// Number of lookups attempted.
    pub queried: usize,
}

impl ResolutionOutcome {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }
}

/// Runs the lookups in `plan`, then exports every resolved bibcode.
///
/// Lookups are strictly sequential. `on_progress` is called after each one.
///
/// # Errors
///
/// Returns [`ResolveError::Export`] if the final export fails. The error
/// still carries the unresolved entry texts. Individual lookup failures are
/// collected in [`ResolutionOutcome::failures`].
#[instrument(skip_all, fields(pending = plan.pending.len(), direct = plan.direct_codes.len()))]
pub async fn execute<F>(
    plan: &ResolutionPlan,
    bib_text: &str,
    client: &dyn BibliographicClient,
    throttle: &QueryThrottle,
    mut on_progress: F,
) -> Result<ResolutionOutcome, ResolveError>
where
    F: FnMut(LookupProgress),
{
    let mut codes = plan.direct_codes.clone();
    let mut failures = Vec::new();
    let total = plan.pending.len();

    for (done, lookup) in plan.pending.iter().enumerate() {
        match client.search(&lookup.query, &RESOLVE_FIELDS).await {
            Ok(Some(record)) => {
                debug!(key = %lookup.node.key, bibcode = %record.bibcode, "Resolved entry");
                codes.push(record.bibcode);
            }
            Ok(None) => {
                let error = ClientError::EmptyResult {
                    query: lookup.query.to_search_string(),
                };
                warn!(key = %lookup.node.key, query = %lookup.query, "No NASA/ADS match");
                failures.push(failure(lookup, error));
            }
            Err(error) => {
                warn!(key = %lookup.node.key, error = %error, "NASA/ADS lookup failed");
                failures.push(failure(lookup, error));
            }
        }

        on_progress(LookupProgress {
            done: done + 1,
            total,
            errors: failures.len(),
        });
        throttle.pause().await;
    }

    let unresolved: Vec<String> = plan
        .unresolvable
        .iter()
        .chain(failures.iter().map(|failure: &LookupFailure| &failure.node))
        .map(|node| node.slice(bib_text).to_string())
        .collect();

    let export = if codes.is_empty() {
        debug!("No bibcodes to export");
        String::new()
    } else {
        debug!(codes = ?codes, "Exporting bibcodes");
        client
            .export(&codes, EXPORT_SORT)
            .await
            .map_err(|source| ResolveError::Export {
                count: codes.len(),
                unresolved: unresolved.clone(),
                source,
            })?
    };

    info!(
        exported = codes.len(),
        unresolved = unresolved.len(),
        errors = failures.len(),
        "Resolution complete"
    );

    Ok(ResolutionOutcome {
        codes,
        export,
        unresolved,
        failures,
        queried: total,
    })
}

fn failure(lookup: &PendingLookup, error: ClientError) -> LookupFailure {
    LookupFailure {
        index: lookup.index,
        node: lookup.node.clone(),
        query: lookup.query.clone(),
        error,
    }
}

/// Plans and executes resolution in one call, without progress reporting.
///
/// # Errors
///
/// See [`execute`].
pub async fn resolve(
    needed: &NodeSet,
    bib_text: &str,
    client: &dyn BibliographicClient,
    throttle: &QueryThrottle,
) -> Result<(ResolutionPlan, ResolutionOutcome), ResolveError> {
    let plan = plan(needed, bib_text);
    let outcome = execute(&plan, bib_text, client, throttle, |_| {}).await?;
    Ok((plan, outcome))
}
