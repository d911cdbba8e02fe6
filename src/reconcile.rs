//! Set reconciliation between cited keys and bibliography entries.

use tracing::debug;

use crate::parser::NodeSet;

/// Outcome of comparing citations with bibliography entries.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Bibliography entries that are cited, in bibliography order.
    ///
    /// These are the entry nodes, so their spans point into the bibliography.
    pub needed: NodeSet,
    /// Cited keys with no bibliography entry, in document order.
    pub missing: NodeSet,
}

/// Splits `citations` and `entries` into needed entries and missing keys.
///
/// Entries that are never cited appear in neither set.
#[must_use]
pub fn reconcile(citations: &NodeSet, entries: &NodeSet) -> Reconciliation {
    let needed: NodeSet = entries
        .iter()
        .filter(|entry| citations.contains(entry))
        .cloned()
        .collect();
    let missing: NodeSet = citations
        .iter()
        .filter(|citation| !entries.contains(citation))
        .cloned()
        .collect();

    debug!(
        needed = needed.len(),
        missing = missing.len(),
        unused = entries.len() - needed.len(),
        "Reconciled citations against entries"
    );

    Reconciliation { needed, missing }
}
