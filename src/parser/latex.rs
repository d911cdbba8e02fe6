//! Citation extraction from LaTeX source.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::node::{Node, NodeKind};

/// `\cite`, `\citet`, `\citep`, `\citealp`, `\citealt`, any number of
/// bracketed notes, then a brace-delimited key list.
#[allow(clippy::expect_used)]
static CITE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\cite(?:t|p|alp|alt)?(?:\[[^\]]*\])*\{(?P<keys>[^\}]+)\}")
        .expect("cite regex is valid") // Static pattern, safe to panic
});

/// Extracts every citation key used in `contents`.
///
/// Each comma-separated key of an invocation becomes its own
/// [`NodeKind::Citation`] node, and all keys of one invocation share that
/// invocation's span. Nodes are returned in document order, duplicates
/// included; collect into a [`NodeSet`](super::NodeSet) to deduplicate.
/// Empty keys (`\cite{a,,b}`) are dropped.
#[tracing::instrument(skip(contents), fields(contents_len = contents.len()))]
#[must_use]
pub fn extract_citations(contents: &str) -> Vec<Node> {
    let mut nodes = Vec::new();

    for cap in CITE_PATTERN.captures_iter(contents) {
        let (Some(whole), Some(keys)) = (cap.get(0), cap.name("keys")) else {
            continue;
        };
        for key in keys.as_str().split(',') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            nodes.push(Node::new(whole.range(), NodeKind::Citation, key));
        }
    }

    debug!(citations = nodes.len(), "Extracted citation keys");
    nodes
}
