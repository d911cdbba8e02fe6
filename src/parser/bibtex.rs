//! BibTeX entry extraction.
//!
//! Entries are located with lightweight patterns rather than a grammar. Each
//! entry becomes a [`NodeKind::Entry`] node whose span covers the raw entry
//! text, so later stages can slice it back out of the bibliography verbatim.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::node::{Node, NodeKind};

/// `@type{key` up to the first comma or closing brace.
#[allow(clippy::expect_used)]
static ENTRY_OPEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\w+\{(?P<key>[^\},]+)").expect("bibtex entry regex is valid") // Static pattern, safe to panic
});

/// A line holding nothing but a closing brace.
#[allow(clippy::expect_used)]
static ENTRY_CLOSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\}\s*$").expect("bibtex close regex is valid") // Static pattern, safe to panic
});

/// How an entry opening is matched with its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingStrategy {
    /// The i-th opening is paired with the i-th lone `}` line.
    ///
    /// Assumes well-formed, one-field-per-line input. A field body that
    /// contains a line with only `}` shifts every later pairing by one.
    #[default]
    Positional,
    /// Each entry ends at the `}` that brings brace depth back to zero.
    BraceDepth,
}

/// Extracts every entry in `contents` using the given pairing strategy.
#[tracing::instrument(skip(contents), fields(contents_len = contents.len()))]
#[must_use]
pub fn extract_entries(contents: &str, strategy: PairingStrategy) -> Vec<Node> {
    let nodes = match strategy {
        PairingStrategy::Positional => pair_positionally(contents),
        PairingStrategy::BraceDepth => scan_brace_depth(contents),
    };
    debug!(entries = nodes.len(), ?strategy, "Extracted bibliography entries");
    nodes
}

fn pair_positionally(contents: &str) -> Vec<Node> {
    let openings: Vec<_> = ENTRY_OPEN_PATTERN.captures_iter(contents).collect();
    let closings: Vec<_> = ENTRY_CLOSE_PATTERN.find_iter(contents).collect();

    if openings.len() != closings.len() {
        warn!(
            openings = openings.len(),
            closings = closings.len(),
            "Entry openings and closing lines differ in number; spans may be misaligned"
        );
    }

    openings
        .iter()
        .zip(closings.iter())
        .filter_map(|(open, close)| {
            let start = open.get(0)?.start();
            let key = open.name("key")?.as_str();
            Some(Node::new(start..close.end(), NodeKind::Entry, key))
        })
        .collect()
}

fn scan_brace_depth(contents: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut resume_at = 0usize;

    for open in ENTRY_OPEN_PATTERN.captures_iter(contents) {
        let (Some(whole), Some(key)) = (open.get(0), open.name("key")) else {
            continue;
        };
        if whole.start() < resume_at {
            continue;
        }
        let Some(brace) = contents[whole.start()..].find('{') else {
            continue;
        };
        let brace = whole.start() + brace;

        let end = find_closing_brace(contents, brace)
            .map_or_else(|| recovery_end(contents, whole.end()), |close| close + 1);
        nodes.push(Node::new(whole.start()..end, NodeKind::Entry, key.as_str()));
        resume_at = end;
    }

    nodes
}

/// Byte offset of the brace closing the one at `open`, if balanced.
fn find_closing_brace(contents: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escape = false;

    for (offset, ch) in contents[open..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            '"' if depth == 1 => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// End of an unterminated entry: the next `@` at a line start, else EOF.
fn recovery_end(contents: &str, from: usize) -> usize {
    contents[from..]
        .find("\n@")
        .map_or(contents.len(), |pos| from + pos + 1)
}
