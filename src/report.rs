//! Stage counters and output files.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};

use crate::parser::NodeSet;
use crate::reconcile::Reconciliation;
use crate::resolver::{ResolutionOutcome, ResolutionPlan};

/// Counts gathered at every pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_citations: usize,
    pub total_entries: usize,
    pub needed: usize,
    pub missing: usize,
    /// Needed entries without an `adsurl` field.
    pub candidates: usize,
    pub direct: usize,
    pub queried: usize,
    pub unresolvable: usize,
    pub errored: usize,
}

impl Summary {
    /// Counters known before any network activity.
    #[must_use]
    pub fn from_stages(
        citations: &NodeSet,
        entries: &NodeSet,
        reconciliation: &Reconciliation,
        plan: &ResolutionPlan,
    ) -> Self {
        Self {
            total_citations: citations.len(),
            total_entries: entries.len(),
            needed: reconciliation.needed.len(),
            missing: reconciliation.missing.len(),
            candidates: plan.candidate_count(),
            direct: plan.direct_count(),
            queried: plan.pending_count(),
            unresolvable: plan.unresolvable_count(),
            errored: 0,
        }
    }

    /// Folds in the results of the fetch phase.
    #[must_use]
    pub fn with_outcome(mut self, outcome: &ResolutionOutcome) -> Self {
        self.queried = outcome.queried;
        self.errored = outcome.error_count();
        self
    }

    /// The parsing table, one `label : value` row per counter.
    #[must_use]
    pub fn parsing_table(&self) -> String {
        render_table(
            "Parsing summary:",
            &[
                ("Unique citations", self.total_citations),
                ("BibTeX entries", self.total_entries),
                (". needed entries", self.needed),
                (". missing entries", self.missing),
                ("Missing ADS url", self.candidates),
                (". has bibcode", self.direct),
                (". has query", self.queried),
                (". no query", self.unresolvable),
            ],
        )
    }

    #[must_use]
    pub fn fetch_table(&self) -> String {
        render_table(
            "Fetch summary:",
            &[
                ("Queried", self.queried),
                (". errored", self.errored),
            ],
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parsing_table())
    }
}

const LABEL_WIDTH: usize = 17;

fn render_table(title: &str, rows: &[(&str, usize)]) -> String {
    let mut text = format!("{title}\n");
    for (label, value) in rows {
        text.push_str(&format!(" {label:<LABEL_WIDTH$} : {value}\n"));
    }
    text
}

/// Raw texts of the needed entries, sorted and newline-joined.
///
/// This is the primary output when resolution is skipped. Every block is a
/// byte-for-byte slice of `bib_text`.
#[must_use]
pub fn raw_needed_output(needed: &NodeSet, bib_text: &str) -> String {
    let mut texts: Vec<&str> = needed.iter().map(|node| node.slice(bib_text)).collect();
    texts.sort_unstable();
    texts.join("\n")
}

/// Newline-joined unresolved entry texts for the secondary output.
#[must_use]
pub fn unresolved_output(unresolved: &[String]) -> String {
    unresolved.join("\n")
}

/// Truncates `path` and writes `contents` in one call.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be written.
#[instrument(skip(contents), fields(path = %path.display(), bytes = contents.len()))]
pub fn write_output(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)?;
    debug!("Wrote output file");
    Ok(())
}

/// Confirmation line printed after each file is written.
#[must_use]
pub fn written_message(path: &Path) -> String {
    format!("Written '{}'", path.display())
}
