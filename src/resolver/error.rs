//! Error types for the resolution phase.

use std::fmt;

use thiserror::Error;

use crate::ads::ClientError;
use crate::parser::{Node, Query};

/// A single pending query that could not be resolved.
///
/// Recorded and reported; never aborts the run. The entry's raw text is
/// routed to the unresolved output instead.
#[derive(Debug, Clone)]
pub struct LookupFailure {
    /// Position of the entry among the resolution candidates.
    pub index: usize,
    /// The entry whose lookup failed.
    pub node: Node,
    pub query: Query,
    pub error: ClientError,
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, [{}]): {}",
            self.index, self.node.key, self.query, self.error
        )
    }
}

/// Failures that stop the resolution phase as a whole.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The final batch export was rejected or unreachable.
    #[error("NASA/ADS export of {count} bibcode(s) failed: {source}")]
    Export {
        /// Number of bibcodes in the export request
        count: usize,
        /// Raw text of entries that were never resolved, still worth writing
        unresolved: Vec<String>,
        #[source]
        source: ClientError,
    },
}
