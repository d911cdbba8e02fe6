//! bibchex core library
//!
//! Reconciles the citations in a LaTeX document against a BibTeX file and
//! rebuilds the needed entries from NASA/ADS.
//!
//! # Architecture
//!
//! The pipeline runs in stages, each in its own module:
//! - [`parser`] - citation, entry, and identifier extraction
//! - [`reconcile`] - needed and missing entries
//! - [`resolver`] - classification, throttled lookups, and batch export
//! - [`ads`] - the NASA/ADS client and its credential
//! - [`report`] - stage counters and output files

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ads;
pub mod parser;
pub mod reconcile;
pub mod report;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use ads::{AdsClient, AdsToken, BibliographicClient, ClientError, ClientSettings};
pub use parser::{
    Node, NodeKind, NodeSet, PairingStrategy, Query, Resolution, classify_entry,
    extract_citations, extract_entries,
};
pub use reconcile::{Reconciliation, reconcile};
pub use report::Summary;
pub use resolver::{
    LookupFailure, QueryThrottle, ResolutionOutcome, ResolutionPlan, ResolveError,
};
