//! Lightweight extraction from LaTeX and BibTeX sources.
//!
//! Nothing here is a grammar-level parser. Citation invocations, entry
//! openings, and identifier fields are located with regular expressions,
//! which is enough for the well-formed files this tool expects.
//!
//! # Example
//!
//! ```
//! use bibchex_core::parser::{NodeSet, PairingStrategy, extract_citations, extract_entries};
//!
//! let tex: NodeSet = extract_citations(r"\citep{A19,B20}").into_iter().collect();
//! let bib: NodeSet = extract_entries("@article{A19,\n  doi = {10.1/x},\n}\n", PairingStrategy::Positional)
//!     .into_iter()
//!     .collect();
//! assert_eq!(tex.len(), 2);
//! assert_eq!(bib.len(), 1);
//! ```

mod bibtex;
mod identifier;
mod latex;
mod node;

pub use bibtex::{PairingStrategy, extract_entries};
pub use identifier::{
    ExtractedIdentifiers, FieldLabel, Query, Resolution, classify_entry, extract_identifiers,
};
pub use latex::extract_citations;
pub use node::{Node, NodeKind, NodeSet};
