//! Located citation and entry keys.
//!
//! A [`Node`] is compared and hashed by its key alone. Two occurrences of the
//! same key with different spans or kinds are the same node, and a
//! [`NodeSet`] keeps whichever occurrence was inserted first. The retained
//! span is the one later used to slice the source text, so this is part of
//! the contract, not an accident of the container.

use std::hash::{Hash, Hasher};
use std::ops::Range;

use indexmap::IndexMap;
use indexmap::map::{Entry, IntoValues, Values};

/// Where a node was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A key inside a `\cite{...}` invocation.
    Citation,
    /// A `@type{key,` entry in the bibliography.
    Entry,
}

/// A located occurrence of a citation key or entry key.
#[derive(Debug, Clone)]
pub struct Node {
    /// Byte offsets into the owning text buffer.
    pub span: Range<usize>,
    /// Citation or bibliography entry.
    pub kind: NodeKind,
    /// Bare key, trimmed of surrounding whitespace.
    pub key: String,
}

impl Node {
    #[must_use]
    pub fn new(span: Range<usize>, kind: NodeKind, key: impl AsRef<str>) -> Self {
        Self {
            span,
            kind,
            key: key.as_ref().trim().to_string(),
        }
    }

    /// Slices this node's span out of `text`.
    ///
    /// Returns an empty string if the span does not fit `text`, which only
    /// happens when the node was built against a different buffer.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.span.clone()).unwrap_or_default()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Insertion-ordered set of nodes, deduplicated by key (first wins).
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: IndexMap<String, Node>,
}

impl NodeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` unless a node with the same key is already present.
    ///
    /// Returns `true` if the node was added.
    pub fn insert(&mut self, node: Node) -> bool {
        match self.nodes.entry(node.key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    #[must_use]
    pub fn contains(&self, node: &Node) -> bool {
        self.contains_key(&node.key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> Values<'_, String, Node> {
        self.nodes.values()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Node> {
        self.nodes.into_values().collect()
    }
}

impl FromIterator<Node> for NodeSet {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut set = Self::new();
        for node in iter {
            set.insert(node);
        }
        set
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = Values<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for NodeSet {
    type Item = Node;
    type IntoIter = IntoValues<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_values()
    }
}
