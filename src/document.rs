use std::fmt::Display;
use std::ops::Index;
use std::str::FromStr;

use crate::{KdlNode, KdlParseError, NodeKey, PrintConfig};

/// Represents a KDL
/// [`Document`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#document):
/// an ordered sequence of nodes, plus an optional [`PrintConfig`] that
/// travels with the document.
///
/// # Examples
///
/// The easiest way to create a `KdlDocument` is to parse it:
/// ```rust
/// # use kdl_canon::KdlDocument;
/// let doc: KdlDocument = "foo 1 2 3\nbar 4 5 6".parse().expect("parse failed");
/// assert_eq!(doc.nodes().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KdlDocument {
    pub(crate) nodes: Vec<KdlNode>,
    pub(crate) print_config: Option<PrintConfig>,
}

impl KdlDocument {
    /// Creates a new, empty document.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns a reference to this document's nodes.
    pub fn nodes(&self) -> &[KdlNode] {
        &self.nodes
    }

    /// Returns a mutable reference to this document's nodes.
    pub fn nodes_mut(&mut self) -> &mut Vec<KdlNode> {
        &mut self.nodes
    }

    /// Gets the print configuration attached to this document, if any.
    pub fn print_config(&self) -> Option<&PrintConfig> {
        self.print_config.as_ref()
    }

    /// Attaches a print configuration that [`KdlDocument::print`] and
    /// `Display` will use by default.
    pub fn set_print_config(&mut self, config: PrintConfig) {
        self.print_config = Some(config);
    }

    /// Gets the first node matching `key`.
    pub fn get(&self, key: impl Into<NodeKey>) -> Option<&KdlNode> {
        let key = key.into();
        self.nodes.iter().find(|node| node.matches_key(&key))
    }

    /// Gets a mutable reference to the first node matching `key`.
    pub fn get_mut(&mut self, key: impl Into<NodeKey>) -> Option<&mut KdlNode> {
        let key = key.into();
        self.nodes.iter_mut().find(|node| node.matches_key(&key))
    }

    /// Iterates over all nodes matching `key`.
    pub fn get_all(&self, key: impl Into<NodeKey>) -> impl Iterator<Item = &KdlNode> {
        let key = key.into();
        self.nodes.iter().filter(move |node| node.matches_key(&key))
    }

    /// Serializes this document using the attached print configuration,
    /// or the process-wide default when none is attached. An empty
    /// document produces empty output.
    pub fn print(&self) -> String {
        match &self.print_config {
            Some(config) => self.print_with(config),
            None => self.print_with(&PrintConfig::global()),
        }
    }

    /// Serializes this document under an explicit configuration.
    pub fn print_with(&self, config: &PrintConfig) -> String {
        let mut s = String::new();
        for node in &self.nodes {
            s.push_str(&node.print_indented(config, 0));
        }
        s
    }
}

impl FromStr for KdlDocument {
    type Err = KdlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s, None)
    }
}

impl Display for KdlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print())
    }
}

impl Index<&str> for KdlDocument {
    type Output = KdlNode;

    fn index(&self, name: &str) -> &KdlNode {
        self.get(name)
            .unwrap_or_else(|| panic!("no node named {name:?} in document"))
    }
}
