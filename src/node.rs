use std::fmt::Display;
use std::ops::Index;

use indexmap::IndexMap;

use crate::lex::print_ident;
use crate::{KdlishValue, NodeKey, PrintConfig, ToKdl, ValueKey};

/// Represents an individual KDL
/// [`Node`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#node): a
/// name, an optional tag, ordered arguments, ordered properties, and
/// child nodes.
///
/// Properties keep *last-wins* semantics: assigning an existing key
/// replaces its value in place, so the property stays at the position
/// of its first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct KdlNode {
    pub(crate) tag: Option<String>,
    pub(crate) name: String,
    pub(crate) args: Vec<KdlishValue>,
    pub(crate) props: IndexMap<String, KdlishValue>,
    pub(crate) children: Vec<KdlNode>,
}

impl KdlNode {
    /// Creates a new node with the given name and nothing else.
    pub fn new(name: impl Into<String>) -> Self {
        KdlNode {
            tag: None,
            name: name.into(),
            args: Vec::new(),
            props: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Gets this node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets this node's name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Gets this node's tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Sets this node's tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    /// Removes this node's tag.
    pub fn clear_tag(&mut self) {
        self.tag = None;
    }

    /// Returns a reference to this node's arguments.
    pub fn args(&self) -> &[KdlishValue] {
        &self.args
    }

    /// Returns a mutable reference to this node's arguments.
    pub fn args_mut(&mut self) -> &mut Vec<KdlishValue> {
        &mut self.args
    }

    /// Returns a reference to this node's properties.
    pub fn props(&self) -> &IndexMap<String, KdlishValue> {
        &self.props
    }

    /// Returns a mutable reference to this node's properties.
    pub fn props_mut(&mut self) -> &mut IndexMap<String, KdlishValue> {
        &mut self.props
    }

    /// Returns a reference to this node's children.
    pub fn children(&self) -> &[KdlNode] {
        &self.children
    }

    /// Returns a mutable reference to this node's children.
    pub fn children_mut(&mut self) -> &mut Vec<KdlNode> {
        &mut self.children
    }

    /// Appends an argument.
    pub fn push(&mut self, arg: impl ToKdl) {
        self.args.push(arg.to_kdl());
    }

    /// Sets a property, replacing (in place) any previous value for the
    /// same key and returning it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToKdl) -> Option<KdlishValue> {
        self.props.insert(key.into(), value.to_kdl())
    }

    /// Gets the first child node matching `key`.
    pub fn get(&self, key: impl Into<NodeKey>) -> Option<&KdlNode> {
        let key = key.into();
        self.children.iter().find(|node| node.matches_key(&key))
    }

    /// Gets a mutable reference to the first child node matching `key`.
    pub fn get_mut(&mut self, key: impl Into<NodeKey>) -> Option<&mut KdlNode> {
        let key = key.into();
        self.children.iter_mut().find(|node| node.matches_key(&key))
    }

    /// Iterates over all child nodes matching `key`.
    pub fn get_all(&self, key: impl Into<NodeKey>) -> impl Iterator<Item = &KdlNode> {
        let key = key.into();
        self.children.iter().filter(move |node| node.matches_key(&key))
    }

    /// Iterates over the arguments matching `key`.
    pub fn get_args(&self, key: impl Into<ValueKey>) -> impl Iterator<Item = &KdlishValue> {
        let key = key.into();
        self.args.iter().filter(move |value| key.matches(value))
    }

    /// Iterates over the `(name, value)` property pairs whose values
    /// match `key`, in property order.
    pub fn get_props(&self, key: impl Into<ValueKey>) -> impl Iterator<Item = (&str, &KdlishValue)> {
        let key = key.into();
        self.props
            .iter()
            .filter(move |(_, value)| key.matches(value))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Whether this node's tag and name match `key`.
    pub fn matches_key(&self, key: &NodeKey) -> bool {
        key.matches(self.tag(), &self.name)
    }

    /// Serializes this node (and its children) under `config`.
    pub fn print(&self, config: &PrintConfig) -> String {
        self.print_indented(config, 0)
    }

    pub(crate) fn print_indented(&self, config: &PrintConfig, depth: usize) -> String {
        let mut s = config.indent.repeat(depth);
        if let Some(tag) = &self.tag {
            s.push('(');
            s.push_str(&print_ident(tag));
            s.push(')');
        }
        s.push_str(&print_ident(&self.name));

        for arg in &self.args {
            if !config.print_null_args && arg.is_null() {
                continue;
            }
            s.push(' ');
            s.push_str(&arg.print(config));
        }

        let props: Vec<(&String, &KdlishValue)> = if config.sort_properties {
            let mut props: Vec<_> = self.props.iter().collect();
            props.sort_by(|(a, _), (b, _)| a.cmp(b));
            props
        } else {
            self.props.iter().collect()
        };
        for (key, value) in props {
            if !config.print_null_props && value.is_null() {
                continue;
            }
            s.push(' ');
            s.push_str(&print_ident(key));
            s.push('=');
            s.push_str(&value.print(config));
        }

        if !self.children.is_empty() {
            s.push_str(" {\n");
            for child in &self.children {
                s.push_str(&child.print_indented(config, depth + 1));
            }
            s.push_str(&config.indent.repeat(depth));
            s.push('}');
        }
        if config.semicolons {
            s.push(';');
        }
        s.push('\n');
        s
    }
}

impl Display for KdlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print(&PrintConfig::global()))
    }
}

impl Index<usize> for KdlNode {
    type Output = KdlishValue;

    fn index(&self, index: usize) -> &KdlishValue {
        &self.args[index]
    }
}

impl Index<&str> for KdlNode {
    type Output = KdlishValue;

    fn index(&self, key: &str) -> &KdlishValue {
        self.props
            .get(key)
            .unwrap_or_else(|| panic!("no property {key:?} on node {:?}", self.name))
    }
}
