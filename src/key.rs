//! The matcher DSL used by the lookup helpers and the converter tables.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::{KdlLiteralKind, KdlNativeKind, KdlValue, KdlishValue};

/// Matches a single name or tag string.
#[derive(Clone)]
pub enum StringMatcher {
    /// Wildcard: matches anything, present or absent.
    Any,
    /// Matches only absence. As a *name* matcher it auto-succeeds
    /// instead, since node names are mandatory.
    Missing,
    /// Matches exactly this string.
    Exact(String),
    /// Matches when the pattern matches from the start of the subject.
    Regex(Regex),
    /// Matches when the predicate returns true. The predicate receives
    /// `None` for an absent subject.
    Predicate(Arc<dyn Fn(Option<&str>) -> bool + Send + Sync>),
}

impl StringMatcher {
    /// Wraps a predicate function as a matcher.
    pub fn predicate(f: impl Fn(Option<&str>) -> bool + Send + Sync + 'static) -> Self {
        StringMatcher::Predicate(Arc::new(f))
    }

    /// Whether this matcher accepts `subject`.
    pub fn matches(&self, subject: Option<&str>) -> bool {
        match self {
            StringMatcher::Any => true,
            StringMatcher::Missing => subject.is_none(),
            StringMatcher::Exact(want) => subject == Some(want.as_str()),
            StringMatcher::Regex(pattern) => subject
                .and_then(|s| pattern.find(s))
                .is_some_and(|m| m.start() == 0),
            StringMatcher::Predicate(f) => f(subject),
        }
    }

    /// Name-position semantics: `Missing` auto-succeeds because every
    /// node has a name.
    pub(crate) fn matches_name(&self, name: &str) -> bool {
        match self {
            StringMatcher::Missing => true,
            other => other.matches(Some(name)),
        }
    }
}

impl fmt::Debug for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringMatcher::Any => write!(f, "Any"),
            StringMatcher::Missing => write!(f, "Missing"),
            StringMatcher::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            StringMatcher::Regex(r) => f.debug_tuple("Regex").field(&r.as_str()).finish(),
            StringMatcher::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl From<&str> for StringMatcher {
    fn from(value: &str) -> Self {
        StringMatcher::Exact(value.into())
    }
}

impl From<String> for StringMatcher {
    fn from(value: String) -> Self {
        StringMatcher::Exact(value)
    }
}

impl From<Regex> for StringMatcher {
    fn from(value: Regex) -> Self {
        StringMatcher::Regex(value)
    }
}

impl From<Option<&str>> for StringMatcher {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => StringMatcher::Exact(s.into()),
            None => StringMatcher::Missing,
        }
    }
}

/// Selects nodes by name, or by tag and name together.
#[derive(Debug, Clone)]
pub enum NodeKey {
    /// Match on the node name alone.
    Name(StringMatcher),
    /// Match on the tag and the name.
    TagAndName(StringMatcher, StringMatcher),
}

impl NodeKey {
    /// Whether a node with this `tag` and `name` matches.
    pub fn matches(&self, tag: Option<&str>, name: &str) -> bool {
        match self {
            NodeKey::Name(name_key) => name_key.matches_name(name),
            NodeKey::TagAndName(tag_key, name_key) => {
                tag_key.matches(tag) && name_key.matches_name(name)
            }
        }
    }
}

impl<T: Into<StringMatcher>> From<T> for NodeKey {
    fn from(value: T) -> Self {
        NodeKey::Name(value.into())
    }
}

impl<T: Into<StringMatcher>, N: Into<StringMatcher>> From<(T, N)> for NodeKey {
    fn from((tag, name): (T, N)) -> Self {
        NodeKey::TagAndName(tag.into(), name.into())
    }
}

/// Selects values by shape: any value, a specific literal variant, or a
/// specific native variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKey {
    /// Wildcard: any value shape.
    Any,
    /// A specific [`crate::KdlLiteral`] variant.
    Literal(KdlLiteralKind),
    /// A specific [`crate::KdlNative`] variant.
    Native(KdlNativeKind),
}

impl TypeKey {
    /// Whether `value` has the selected shape.
    pub fn matches(&self, value: &KdlishValue) -> bool {
        match (self, value) {
            (TypeKey::Any, _) => true,
            (TypeKey::Literal(kind), KdlishValue::Value(v)) => v.literal().kind() == *kind,
            (TypeKey::Literal(_), KdlishValue::Native(_)) => false,
            (TypeKey::Native(kind), KdlishValue::Native(n)) => n.kind() == *kind,
            (TypeKey::Native(_), KdlishValue::Value(_)) => false,
        }
    }

    pub(crate) fn matches_literal(&self, value: &KdlValue) -> bool {
        match self {
            TypeKey::Any => true,
            TypeKey::Literal(kind) => value.literal().kind() == *kind,
            TypeKey::Native(_) => false,
        }
    }
}

impl From<KdlLiteralKind> for TypeKey {
    fn from(value: KdlLiteralKind) -> Self {
        TypeKey::Literal(value)
    }
}

impl From<KdlNativeKind> for TypeKey {
    fn from(value: KdlNativeKind) -> Self {
        TypeKey::Native(value)
    }
}

/// Selects values by tag, or by tag and shape together.
#[derive(Debug, Clone)]
pub enum ValueKey {
    /// Match on the tag alone.
    Tag(StringMatcher),
    /// Match on the tag and the value's shape.
    TagAndType(StringMatcher, TypeKey),
}

impl ValueKey {
    /// Whether `value` matches this key.
    pub fn matches(&self, value: &KdlishValue) -> bool {
        match self {
            ValueKey::Tag(tag_key) => tag_key.matches(value.tag()),
            ValueKey::TagAndType(tag_key, type_key) => {
                tag_key.matches(value.tag()) && type_key.matches(value)
            }
        }
    }

    pub(crate) fn matches_value(&self, value: &KdlValue) -> bool {
        match self {
            ValueKey::Tag(tag_key) => tag_key.matches(value.tag()),
            ValueKey::TagAndType(tag_key, type_key) => {
                tag_key.matches(value.tag()) && type_key.matches_literal(value)
            }
        }
    }
}

impl<T: Into<StringMatcher>> From<T> for ValueKey {
    fn from(value: T) -> Self {
        ValueKey::Tag(value.into())
    }
}

impl<T: Into<StringMatcher>, K: Into<TypeKey>> From<(T, K)> for ValueKey {
    fn from((tag, type_key): (T, K)) -> Self {
        ValueKey::TagAndType(tag.into(), type_key.into())
    }
}
