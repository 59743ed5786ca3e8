use std::fmt;
use std::sync::{Arc, LazyLock, RwLock};

use crate::{KdlNode, KdlParseError, KdlValue, KdlishValue, NodeKey, ParseFragment, ValueKey};

/// A conversion hook consulted for tagged values during a parse.
///
/// Hooks run in registration order; the first whose key matches gets to
/// answer. Returning `Ok(Some(..))` replaces the value and stops the
/// chain, `Ok(None)` means "not applicable, keep going", and `Err`
/// aborts the parse.
pub type ValueConverter = Arc<
    dyn Fn(&KdlValue, &ParseFragment<'_>) -> Result<Option<KdlishValue>, KdlParseError>
        + Send
        + Sync,
>;

/// A conversion hook consulted for each fully-assembled node, with the
/// same ordering and "not applicable" semantics as [`ValueConverter`].
pub type NodeConverter = Arc<
    dyn Fn(&KdlNode, &ParseFragment<'_>) -> Result<Option<KdlNode>, KdlParseError> + Send + Sync,
>;

/// Configuration for a parse.
#[derive(Clone)]
pub struct ParseConfig {
    /// Unwrap untagged values into their host-native equivalents
    /// ([`crate::KdlNative`]) instead of keeping the literal variants.
    pub native_untagged_values: bool,
    /// Apply the built-in reserved-tag table (`(u8)`, `(date)`,
    /// `(base64)`, …) to tagged values no user converter claimed.
    pub native_tagged_values: bool,
    /// User hooks for tagged values, consulted in order.
    pub value_converters: Vec<(ValueKey, ValueConverter)>,
    /// User hooks for nodes, consulted in order.
    pub node_converters: Vec<(NodeKey, NodeConverter)>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            native_untagged_values: true,
            native_tagged_values: true,
            value_converters: Vec::new(),
            node_converters: Vec::new(),
        }
    }
}

impl fmt::Debug for ParseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseConfig")
            .field("native_untagged_values", &self.native_untagged_values)
            .field("native_tagged_values", &self.native_tagged_values)
            .field("value_converters", &self.value_converters.len())
            .field("node_converters", &self.node_converters.len())
            .finish()
    }
}

static PARSE_DEFAULTS: LazyLock<RwLock<ParseConfig>> =
    LazyLock::new(|| RwLock::new(ParseConfig::default()));

impl ParseConfig {
    /// A configuration that performs no native conversion at all: every
    /// value comes back as its literal [`KdlValue`] variant. This is
    /// what a pure reformatter wants.
    pub fn raw() -> Self {
        ParseConfig {
            native_untagged_values: false,
            native_tagged_values: false,
            ..Default::default()
        }
    }

    /// Registers a value conversion hook for values matching `key`.
    pub fn add_value_converter(
        &mut self,
        key: impl Into<ValueKey>,
        converter: impl Fn(&KdlValue, &ParseFragment<'_>) -> Result<Option<KdlishValue>, KdlParseError>
            + Send
            + Sync
            + 'static,
    ) {
        self.value_converters.push((key.into(), Arc::new(converter)));
    }

    /// Registers a node conversion hook for nodes matching `key`.
    pub fn add_node_converter(
        &mut self,
        key: impl Into<NodeKey>,
        converter: impl Fn(&KdlNode, &ParseFragment<'_>) -> Result<Option<KdlNode>, KdlParseError>
            + Send
            + Sync
            + 'static,
    ) {
        self.node_converters.push((key.into(), Arc::new(converter)));
    }

    /// Returns a snapshot of the process-wide default parse
    /// configuration, used whenever no explicit config is passed.
    pub fn global() -> ParseConfig {
        PARSE_DEFAULTS
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replaces the process-wide default parse configuration. Treat this
    /// as read-mostly state: the library reads it once at the start of
    /// each parse and takes no lock afterwards.
    pub fn set_global(config: ParseConfig) {
        *PARSE_DEFAULTS.write().unwrap_or_else(|e| e.into_inner()) = config;
    }
}

/// Configuration for printing a document back out as KDL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintConfig {
    /// One level of indentation (a tab by default).
    pub indent: String,
    /// End every node with `;` before its newline.
    pub semicolons: bool,
    /// Emit null arguments. When false they are omitted entirely.
    pub print_null_args: bool,
    /// Emit null-valued properties. When false they are omitted.
    pub print_null_props: bool,
    /// Keep the radix a number was written in (`0x1a` stays `0x1a`);
    /// otherwise everything prints in decimal.
    pub respect_radix: bool,
    /// Keep raw strings raw; otherwise they print as escaped strings.
    pub respect_string_type: bool,
    /// Which character (`'e'` or `'E'`) marks an exponent.
    pub exponent: char,
    /// Emit properties in key order instead of insertion order.
    pub sort_properties: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            indent: "\t".into(),
            semicolons: false,
            print_null_args: true,
            print_null_props: true,
            respect_radix: true,
            respect_string_type: true,
            exponent: 'e',
            sort_properties: false,
        }
    }
}

static PRINT_DEFAULTS: LazyLock<RwLock<PrintConfig>> =
    LazyLock::new(|| RwLock::new(PrintConfig::default()));

impl PrintConfig {
    /// Returns a snapshot of the process-wide default print
    /// configuration.
    pub fn global() -> PrintConfig {
        PRINT_DEFAULTS
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replaces the process-wide default print configuration.
    pub fn set_global(config: PrintConfig) {
        *PRINT_DEFAULTS.write().unwrap_or_else(|e| e.into_inner()) = config;
    }
}
