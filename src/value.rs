use std::fmt::Display;

use crate::lex::{escape_string, print_ident, required_hashes};
use crate::{PrintConfig, ValueKey};

/// A KDL value: one of the literal shapes of
/// [`KdlLiteral`], plus an optional tag annotation.
///
/// ```rust
/// use kdl_canon::KdlValue;
///
/// let plain = KdlValue::new("hello");
/// assert_eq!(plain.to_string(), r#""hello""#);
///
/// let tagged = KdlValue::tagged("date", "2021-02-03");
/// assert_eq!(tagged.to_string(), r#"(date)"2021-02-03""#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KdlValue {
    pub(crate) tag: Option<String>,
    pub(crate) literal: KdlLiteral,
}

impl KdlValue {
    /// Creates a new untagged value.
    pub fn new(literal: impl Into<KdlLiteral>) -> Self {
        KdlValue {
            tag: None,
            literal: literal.into(),
        }
    }

    /// Creates a new tagged value.
    pub fn tagged(tag: impl Into<String>, literal: impl Into<KdlLiteral>) -> Self {
        KdlValue {
            tag: Some(tag.into()),
            literal: literal.into(),
        }
    }

    /// Gets this value's tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Sets this value's tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    /// Removes this value's tag.
    pub fn clear_tag(&mut self) {
        self.tag = None;
    }

    /// Gets a reference to the literal payload.
    pub fn literal(&self) -> &KdlLiteral {
        &self.literal
    }

    /// Gets a mutable reference to the literal payload.
    pub fn literal_mut(&mut self) -> &mut KdlLiteral {
        &mut self.literal
    }

    /// Consumes the value, returning the literal payload.
    pub fn into_literal(self) -> KdlLiteral {
        self.literal
    }

    /// Whether this value matches the given key.
    pub fn matches_key(&self, key: impl Into<ValueKey>) -> bool {
        key.into().matches_value(self)
    }

    /// Serializes this value under `config`.
    pub fn print(&self, config: &PrintConfig) -> String {
        match &self.tag {
            Some(tag) => format!("({}){}", print_ident(tag), self.literal.print(config)),
            None => self.literal.print(config),
        }
    }
}

impl Display for KdlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print(&PrintConfig::global()))
    }
}

impl<T: Into<KdlLiteral>> From<T> for KdlValue {
    fn from(value: T) -> Self {
        KdlValue::new(value)
    }
}

/// The literal shapes a [`KdlValue`] can take.
#[derive(Debug, Clone)]
pub enum KdlLiteral {
    /// An escaped string (`"…"`).
    String(String),
    /// A raw string (`r#"…"#`), remembering the hash count it was
    /// written with.
    RawString {
        /// The string's contents.
        value: String,
        /// How many hashes surrounded it in the source. Printing uses
        /// the minimum count that works, not this.
        hashes: usize,
    },
    /// A base-10 number: a mantissa and a power-of-ten exponent, so
    /// scientific notation survives a round-trip.
    Decimal {
        /// The digits before the exponent marker.
        mantissa: KdlMantissa,
        /// The power of ten (zero for plain numbers).
        exponent: i64,
    },
    /// A hexadecimal integer (`0x…`).
    Hex(i128),
    /// An octal integer (`0o…`).
    Octal(i128),
    /// A binary integer (`0b…`).
    Binary(i128),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// Pre-formatted KDL text, emitted verbatim. Never produced by the
    /// parser; an escape hatch for [`crate::ToKdl`] implementations
    /// that need bit-exact output. The text must be a valid KDL value.
    Exact(String),
}

/// The digits of a [`KdlLiteral::Decimal`]: an exact integer when the
/// source had no fractional part, a float otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KdlMantissa {
    /// A whole mantissa.
    Integer(i128),
    /// A fractional mantissa.
    Float(f64),
}

impl KdlMantissa {
    /// This mantissa as a float.
    pub fn as_f64(&self) -> f64 {
        match self {
            KdlMantissa::Integer(v) => *v as f64,
            KdlMantissa::Float(v) => *v,
        }
    }
}

/// Discriminant names for [`KdlLiteral`], used by [`crate::TypeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum KdlLiteralKind {
    String,
    RawString,
    Decimal,
    Hex,
    Octal,
    Binary,
    Bool,
    Null,
    Exact,
}

impl PartialEq for KdlLiteral {
    fn eq(&self, other: &Self) -> bool {
        use KdlLiteral::*;
        match (self, other) {
            (String(a), String(b)) => a == b,
            // Intentionally omitted: the hash counts. The printer picks
            // the minimum anyway, so they carry no meaning.
            (RawString { value: a, .. }, RawString { value: b, .. }) => a == b,
            (
                Decimal {
                    mantissa: m1,
                    exponent: e1,
                },
                Decimal {
                    mantissa: m2,
                    exponent: e2,
                },
            ) => m1 == m2 && e1 == e2,
            (Hex(a), Hex(b)) => a == b,
            (Octal(a), Octal(b)) => a == b,
            (Binary(a), Binary(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Null, Null) => true,
            (Exact(a), Exact(b)) => a == b,
            _ => false,
        }
    }
}

impl KdlLiteral {
    /// Which variant this is.
    pub fn kind(&self) -> KdlLiteralKind {
        match self {
            KdlLiteral::String(_) => KdlLiteralKind::String,
            KdlLiteral::RawString { .. } => KdlLiteralKind::RawString,
            KdlLiteral::Decimal { .. } => KdlLiteralKind::Decimal,
            KdlLiteral::Hex(_) => KdlLiteralKind::Hex,
            KdlLiteral::Octal(_) => KdlLiteralKind::Octal,
            KdlLiteral::Binary(_) => KdlLiteralKind::Binary,
            KdlLiteral::Bool(_) => KdlLiteralKind::Bool,
            KdlLiteral::Null => KdlLiteralKind::Null,
            KdlLiteral::Exact(_) => KdlLiteralKind::Exact,
        }
    }

    /// Returns the text of either string shape, or `None` for anything
    /// else.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            KdlLiteral::String(v) | KdlLiteral::RawString { value: v, .. } => Some(v),
            _ => None,
        }
    }

    /// Whether this is one of the four numeric shapes.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            KdlLiteral::Decimal { .. }
                | KdlLiteral::Hex(_)
                | KdlLiteral::Octal(_)
                | KdlLiteral::Binary(_)
        )
    }

    /// The exact integer value of this literal, when it has one: radix
    /// integers always do, decimals only with a whole mantissa and a
    /// non-negative exponent that doesn't overflow.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            KdlLiteral::Hex(v) | KdlLiteral::Octal(v) | KdlLiteral::Binary(v) => Some(*v),
            KdlLiteral::Decimal {
                mantissa: KdlMantissa::Integer(m),
                exponent,
            } if *exponent >= 0 => {
                let scale = 10i128.checked_pow(u32::try_from(*exponent).ok()?)?;
                m.checked_mul(scale)
            }
            _ => None,
        }
    }

    /// The numeric value of this literal as a float, or `None` for the
    /// non-numeric shapes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KdlLiteral::Decimal { mantissa, exponent } => {
                Some(mantissa.as_f64() * 10f64.powi(*exponent as i32))
            }
            KdlLiteral::Hex(v) | KdlLiteral::Octal(v) | KdlLiteral::Binary(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Whether this literal is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, KdlLiteral::Null)
    }

    /// Serializes this literal under `config`.
    pub fn print(&self, config: &PrintConfig) -> String {
        match self {
            KdlLiteral::String(value) => format!("\"{}\"", escape_string(value)),
            KdlLiteral::RawString { value, .. } => {
                if config.respect_string_type {
                    let hashes = "#".repeat(required_hashes(value));
                    format!("r{hashes}\"{value}\"{hashes}")
                } else {
                    format!("\"{}\"", escape_string(value))
                }
            }
            KdlLiteral::Decimal { mantissa, exponent } => {
                let digits = match mantissa {
                    KdlMantissa::Integer(m) => m.to_string(),
                    KdlMantissa::Float(m) => {
                        let repr = format!("{:?}", m);
                        if *exponent != 0 && repr.contains(['e', 'E']) {
                            // An extreme float already carries its own
                            // exponent; fold ours in to keep the output
                            // a single valid number.
                            return format!("{:?}", m * 10f64.powi(*exponent as i32));
                        }
                        repr
                    }
                };
                let mut s = digits;
                if *exponent != 0 {
                    s.push(config.exponent);
                    if *exponent > 0 {
                        s.push('+');
                    }
                    s.push_str(&exponent.to_string());
                }
                s
            }
            KdlLiteral::Hex(value) => radix_number(config, *value, "0x", |v| format!("{v:x}")),
            KdlLiteral::Octal(value) => radix_number(config, *value, "0o", |v| format!("{v:o}")),
            KdlLiteral::Binary(value) => radix_number(config, *value, "0b", |v| format!("{v:b}")),
            KdlLiteral::Bool(value) => if *value { "true" } else { "false" }.into(),
            KdlLiteral::Null => "null".into(),
            KdlLiteral::Exact(chars) => chars.clone(),
        }
    }
}

fn radix_number(
    config: &PrintConfig,
    value: i128,
    prefix: &str,
    digits: impl Fn(u128) -> String,
) -> String {
    if !config.respect_radix {
        value.to_string()
    } else if value < 0 {
        format!("-{prefix}{}", digits(value.unsigned_abs()))
    } else {
        format!("{prefix}{}", digits(value as u128))
    }
}

impl Display for KdlLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print(&PrintConfig::global()))
    }
}

impl From<i128> for KdlLiteral {
    fn from(value: i128) -> Self {
        KdlLiteral::Decimal {
            mantissa: KdlMantissa::Integer(value),
            exponent: 0,
        }
    }
}

impl From<f64> for KdlLiteral {
    fn from(value: f64) -> Self {
        KdlLiteral::Decimal {
            mantissa: KdlMantissa::Float(value),
            exponent: 0,
        }
    }
}

impl From<&str> for KdlLiteral {
    fn from(value: &str) -> Self {
        KdlLiteral::String(value.to_string())
    }
}

impl From<String> for KdlLiteral {
    fn from(value: String) -> Self {
        KdlLiteral::String(value)
    }
}

impl From<bool> for KdlLiteral {
    fn from(value: bool) -> Self {
        KdlLiteral::Bool(value)
    }
}

impl<T> From<Option<T>> for KdlLiteral
where
    T: Into<KdlLiteral>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => KdlLiteral::Null,
        }
    }
}
