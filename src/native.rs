//! Host-native values and the adapter seam between them and the KDL
//! literal shapes.

use std::fmt::Display;
use std::net::{Ipv4Addr, Ipv6Addr};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::{KdlLiteral, KdlMantissa, KdlValue, PrintConfig, ValueKey};

/// An ISO-8601 date-time, with or without a UTC offset.
#[derive(Debug, Clone, PartialEq)]
pub enum KdlDateTime {
    /// A date-time carrying an offset (`2021-02-03T04:05:06+01:00`).
    Zoned(DateTime<FixedOffset>),
    /// A local date-time with no offset (`2021-02-03T04:05:06`).
    Local(NaiveDateTime),
}

impl Display for KdlDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KdlDateTime::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            KdlDateTime::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// A value that has been converted out of its KDL literal shape into a
/// host-native type, either by the untagged unwrapping or by the
/// reserved-tag table.
#[derive(Debug, Clone)]
pub enum KdlNative {
    /// Plain text from either string shape.
    String(String),
    /// A whole number.
    Integer(i128),
    /// A fractional number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// Null.
    Null,
    /// An arbitrary-precision decimal, from `(decimal)`.
    Decimal(BigDecimal),
    /// A date-time, from `(date-time)`.
    DateTime(KdlDateTime),
    /// A calendar date, from `(date)`.
    Date(NaiveDate),
    /// A wall-clock time, from `(time)`.
    Time(NaiveTime),
    /// An IPv4 address, from `(ipv4)`.
    Ipv4(Ipv4Addr),
    /// An IPv6 address, from `(ipv6)`.
    Ipv6(Ipv6Addr),
    /// A parsed URL, from `(url)`.
    Url(Url),
    /// A UUID, from `(uuid)`.
    Uuid(Uuid),
    /// A compiled regular expression, from `(regex)`.
    Regex(Regex),
    /// Decoded bytes, from `(base64)`.
    Bytes(Vec<u8>),
}

impl PartialEq for KdlNative {
    fn eq(&self, other: &Self) -> bool {
        use KdlNative::*;
        match (self, other) {
            (String(a), String(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Null, Null) => true,
            (Decimal(a), Decimal(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (Ipv4(a), Ipv4(b)) => a == b,
            (Ipv6(a), Ipv6(b)) => a == b,
            (Url(a), Url(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            // Compiled regexes compare by their pattern text.
            (Regex(a), Regex(b)) => a.as_str() == b.as_str(),
            (Bytes(a), Bytes(b)) => a == b,
            _ => false,
        }
    }
}

/// Discriminant names for [`KdlNative`], used by [`crate::TypeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum KdlNativeKind {
    String,
    Integer,
    Float,
    Bool,
    Null,
    Decimal,
    DateTime,
    Date,
    Time,
    Ipv4,
    Ipv6,
    Url,
    Uuid,
    Regex,
    Bytes,
}

impl KdlNative {
    /// Which variant this is.
    pub fn kind(&self) -> KdlNativeKind {
        match self {
            KdlNative::String(_) => KdlNativeKind::String,
            KdlNative::Integer(_) => KdlNativeKind::Integer,
            KdlNative::Float(_) => KdlNativeKind::Float,
            KdlNative::Bool(_) => KdlNativeKind::Bool,
            KdlNative::Null => KdlNativeKind::Null,
            KdlNative::Decimal(_) => KdlNativeKind::Decimal,
            KdlNative::DateTime(_) => KdlNativeKind::DateTime,
            KdlNative::Date(_) => KdlNativeKind::Date,
            KdlNative::Time(_) => KdlNativeKind::Time,
            KdlNative::Ipv4(_) => KdlNativeKind::Ipv4,
            KdlNative::Ipv6(_) => KdlNativeKind::Ipv6,
            KdlNative::Url(_) => KdlNativeKind::Url,
            KdlNative::Uuid(_) => KdlNativeKind::Uuid,
            KdlNative::Regex(_) => KdlNativeKind::Regex,
            KdlNative::Bytes(_) => KdlNativeKind::Bytes,
        }
    }

    /// Maps this native back to the tagged [`KdlValue`] it serializes
    /// as: `(decimal)"…"`, `(date)"…"`, `(regex)r"…"`, `(base64)"…"`,
    /// and so on. Plain natives map to untagged literals.
    pub fn to_value(&self) -> KdlValue {
        match self {
            KdlNative::String(v) => KdlValue::new(v.as_str()),
            KdlNative::Integer(v) => KdlValue::new(*v),
            KdlNative::Float(v) => KdlValue::new(*v),
            KdlNative::Bool(v) => KdlValue::new(*v),
            KdlNative::Null => KdlValue::new(KdlLiteral::Null),
            KdlNative::Decimal(v) => KdlValue::tagged("decimal", v.to_string()),
            KdlNative::DateTime(v) => KdlValue::tagged("date-time", v.to_string()),
            KdlNative::Date(v) => KdlValue::tagged("date", v.to_string()),
            KdlNative::Time(v) => KdlValue::tagged("time", v.to_string()),
            KdlNative::Ipv4(v) => KdlValue::tagged("ipv4", v.to_string()),
            KdlNative::Ipv6(v) => KdlValue::tagged("ipv6", v.to_string()),
            KdlNative::Url(v) => KdlValue::tagged("url", v.as_str()),
            KdlNative::Uuid(v) => KdlValue::tagged("uuid", v.to_string()),
            KdlNative::Regex(v) => KdlValue::tagged(
                "regex",
                KdlLiteral::RawString {
                    value: v.as_str().into(),
                    hashes: 0,
                },
            ),
            KdlNative::Bytes(v) => KdlValue::tagged("base64", BASE64.encode(v)),
        }
    }
}

impl Display for KdlNative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value().print(&PrintConfig::global()))
    }
}

/// Either shape a node argument or property can hold: a KDL value, or
/// a host-native value produced by the conversion layer.
#[derive(Debug, Clone, PartialEq)]
pub enum KdlishValue {
    /// A literal KDL value, possibly tagged.
    Value(KdlValue),
    /// A host-native value.
    Native(KdlNative),
}

impl KdlishValue {
    /// The value's tag, if it still has one. Natives carry none; their
    /// tag was consumed by the conversion that produced them.
    pub fn tag(&self) -> Option<&str> {
        match self {
            KdlishValue::Value(v) => v.tag(),
            KdlishValue::Native(_) => None,
        }
    }

    /// Gets the literal value, if this wasn't converted to a native.
    pub fn as_value(&self) -> Option<&KdlValue> {
        match self {
            KdlishValue::Value(v) => Some(v),
            KdlishValue::Native(_) => None,
        }
    }

    /// Gets the native value, if this was converted to one.
    pub fn as_native(&self) -> Option<&KdlNative> {
        match self {
            KdlishValue::Value(_) => None,
            KdlishValue::Native(n) => Some(n),
        }
    }

    /// Whether this is a null of either shape (suppressible by the
    /// printer's null options).
    pub fn is_null(&self) -> bool {
        match self {
            KdlishValue::Value(v) => v.literal().is_null(),
            KdlishValue::Native(n) => matches!(n, KdlNative::Null),
        }
    }

    /// Whether this value matches the given key.
    pub fn matches_key(&self, key: impl Into<ValueKey>) -> bool {
        key.into().matches(self)
    }

    /// Serializes this value under `config`.
    pub fn print(&self, config: &PrintConfig) -> String {
        match self {
            KdlishValue::Value(v) => v.print(config),
            KdlishValue::Native(n) => n.to_value().print(config),
        }
    }
}

impl Display for KdlishValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print(&PrintConfig::global()))
    }
}

impl<T: Into<KdlValue>> From<T> for KdlishValue {
    fn from(value: T) -> Self {
        KdlishValue::Value(value.into())
    }
}

impl From<KdlNative> for KdlishValue {
    fn from(value: KdlNative) -> Self {
        KdlishValue::Native(value)
    }
}

/// Unwraps an untagged literal into its host-native equivalent: plain
/// text, an integer for whole decimals and the radix shapes, a float
/// for everything else numeric.
pub(crate) fn untagged_native(literal: KdlLiteral) -> KdlNative {
    match literal {
        KdlLiteral::String(v) | KdlLiteral::RawString { value: v, .. } | KdlLiteral::Exact(v) => {
            KdlNative::String(v)
        }
        KdlLiteral::Decimal {
            mantissa: KdlMantissa::Integer(m),
            exponent: 0,
        } => KdlNative::Integer(m),
        KdlLiteral::Decimal { mantissa, exponent } => {
            KdlNative::Float(mantissa.as_f64() * 10f64.powi(exponent as i32))
        }
        KdlLiteral::Hex(v) | KdlLiteral::Octal(v) | KdlLiteral::Binary(v) => KdlNative::Integer(v),
        KdlLiteral::Bool(v) => KdlNative::Bool(v),
        KdlLiteral::Null => KdlNative::Null,
    }
}

/// Conversion into a value that can live in a KDL tree. Implement this
/// on your own types to let them be pushed into nodes (and printed);
/// return [`KdlLiteral::Exact`] when you need bit-exact output the
/// standard formatting can't produce.
pub trait ToKdl {
    /// Converts `self` into a tree value.
    fn to_kdl(&self) -> KdlishValue;
}

impl ToKdl for KdlishValue {
    fn to_kdl(&self) -> KdlishValue {
        self.clone()
    }
}

impl ToKdl for KdlValue {
    fn to_kdl(&self) -> KdlishValue {
        KdlishValue::Value(self.clone())
    }
}

impl ToKdl for KdlNative {
    fn to_kdl(&self) -> KdlishValue {
        KdlishValue::Native(self.clone())
    }
}

macro_rules! to_kdl_via_literal {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToKdl for $ty {
                fn to_kdl(&self) -> KdlishValue {
                    KdlishValue::Value(KdlValue::new(self.clone()))
                }
            }
        )+
    };
}

to_kdl_via_literal!(i128, f64, bool, String, &str);

macro_rules! to_kdl_via_native {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl ToKdl for $ty {
                fn to_kdl(&self) -> KdlishValue {
                    KdlishValue::Native(KdlNative::$variant(self.clone()))
                }
            }
        )+
    };
}

to_kdl_via_native!(
    BigDecimal => Decimal,
    KdlDateTime => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    Ipv4Addr => Ipv4,
    Ipv6Addr => Ipv6,
    Url => Url,
    Uuid => Uuid,
    Regex => Regex,
    Vec<u8> => Bytes,
);

impl ToKdl for DateTime<FixedOffset> {
    fn to_kdl(&self) -> KdlishValue {
        KdlishValue::Native(KdlNative::DateTime(KdlDateTime::Zoned(*self)))
    }
}

impl ToKdl for NaiveDateTime {
    fn to_kdl(&self) -> KdlishValue {
        KdlishValue::Native(KdlNative::DateTime(KdlDateTime::Local(*self)))
    }
}

impl ToKdl for &[u8] {
    fn to_kdl(&self) -> KdlishValue {
        KdlishValue::Native(KdlNative::Bytes(self.to_vec()))
    }
}
