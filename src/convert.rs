//! The built-in reserved-tag table, applied to tagged values when
//! `native_tagged_values` is on and no user converter claimed them.

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::{
    KdlDateTime, KdlLiteral, KdlNative, KdlParseError, KdlValue, KdlishValue, ParseFragment,
};

/// Applies the reserved-tag table to `value`. Tags that aren't in the
/// table, or that are applied to a value of the wrong shape, leave the
/// value untouched.
pub(crate) fn to_native(
    value: KdlValue,
    pf: &ParseFragment<'_>,
) -> Result<KdlishValue, KdlParseError> {
    let Some(tag) = value.tag() else {
        return Ok(KdlishValue::Value(value));
    };

    if value.literal().is_number() {
        match tag {
            "i8" => return bounded_int(&value, pf, i8::MIN as i128, i8::MAX as i128, "an i8"),
            "i16" => return bounded_int(&value, pf, i16::MIN as i128, i16::MAX as i128, "an i16"),
            "i32" => return bounded_int(&value, pf, i32::MIN as i128, i32::MAX as i128, "an i32"),
            "i64" => return bounded_int(&value, pf, i64::MIN as i128, i64::MAX as i128, "an i64"),
            "u8" => return bounded_int(&value, pf, 0, u8::MAX as i128, "a u8"),
            "u16" => return bounded_int(&value, pf, 0, u16::MAX as i128, "a u16"),
            "u32" => return bounded_int(&value, pf, 0, u32::MAX as i128, "a u32"),
            "u64" => return bounded_int(&value, pf, 0, u64::MAX as i128, "a u64"),
            "f32" | "f64" => {
                let float = value.literal().as_f64().unwrap_or_default();
                return Ok(KdlishValue::Native(KdlNative::Float(float)));
            }
            "decimal64" | "decimal128" => {
                let chars = pf.fragment().replace('_', "");
                return decimal(&chars, pf);
            }
            _ => {}
        }
    }

    if let Some(text) = value.literal().as_string() {
        match tag {
            "date-time" => {
                let parsed = DateTime::parse_from_rfc3339(text)
                    .map(KdlDateTime::Zoned)
                    .or_else(|_| NaiveDateTime::from_str(text).map(KdlDateTime::Local));
                return match parsed {
                    Ok(dt) => Ok(KdlishValue::Native(KdlNative::DateTime(dt))),
                    Err(_) => Err(pf.error(format!(
                        "Couldn't parse a date-time from {}.",
                        pf.fragment()
                    ))),
                };
            }
            "date" => {
                return NaiveDate::from_str(text)
                    .map(|d| KdlishValue::Native(KdlNative::Date(d)))
                    .map_err(|_| {
                        pf.error(format!("Couldn't parse a date from {}.", pf.fragment()))
                    });
            }
            "time" => {
                return NaiveTime::from_str(text)
                    .map(|t| KdlishValue::Native(KdlNative::Time(t)))
                    .map_err(|_| {
                        pf.error(format!("Couldn't parse a time from {}.", pf.fragment()))
                    });
            }
            "ipv4" => {
                return text
                    .parse()
                    .map(|ip| KdlishValue::Native(KdlNative::Ipv4(ip)))
                    .map_err(|_| {
                        pf.error(format!(
                            "Couldn't parse an IPv4 address from {}.",
                            pf.fragment()
                        ))
                    });
            }
            "ipv6" => {
                return text
                    .parse()
                    .map(|ip| KdlishValue::Native(KdlNative::Ipv6(ip)))
                    .map_err(|_| {
                        pf.error(format!(
                            "Couldn't parse an IPv6 address from {}.",
                            pf.fragment()
                        ))
                    });
            }
            "url" => {
                return Url::parse(text)
                    .map(|url| KdlishValue::Native(KdlNative::Url(url)))
                    .map_err(|_| {
                        pf.error(format!("Couldn't parse a url from {}.", pf.fragment()))
                    });
            }
            "uuid" => {
                return Uuid::from_str(text)
                    .map(|uuid| KdlishValue::Native(KdlNative::Uuid(uuid)))
                    .map_err(|_| {
                        pf.error(format!("Couldn't parse a UUID from {}.", pf.fragment()))
                    });
            }
            "regex" => {
                return Regex::new(text)
                    .map(|re| KdlishValue::Native(KdlNative::Regex(re)))
                    .map_err(|_| {
                        pf.error(format!("Couldn't parse a regex from {}.", pf.fragment()))
                    });
            }
            "base64" => {
                return BASE64
                    .decode(text)
                    .map(|bytes| KdlishValue::Native(KdlNative::Bytes(bytes)))
                    .map_err(|_| pf.error("Couldn't parse base64."));
            }
            "decimal" => return decimal(text, pf),
            _ => {}
        }
    }

    Ok(KdlishValue::Value(value))
}

fn bounded_int(
    value: &KdlValue,
    pf: &ParseFragment<'_>,
    lo: i128,
    hi: i128,
    what: &str,
) -> Result<KdlishValue, KdlParseError> {
    if let Some(exact) = value.literal().as_i128() {
        return if (lo..=hi).contains(&exact) {
            Ok(KdlishValue::Native(KdlNative::Integer(exact)))
        } else {
            Err(pf.error(format!("{exact} doesn't fit in {what}.")))
        };
    }
    // Fractional or oversized mantissa: bound-check the float value and
    // truncate, the way a host-language int() cast would.
    let float = value.literal().as_f64().unwrap_or_default();
    if float >= lo as f64 && float <= hi as f64 {
        Ok(KdlishValue::Native(KdlNative::Integer(float as i128)))
    } else {
        Err(pf.error(format!("{float} doesn't fit in {what}.")))
    }
}

fn decimal(chars: &str, pf: &ParseFragment<'_>) -> Result<KdlishValue, KdlParseError> {
    BigDecimal::from_str(chars)
        .map(|dec| KdlishValue::Native(KdlNative::Decimal(dec)))
        .map_err(|_| pf.error(format!("Couldn't parse a decimal from {}.", pf.fragment())))
}
