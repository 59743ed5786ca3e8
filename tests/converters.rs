//! The conversion layer: the reserved-tag table, untagged native
//! unwrapping, and user value/node hooks.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use kdl_canon::{
    parse, KdlDocument, KdlLiteral, KdlMantissa, KdlNative, KdlNode, KdlValue, KdlishValue,
    ParseConfig, StringMatcher, ValueKey,
};
use std::str::FromStr;

#[test]
fn reserved_date_tag() -> miette::Result<()> {
    let doc: KdlDocument = "when (date)\"2021-02-03\"".parse()?;
    assert_eq!(
        doc["when"].args()[0],
        KdlishValue::Native(KdlNative::Date(
            NaiveDate::from_ymd_opt(2021, 2, 3).unwrap()
        ))
    );
    // Natives reserialize with their tags.
    assert_eq!(doc.print(), "when (date)\"2021-02-03\"\n");
    Ok(())
}

#[test]
fn reserved_numeric_tags() -> miette::Result<()> {
    let doc: KdlDocument = "n (u8)255 (i16)-300 (f64)2 (decimal64)1.5e10".parse()?;
    let args = doc["n"].args();
    assert_eq!(args[0], KdlishValue::Native(KdlNative::Integer(255)));
    assert_eq!(args[1], KdlishValue::Native(KdlNative::Integer(-300)));
    assert_eq!(args[2], KdlishValue::Native(KdlNative::Float(2.0)));
    assert_eq!(
        args[3],
        KdlishValue::Native(KdlNative::Decimal(
            BigDecimal::from_str("1.5e10").unwrap()
        ))
    );
    Ok(())
}

#[test]
fn decimal_tags_only_convert_their_own_shape() -> miette::Result<()> {
    // The bare tag reads strings; the width-suffixed tags read numbers.
    // The opposite pairings stay wrapped.
    let doc: KdlDocument = "n (decimal)\"1.5\" (decimal)1.5e10 (decimal64)\"1.5\"".parse()?;
    let args = doc["n"].args();
    assert_eq!(
        args[0],
        KdlishValue::Native(KdlNative::Decimal(BigDecimal::from_str("1.5").unwrap()))
    );
    assert_eq!(
        args[1],
        KdlishValue::Value(KdlValue::tagged(
            "decimal",
            KdlLiteral::Decimal {
                mantissa: KdlMantissa::Float(1.5),
                exponent: 10,
            }
        ))
    );
    assert_eq!(
        args[2],
        KdlishValue::Value(KdlValue::tagged("decimal64", "1.5"))
    );
    Ok(())
}

#[test]
fn out_of_range_integers_abort_the_parse() {
    let err = "n (u8)256".parse::<KdlDocument>().unwrap_err();
    assert_eq!(err.message, "256 doesn't fit in a u8.");
    assert_eq!((err.line, err.column), (1, 7));

    assert!("n (i8)-129".parse::<KdlDocument>().is_err());
    assert!("n (u64)-1".parse::<KdlDocument>().is_err());
    assert!("n (u16)0x1_0000".parse::<KdlDocument>().is_err());
}

#[test]
fn reserved_string_tags_round_trip() -> miette::Result<()> {
    let text = concat!(
        "net (ipv4)\"127.0.0.1\" (ipv6)\"::1\"\n",
        "web (url)\"https://kdl.dev/spec\" (uuid)\"f81d4fae-7dec-11d0-a765-00a0c91e6bf6\"\n",
        "data (base64)\"aGVsbG8=\" (regex)r\"\\d+\"\n",
    );
    let doc: KdlDocument = text.parse()?;
    assert!(matches!(
        doc["net"].args()[0].as_native(),
        Some(KdlNative::Ipv4(_))
    ));
    assert_eq!(
        doc["data"].args()[0],
        KdlishValue::Native(KdlNative::Bytes(b"hello".to_vec()))
    );
    assert!(matches!(
        doc["data"].args()[1].as_native(),
        Some(KdlNative::Regex(_))
    ));
    assert_eq!(doc.print(), text);
    Ok(())
}

#[test]
fn malformed_tagged_payloads_are_positioned_errors() {
    let err = "n (date)\"03.02.2021\"".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("Couldn't parse a date"));
    assert!(err.message.contains("\"03.02.2021\""));

    assert!("n (base64)\"%%%\"".parse::<KdlDocument>().is_err());
    assert!("n (uuid)\"not-a-uuid\"".parse::<KdlDocument>().is_err());
    assert!("n (ipv4)\"999.0.0.1\"".parse::<KdlDocument>().is_err());
}

#[test]
fn unknown_tags_stay_wrapped() -> miette::Result<()> {
    let doc: KdlDocument = "n (celsius)20".parse()?;
    assert_eq!(
        doc["n"].args()[0],
        KdlishValue::Value(KdlValue::tagged("celsius", 20i128))
    );
    Ok(())
}

#[test]
fn native_tagged_values_can_be_disabled() -> miette::Result<()> {
    let config = ParseConfig {
        native_tagged_values: false,
        ..Default::default()
    };
    let doc = parse("n (u8)256 (date)\"nonsense\"", Some(&config))?;
    // No table, no range checks, no errors: the values stay tagged.
    assert_eq!(
        doc["n"].args()[0],
        KdlishValue::Value(KdlValue::tagged("u8", 256i128))
    );
    Ok(())
}

#[test]
fn untagged_natives_can_be_disabled() -> miette::Result<()> {
    let config = ParseConfig {
        native_untagged_values: false,
        ..Default::default()
    };
    let doc = parse("n 5 \"s\"", Some(&config))?;
    assert_eq!(
        doc["n"].args()[0],
        KdlishValue::Value(KdlValue::new(5i128))
    );
    assert_eq!(
        doc["n"].args()[1],
        KdlishValue::Value(KdlValue::new("s"))
    );
    Ok(())
}

#[test]
fn user_value_converters_run_in_order() -> miette::Result<()> {
    let mut config = ParseConfig::default();
    // First hook declines; the second answers.
    config.add_value_converter("celsius", |value, _pf| {
        if value.literal().as_f64() == Some(0.0) {
            Ok(Some(KdlishValue::Native(KdlNative::String(
                "freezing".into(),
            ))))
        } else {
            Ok(None)
        }
    });
    config.add_value_converter("celsius", |value, _pf| {
        let celsius = value.literal().as_f64().unwrap_or_default();
        Ok(Some(KdlishValue::Native(KdlNative::Float(
            celsius * 9.0 / 5.0 + 32.0,
        ))))
    });

    let doc = parse("temp (celsius)20 (celsius)0", Some(&config))?;
    assert_eq!(
        doc["temp"].args()[0],
        KdlishValue::Native(KdlNative::Float(68.0))
    );
    assert_eq!(
        doc["temp"].args()[1],
        KdlishValue::Native(KdlNative::String("freezing".into()))
    );
    Ok(())
}

#[test]
fn user_converters_outrank_the_reserved_table() -> miette::Result<()> {
    let mut config = ParseConfig::default();
    config.add_value_converter("u8", |value, _pf| {
        Ok(Some(KdlishValue::Value(value.clone())))
    });
    // (u8)256 would be an error under the built-in table; the user hook
    // intercepts it first.
    let doc = parse("n (u8)256", Some(&config))?;
    assert_eq!(
        doc["n"].args()[0],
        KdlishValue::Value(KdlValue::tagged("u8", 256i128))
    );
    Ok(())
}

#[test]
fn value_converters_can_reject_with_position() {
    let mut config = ParseConfig::default();
    config.add_value_converter("even", |value, pf| {
        match value.literal().as_i128() {
            Some(v) if v % 2 == 0 => Ok(Some(KdlishValue::Native(KdlNative::Integer(v)))),
            _ => Err(pf.error(format!("{} isn't even.", pf.fragment()))),
        }
    });
    let err = parse("n (even)7", Some(&config)).unwrap_err();
    assert_eq!(err.message, "7 isn't even.");
    assert_eq!((err.line, err.column), (1, 9));
}

#[test]
fn value_converter_keys_can_match_by_type() -> miette::Result<()> {
    use kdl_canon::{KdlLiteralKind, TypeKey};
    let mut config = ParseConfig::default();
    // Only plain strings tagged (upper) are touched; numbers pass through.
    config.add_value_converter(
        ValueKey::TagAndType(
            StringMatcher::Exact("upper".into()),
            TypeKey::Literal(KdlLiteralKind::String),
        ),
        |value, _pf| {
            let text = value.literal().as_string().unwrap_or_default();
            Ok(Some(KdlishValue::Native(KdlNative::String(
                text.to_uppercase(),
            ))))
        },
    );
    let doc = parse("n (upper)\"shout\" (upper)5", Some(&config))?;
    assert_eq!(
        doc["n"].args()[0],
        KdlishValue::Native(KdlNative::String("SHOUT".into()))
    );
    assert_eq!(
        doc["n"].args()[1],
        KdlishValue::Value(KdlValue::tagged("upper", 5i128))
    );
    Ok(())
}

#[test]
fn node_converters_by_name_and_tag() -> miette::Result<()> {
    let mut config = ParseConfig::default();
    config.add_node_converter(("v2", "server"), |node, _pf| {
        let mut node = node.clone();
        node.set_name("server-v2");
        Ok(Some(node))
    });
    config.add_node_converter("server", |node, _pf| {
        let mut node = node.clone();
        node.insert("legacy", true);
        Ok(Some(node))
    });

    let doc = parse("server 1\n(v2)server 2", Some(&config))?;
    // Plain `server` hits the name-keyed hook...
    assert!(doc.nodes()[0].props().contains_key("legacy"));
    // ...while the tagged one is claimed by the (tag, name) hook first.
    assert_eq!(doc.nodes()[1].name(), "server-v2");
    assert!(!doc.nodes()[1].props().contains_key("legacy"));
    Ok(())
}

#[test]
fn node_converter_fragment_covers_tag_and_name() -> miette::Result<()> {
    let mut config = ParseConfig::default();
    config.add_node_converter("n", |node, pf| {
        let mut node = node.clone();
        node.insert("source", pf.fragment());
        Ok(Some(node))
    });
    let doc = parse("(t)n 1 2", Some(&config))?;
    assert_eq!(
        doc.nodes()[0]["source"],
        KdlishValue::Value(KdlValue::new("(t)n"))
    );
    Ok(())
}

#[test]
fn suppressed_nodes_skip_converters() -> miette::Result<()> {
    let mut config = ParseConfig::default();
    config.add_node_converter(StringMatcher::Any, |_node, pf| {
        Err(pf.error("converter should not run"))
    });
    let doc = parse("/-ghost 1", Some(&config))?;
    assert!(doc.nodes().is_empty());
    Ok(())
}

#[test]
fn converted_nodes_replace_in_children_too() -> miette::Result<()> {
    let mut config = ParseConfig::default();
    config.add_node_converter("item", |node, _pf| {
        let mut node = node.clone();
        node.set_tag("seen");
        Ok(Some(node))
    });
    let doc = parse("list {\n item 1\n item 2\n}", Some(&config))?;
    for child in doc["list"].children() {
        assert_eq!(child.tag(), Some("seen"));
    }
    Ok(())
}

#[test]
fn to_kdl_seam() {
    use kdl_canon::ToKdl;
    struct Temperature(f64);
    impl ToKdl for Temperature {
        fn to_kdl(&self) -> KdlishValue {
            KdlishValue::Value(KdlValue::tagged(
                "celsius",
                KdlLiteral::Exact(format!("{:.1}", self.0)),
            ))
        }
    }

    let mut node = KdlNode::new("reading");
    node.push(Temperature(21.50));
    node.push(NaiveDate::from_ymd_opt(2021, 2, 3).unwrap());
    assert_eq!(
        node.to_string(),
        "reading (celsius)21.5 (date)\"2021-02-03\"\n"
    );
}
