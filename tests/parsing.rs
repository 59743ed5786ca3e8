//! Grammar-level tests: the parse tree produced for well-formed
//! documents, and the errors produced for malformed ones.

use kdl_canon::{
    parse, KdlDocument, KdlLiteral, KdlMantissa, KdlNative, KdlParseError, KdlValue, KdlishValue,
    ParseConfig,
};

fn raw(text: &str) -> Result<KdlDocument, KdlParseError> {
    parse(text, Some(&ParseConfig::raw()))
}

fn native(value: KdlNative) -> KdlishValue {
    KdlishValue::Native(value)
}

#[test]
fn basic_nesting() -> miette::Result<()> {
    let doc: KdlDocument = "node_name \"arg\" {\n    child_node foo=1 bar=true\n}\n".parse()?;
    assert_eq!(doc.nodes().len(), 1);

    let node = &doc["node_name"];
    assert_eq!(node.args(), [native(KdlNative::String("arg".into()))]);
    assert!(node.props().is_empty());

    let child = &node.children()[0];
    assert_eq!(child.name(), "child_node");
    assert_eq!(child["foo"], native(KdlNative::Integer(1)));
    assert_eq!(child["bar"], native(KdlNative::Bool(true)));

    assert_eq!(
        doc.print(),
        "node_name \"arg\" {\n\tchild_node foo=1 bar=true\n}\n"
    );
    Ok(())
}

#[test]
fn slashdash_suppresses_args_and_children() -> miette::Result<()> {
    let doc: KdlDocument = "foo 1 /- 2 3 /- { child \"ignored\" }".parse()?;
    let node = &doc["foo"];
    assert_eq!(
        node.args(),
        [native(KdlNative::Integer(1)), native(KdlNative::Integer(3))]
    );
    assert!(node.children().is_empty());
    Ok(())
}

#[test]
fn slashdash_suppresses_nodes_and_props() -> miette::Result<()> {
    let doc: KdlDocument = "/-ghost 1 2\nreal a=1 /- b=2".parse()?;
    assert_eq!(doc.nodes().len(), 1);
    let node = &doc["real"];
    assert!(node.props().contains_key("a"));
    assert!(!node.props().contains_key("b"));
    Ok(())
}

#[test]
fn slashdashed_fragments_are_still_validated() {
    // The suppressed node has an unterminated string.
    assert!("/-ghost \"unterminated".parse::<KdlDocument>().is_err());
    // The suppressed children block has junk inside it.
    assert!("real /- { child % }".parse::<KdlDocument>().is_err());
}

#[test]
fn slashdashed_props_do_not_participate_in_last_wins() -> miette::Result<()> {
    let doc = raw("n a=1 /- a=2 a=3")?;
    let node = &doc["n"];
    assert_eq!(node.props().len(), 1);
    assert_eq!(node["a"], KdlishValue::from(KdlValue::new(3i128)));
    Ok(())
}

#[test]
fn lone_slashdash_is_an_error() {
    assert!("/-".parse::<KdlDocument>().is_err());
    assert!("node /-".parse::<KdlDocument>().is_err());
}

#[test]
fn line_continuations() -> miette::Result<()> {
    let doc: KdlDocument = "n a=1 \\\n  /* mid */ b=2".parse()?;
    let node = &doc["n"];
    assert_eq!(node["a"], native(KdlNative::Integer(1)));
    assert_eq!(node["b"], native(KdlNative::Integer(2)));
    assert_eq!(node.props().len(), 2);

    // A comment can stand in for the newline.
    let doc: KdlDocument = "n 1 \\ // rest of line\n  2".parse()?;
    assert_eq!(doc["n"].args().len(), 2);
    Ok(())
}

#[test]
fn continuation_without_newline_is_an_error() {
    let err = "n a=1 \\ b=2".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("line continuation"));
}

#[test]
fn property_last_wins_keeps_first_position() -> miette::Result<()> {
    let doc = raw("n a=1 b=2 a=3")?;
    let node = &doc["n"];
    let props: Vec<(&str, &KdlishValue)> = node
        .props()
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].0, "a");
    assert_eq!(props[0].1, &KdlishValue::from(KdlValue::new(3i128)));
    assert_eq!(props[1].0, "b");
    assert_eq!(doc.print(), "n a=3 b=2\n");
    Ok(())
}

#[test]
fn radix_and_string_shapes_survive() -> miette::Result<()> {
    let doc = raw("n r#\"a \"quoted\" b\"# 0x1F")?;
    let node = &doc["n"];
    assert_eq!(
        node.args()[0],
        KdlishValue::from(KdlValue::new(KdlLiteral::RawString {
            value: "a \"quoted\" b".into(),
            hashes: 1,
        }))
    );
    assert_eq!(
        node.args()[1],
        KdlishValue::from(KdlValue::new(KdlLiteral::Hex(0x1F)))
    );
    assert_eq!(doc.print(), "n r#\"a \"quoted\" b\"# 0x1f\n");
    Ok(())
}

#[test]
fn terminators() -> miette::Result<()> {
    let doc: KdlDocument = "a; b; c".parse()?;
    assert_eq!(doc.nodes().len(), 3);

    let doc: KdlDocument = "parent { inner }".parse()?;
    assert_eq!(doc["parent"].children().len(), 1);

    let doc: KdlDocument = "last".parse()?;
    assert_eq!(doc.nodes().len(), 1);
    Ok(())
}

#[test]
fn tags_on_nodes_and_values() -> miette::Result<()> {
    let doc = raw("(config)server ( addr )\"10.0.0.1\"")?;
    let node = doc.nodes().first().unwrap();
    assert_eq!(node.tag(), Some("config"));
    assert_eq!(node.name(), "server");
    assert_eq!(
        node.args()[0],
        KdlishValue::from(KdlValue::tagged("addr", "10.0.0.1"))
    );
    Ok(())
}

#[test]
fn tagged_keywords_are_values() -> miette::Result<()> {
    let doc = raw("n (flag)true")?;
    assert_eq!(
        doc["n"].args()[0],
        KdlishValue::from(KdlValue::tagged("flag", true))
    );
    Ok(())
}

#[test]
fn keywords_cannot_name_things() {
    assert!("true 1".parse::<KdlDocument>().is_err());
    assert!("null".parse::<KdlDocument>().is_err());

    let err = "n true=1".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("property name"), "{}", err.message);
}

#[test]
fn mixed_case_keywords_are_rejected() {
    let err = "n TRUE".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("lower-case"));
    assert!("n False".parse::<KdlDocument>().is_err());
}

#[test]
fn single_quotes_are_rejected_helpfully() {
    let err = "n 'oops'".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("double-quotes"));
}

#[test]
fn sign_led_bare_identifiers() -> miette::Result<()> {
    let doc = raw("+foo -bar=1")?;
    let node = doc.nodes().first().unwrap();
    assert_eq!(node.name(), "+foo");
    assert!(node.props().contains_key("-bar"));
    // But a sign followed by a digit is a number, not an identifier.
    assert!(raw("+1foo").is_err());
    Ok(())
}

#[test]
fn quoted_identifiers() -> miette::Result<()> {
    let doc = raw("\"two words\" \"with\\nescape\"=1 r\"raw name\"=2")?;
    let node = doc.nodes().first().unwrap();
    assert_eq!(node.name(), "two words");
    assert!(node.props().contains_key("with\nescape"));
    assert!(node.props().contains_key("raw name"));
    Ok(())
}

#[test]
fn unterminated_things_error_at_their_start() {
    let err = "node \"no end".parse::<KdlDocument>().unwrap_err();
    assert_eq!((err.line, err.column), (1, 6));

    let err = "node 1\nnode2 /* spans\nto eof".parse::<KdlDocument>().unwrap_err();
    assert_eq!((err.line, err.column), (2, 7));

    let err = "node {\n  child\n".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("child list"));
}

#[test]
fn bad_numbers_are_rejected() {
    assert!("n 1__2".parse::<KdlDocument>().is_err());
    assert!("n 1_".parse::<KdlDocument>().is_err());
    assert!("n 0x".parse::<KdlDocument>().is_err());
    assert!("n 0x_1".parse::<KdlDocument>().is_err());
    assert!("n 1._5".parse::<KdlDocument>().is_err());
    assert!("n 1.".parse::<KdlDocument>().is_err());
    assert!("n 1e".parse::<KdlDocument>().is_err());
}

#[test]
fn bad_escapes_are_rejected() {
    assert!(r#"n "\q""#.parse::<KdlDocument>().is_err());
    assert!(r#"n "\u{D800}""#.parse::<KdlDocument>().is_err());
    assert!(r#"n "\u{110000}""#.parse::<KdlDocument>().is_err());
    assert!(r#"n "\u{}""#.parse::<KdlDocument>().is_err());
}

#[test]
fn junk_after_node_is_an_error() {
    let err = "n 1 %".parse::<KdlDocument>().unwrap_err();
    assert!(err.message.contains("Junk"));
}

#[test]
fn empty_documents() -> miette::Result<()> {
    assert_eq!("".parse::<KdlDocument>()?.nodes().len(), 0);
    assert_eq!("   \n\n".parse::<KdlDocument>()?.nodes().len(), 0);
    assert_eq!("// just a comment".parse::<KdlDocument>()?.nodes().len(), 0);
    Ok(())
}

#[test]
fn a_leading_bom_is_ignored() -> miette::Result<()> {
    let doc: KdlDocument = "\u{FEFF}node 1".parse()?;
    assert_eq!(doc.nodes().len(), 1);
    Ok(())
}

#[test]
fn crlf_and_exotic_newlines() -> miette::Result<()> {
    let doc: KdlDocument = "a 1\r\nb 2\u{2028}c 3\u{0085}d 4".parse()?;
    assert_eq!(doc.nodes().len(), 4);

    // CRLF counts as a single line break for positions.
    let err = "a 1\r\nb \"".parse::<KdlDocument>().unwrap_err();
    assert_eq!(err.line, 2);
    Ok(())
}

#[test]
fn exact_values_never_come_from_the_parser() -> miette::Result<()> {
    let doc = raw("n 1 2.5 0x1f 0o7 0b1 \"s\" r\"r\" true null (t)5")?;
    for arg in doc["n"].args() {
        let value = arg.as_value().expect("raw parses produce literal values");
        assert!(!matches!(value.literal(), KdlLiteral::Exact(_)));
    }
    Ok(())
}

#[test]
fn scientific_notation_structure() -> miette::Result<()> {
    let doc = raw("n 1e3 1.5e-2 2E+4")?;
    let args = doc["n"].args();
    assert_eq!(
        args[0].as_value().unwrap().literal(),
        &KdlLiteral::Decimal {
            mantissa: KdlMantissa::Integer(1),
            exponent: 3
        }
    );
    assert_eq!(
        args[1].as_value().unwrap().literal(),
        &KdlLiteral::Decimal {
            mantissa: KdlMantissa::Float(1.5),
            exponent: -2
        }
    );
    assert_eq!(
        args[2].as_value().unwrap().literal(),
        &KdlLiteral::Decimal {
            mantissa: KdlMantissa::Integer(2),
            exponent: 4
        }
    );
    Ok(())
}

#[test]
fn untagged_values_unwrap_to_natives_by_default() -> miette::Result<()> {
    let doc: KdlDocument = "n \"text\" 5 5e2 2.5 0x10 true null".parse()?;
    let args = doc["n"].args();
    assert_eq!(args[0], native(KdlNative::String("text".into())));
    assert_eq!(args[1], native(KdlNative::Integer(5)));
    assert_eq!(args[2], native(KdlNative::Float(500.0)));
    assert_eq!(args[3], native(KdlNative::Float(2.5)));
    assert_eq!(args[4], native(KdlNative::Integer(16)));
    assert_eq!(args[5], native(KdlNative::Bool(true)));
    assert_eq!(args[6], native(KdlNative::Null));
    Ok(())
}
