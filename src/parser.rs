//! The hand-written recursive-descent parser for KDL 1.0.0 documents.
//!
//! Parse functions take the source and a byte offset and either match
//! (returning the parsed value and the offset just past it), decline
//! (`None`, leaving the offset for the caller to reuse), or abort the
//! whole parse with a positioned [`KdlParseError`].

use crate::lex::{
    is_binary_digit, is_ident_char, is_keyword, is_newline_char, is_octal_digit, is_sign,
    is_unicode_space,
};
use crate::native::untagged_native;
use crate::{
    convert, KdlDocument, KdlLiteral, KdlMantissa, KdlNode, KdlParseError, KdlishValue,
    ParseConfig, ParseFragment, PrintConfig,
};

type PResult<T> = Result<T, KdlParseError>;

/// Parses KDL source text into a document. With no config, the
/// process-wide [`ParseConfig::global`] applies.
///
/// ```rust
/// let doc = kdl_canon::parse("node 1 2 3", None)?;
/// assert_eq!(doc.nodes()[0].args().len(), 3);
/// # Ok::<(), kdl_canon::KdlParseError>(())
/// ```
pub fn parse(text: &str, config: Option<&ParseConfig>) -> PResult<KdlDocument> {
    let global;
    let config = match config {
        Some(config) => config,
        None => {
            global = ParseConfig::global();
            &global
        }
    };
    let s = Source { text };
    let mut doc = KdlDocument::new();
    let mut i = parse_linespace(&s, 0)?;
    while !s.eof(i) {
        let Some((node, next)) = parse_node(&s, config, i)? else {
            return Err(s.error(i, "Expected a node"));
        };
        if let Some(node) = node {
            doc.nodes.push(node);
        }
        i = parse_linespace(&s, next)?;
    }
    Ok(doc)
}

/// A parser handle carrying its own configuration. Documents it parses
/// get its print configuration attached.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    /// Configuration applied to [`Parser::parse`] calls, falling back
    /// to the process-wide default when `None`.
    pub parse_config: Option<ParseConfig>,
    /// Print configuration attached to parsed documents.
    pub print_config: Option<PrintConfig>,
}

impl Parser {
    /// Creates a parser with the given configurations.
    pub fn new(parse_config: Option<ParseConfig>, print_config: Option<PrintConfig>) -> Self {
        Parser {
            parse_config,
            print_config,
        }
    }

    /// Parses `text` under this parser's configuration.
    pub fn parse(&self, text: &str) -> PResult<KdlDocument> {
        let mut doc = parse(text, self.parse_config.as_ref())?;
        doc.print_config = self.print_config.clone();
        Ok(doc)
    }

    /// Parses `text` with a one-off parse configuration, still
    /// attaching this parser's print configuration.
    pub fn parse_with(&self, text: &str, config: &ParseConfig) -> PResult<KdlDocument> {
        let mut doc = parse(text, Some(config))?;
        doc.print_config = self.print_config.clone();
        Ok(doc)
    }

    /// Serializes a document, preferring this parser's print
    /// configuration over the document's own.
    pub fn print(&self, doc: &KdlDocument) -> String {
        match &self.print_config {
            Some(config) => doc.print_with(config),
            None => doc.print(),
        }
    }
}

/// A read-only view of the input with char-resolution lookahead at
/// arbitrary byte offsets. Offsets only ever land on char boundaries;
/// line/column positions are derived when an error is raised.
struct Source<'a> {
    text: &'a str,
}

impl Source<'_> {
    fn at(&self, i: usize) -> Option<char> {
        self.text.get(i..).and_then(|s| s.chars().next())
    }

    fn eof(&self, i: usize) -> bool {
        i >= self.text.len()
    }

    fn error(&self, i: usize, message: impl Into<String>) -> KdlParseError {
        KdlParseError::new(self.text, i, message)
    }
}

enum Entity {
    Arg(KdlishValue),
    Prop(String, KdlishValue),
}

fn parse_node(
    s: &Source<'_>,
    config: &ParseConfig,
    start: usize,
) -> PResult<Option<(Option<KdlNode>, usize)>> {
    let mut i = start;

    let suppressed = match parse_slashdash(s, i)? {
        Some(next) => {
            i = next;
            true
        }
        None => false,
    };

    let tag = match parse_tag(s, i)? {
        Some((tag, next)) => {
            i = parse_whitespace(s, next)?;
            Some(tag)
        }
        None => None,
    };

    let Some((name, next)) = parse_ident(s, i)? else {
        return Ok(None);
    };
    i = next;
    let name_end = i;

    let mut node = KdlNode::new(name);
    node.tag = tag;

    loop {
        let after_space = parse_nodespace(s, i)?;
        if after_space == i {
            break;
        }
        match parse_entity(s, config, after_space)? {
            Some((entity, next)) => {
                i = next;
                match entity {
                    Some(Entity::Arg(value)) => node.args.push(value),
                    Some(Entity::Prop(key, value)) => {
                        node.props.insert(key, value);
                    }
                    // A slash-dashed entity: parsed, validated, dropped.
                    None => {}
                }
            }
            None => {
                i = after_space;
                break;
            }
        }
    }

    i = parse_nodespace(s, i)?;
    if let Some((children, next)) = parse_node_children(s, config, i)? {
        if let Some(children) = children {
            node.children = children;
        }
        i = next;
    }
    i = parse_nodespace(s, i)?;
    i = parse_node_terminator(s, i)?;

    if suppressed {
        return Ok(Some((None, i)));
    }

    let fragment = ParseFragment {
        fragment: &s.text[start..name_end],
        input: s.text,
        offset: start,
    };
    for (key, converter) in &config.node_converters {
        if key.matches(node.tag(), node.name()) {
            if let Some(replacement) = converter(&node, &fragment)? {
                node = replacement;
                break;
            }
        }
    }
    Ok(Some((Some(node), i)))
}

fn parse_node_children(
    s: &Source<'_>,
    config: &ParseConfig,
    start: usize,
) -> PResult<Option<(Option<Vec<KdlNode>>, usize)>> {
    let mut i = start;
    let suppressed = match parse_slashdash(s, i)? {
        Some(next) => {
            i = next;
            true
        }
        None => false,
    };

    if s.at(i) != Some('{') {
        return Ok(None);
    }
    let brace = i;
    i += 1;

    let mut nodes = Vec::new();
    loop {
        i = parse_linespace(s, i)?;
        match parse_node(s, config, i)? {
            Some((node, next)) => {
                if let Some(node) = node {
                    nodes.push(node);
                }
                i = next;
            }
            None => break,
        }
    }
    i = parse_linespace(s, i)?;
    if s.eof(i) {
        return Err(s.error(brace, "Hit EOF while searching for the end of a child list"));
    }
    if s.at(i) != Some('}') {
        return Err(s.error(i, "Junk between end of child list and closing }"));
    }
    i += 1;

    Ok(Some((if suppressed { None } else { Some(nodes) }, i)))
}

fn parse_node_terminator(s: &Source<'_>, i: usize) -> PResult<usize> {
    if let Some(next) = parse_newline(s, i) {
        return Ok(next);
    }
    if let Some(next) = parse_single_line_comment(s, i) {
        return Ok(next);
    }
    match s.at(i) {
        Some(';') => Ok(i + 1),
        // Lookahead only: the brace belongs to the enclosing child list.
        Some('}') => Ok(i),
        None => Ok(i),
        Some(_) => Err(s.error(i, "Junk after node, before terminator")),
    }
}

fn parse_entity(
    s: &Source<'_>,
    config: &ParseConfig,
    start: usize,
) -> PResult<Option<(Option<Entity>, usize)>> {
    let mut i = start;
    let suppressed = match parse_slashdash(s, i)? {
        Some(next) => {
            i = next;
            true
        }
        None => false,
    };

    let parsed = match parse_property(s, config, i)? {
        Some((key, value, next)) => Some((Entity::Prop(key, value), next)),
        None => parse_value(s, config, i)?.map(|(value, next)| (Entity::Arg(value), next)),
    };
    let Some((entity, next)) = parsed else {
        return Ok(None);
    };
    Ok(Some((if suppressed { None } else { Some(entity) }, next)))
}

fn parse_property(
    s: &Source<'_>,
    config: &ParseConfig,
    start: usize,
) -> PResult<Option<(String, KdlishValue, usize)>> {
    if let Some((key, next)) = parse_ident(s, start)? {
        if s.at(next) != Some('=') {
            // The ident might be a plain string value instead, so this
            // isn't the point of no return yet.
            return Ok(None);
        }
        let value_start = next + 1;
        let Some((value, end)) = parse_value(s, config, value_start)? else {
            return Err(s.error(value_start, "Expected value after prop="));
        };
        return Ok(Some((key, value, end)));
    }
    if let Some((word, next)) = scan_ident_chars(s, start) {
        if is_keyword(word) && s.at(next) == Some('=') {
            return Err(s.error(
                start,
                format!("The reserved keyword \"{word}\" can't be used as a property name"),
            ));
        }
    }
    Ok(None)
}

fn parse_value(
    s: &Source<'_>,
    config: &ParseConfig,
    start: usize,
) -> PResult<Option<(KdlishValue, usize)>> {
    let mut i = start;
    let tag = match parse_tag(s, i)? {
        Some((tag, next)) => {
            i = parse_whitespace(s, next)?;
            Some(tag)
        }
        None => None,
    };
    let value_start = i;

    let mut literal = parse_number(s, i)?;
    if literal.is_none() {
        literal = parse_keyword(s, i);
    }
    if literal.is_none() {
        literal = parse_string_literal(s, i)?;
    }

    if let Some((literal, end)) = literal {
        let fragment = ParseFragment {
            fragment: &s.text[value_start..end],
            input: s.text,
            offset: value_start,
        };

        if tag.is_none() && config.native_untagged_values {
            return Ok(Some((KdlishValue::Native(untagged_native(literal)), end)));
        }

        let mut result = KdlishValue::Value(crate::KdlValue { tag, literal });
        if result.tag().is_some() {
            let mut converted = false;
            for (key, converter) in &config.value_converters {
                let KdlishValue::Value(value) = &result else {
                    break;
                };
                if key.matches_value(value) {
                    if let Some(replacement) = converter(value, &fragment)? {
                        result = replacement;
                        converted = true;
                        break;
                    }
                }
            }
            if !converted && config.native_tagged_values {
                if let KdlishValue::Value(value) = result {
                    result = convert::to_native(value, &fragment)?;
                }
            }
        }
        return Ok(Some((result, end)));
    }

    if s.at(i) == Some('\'') {
        return Err(s.error(i, "KDL strings use double-quotes"));
    }
    if let Some((word, _)) = scan_ident_chars(s, i) {
        let lower = word.to_ascii_lowercase();
        if is_keyword(&lower) && word != lower {
            return Err(s.error(i, "KDL keywords are lower-case"));
        }
    }
    if tag.is_some() {
        return Err(s.error(i, "Found a tag, but no value following it"));
    }
    Ok(None)
}

fn parse_tag(s: &Source<'_>, start: usize) -> PResult<Option<(String, usize)>> {
    if s.at(start) != Some('(') {
        return Ok(None);
    }
    let i = parse_whitespace(s, start + 1)?;
    let Some((tag, next)) = parse_ident(s, i)? else {
        return Ok(None);
    };
    let next = parse_whitespace(s, next)?;
    if s.at(next) != Some(')') {
        return Err(s.error(next, "Junk between tag ident and closing paren"));
    }
    Ok(Some((tag, next + 1)))
}

fn parse_ident(s: &Source<'_>, start: usize) -> PResult<Option<(String, usize)>> {
    if let Some((literal, next)) = parse_string_literal(s, start)? {
        let (KdlLiteral::String(value) | KdlLiteral::RawString { value, .. }) = literal else {
            return Err(s.error(start, "Expected an identifier"));
        };
        return Ok(Some((value, next)));
    }
    Ok(parse_bare_ident(s, start))
}

fn parse_bare_ident(s: &Source<'_>, start: usize) -> Option<(String, usize)> {
    let first = s.at(start)?;
    if first.is_ascii_digit() || !is_ident_char(first) {
        return None;
    }
    if is_sign(first)
        && s.at(start + first.len_utf8())
            .is_some_and(|c| c.is_ascii_digit())
    {
        return None;
    }
    let (word, next) = scan_ident_chars(s, start)?;
    if is_keyword(word) {
        return None;
    }
    Some((word.to_string(), next))
}

/// The raw run of identifier characters at `start`, with no keyword or
/// number-confusability checks.
fn scan_ident_chars<'a>(s: &'a Source<'_>, start: usize) -> Option<(&'a str, usize)> {
    let mut i = start;
    while let Some(c) = s.at(i).filter(|c| is_ident_char(*c)) {
        i += c.len_utf8();
    }
    if i == start {
        None
    } else {
        Some((&s.text[start..i], i))
    }
}

fn parse_keyword(s: &Source<'_>, start: usize) -> Option<(KdlLiteral, usize)> {
    let keywords = [
        ("true", KdlLiteral::Bool(true)),
        ("false", KdlLiteral::Bool(false)),
        ("null", KdlLiteral::Null),
    ];
    for (word, literal) in keywords {
        if s.text.get(start..)?.starts_with(word) {
            let end = start + word.len();
            if s.at(end).map_or(true, |c| !is_ident_char(c)) {
                return Some((literal, end));
            }
        }
    }
    None
}

// --- numbers ---

fn parse_number(s: &Source<'_>, start: usize) -> PResult<Option<(KdlLiteral, usize)>> {
    if !is_number_start(s, start) {
        return Ok(None);
    }
    if let Some(result) = parse_radix_number(s, start, 'b', is_binary_digit, KdlLiteral::Binary)? {
        return Ok(Some(result));
    }
    if let Some(result) = parse_radix_number(s, start, 'o', is_octal_digit, KdlLiteral::Octal)? {
        return Ok(Some(result));
    }
    if let Some(result) =
        parse_radix_number(s, start, 'x', |c| c.is_ascii_hexdigit(), KdlLiteral::Hex)?
    {
        return Ok(Some(result));
    }
    parse_decimal_number(s, start).map(Some)
}

fn is_number_start(s: &Source<'_>, start: usize) -> bool {
    match s.at(start) {
        Some(c) if c.is_ascii_digit() => true,
        Some(c) if is_sign(c) => s.at(start + 1).is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn parse_sign(s: &Source<'_>, start: usize) -> Option<(i128, usize)> {
    match s.at(start) {
        Some('+') => Some((1, start + 1)),
        Some('-') => Some((-1, start + 1)),
        _ => None,
    }
}

fn parse_radix_number(
    s: &Source<'_>,
    start: usize,
    marker: char,
    digit: fn(char) -> bool,
    build: fn(i128) -> KdlLiteral,
) -> PResult<Option<(KdlLiteral, usize)>> {
    let mut i = start;
    let sign = match parse_sign(s, i) {
        Some((sign, next)) => {
            i = next;
            sign
        }
        None => 1,
    };
    if !(s.at(i) == Some('0') && s.at(i + 1) == Some(marker)) {
        return Ok(None);
    }
    i += 2;
    let radix = match marker {
        'b' => 2,
        'o' => 8,
        _ => 16,
    };
    let Some((digits, end)) = scan_digit_run(s, i, digit)? else {
        return Err(s.error(
            i,
            format!("Expected a digit after the 0{marker} prefix, got junk"),
        ));
    };
    let value = i128::from_str_radix(&digits, radix)
        .map_err(|e| s.error(start, format!("Invalid number: {e}")))?;
    Ok(Some((build(value * sign), end)))
}

fn parse_decimal_number(s: &Source<'_>, start: usize) -> PResult<(KdlLiteral, usize)> {
    let mut i = start;
    if let Some((_, next)) = parse_sign(s, i) {
        i = next;
    }

    let Some((_, next)) = scan_digit_run(s, i, |c| c.is_ascii_digit())? else {
        return Err(s.error(i, "Expected a digit"));
    };
    i = next;

    if s.at(i) == Some('.') {
        let Some((_, next)) = scan_digit_run(s, i + 1, |c| c.is_ascii_digit())? else {
            return Err(s.error(i + 1, "Expected digit after decimal point"));
        };
        i = next;
    }

    let mantissa_chars = s.text[start..i].replace('_', "");
    let mantissa = match mantissa_chars.parse::<i128>() {
        Ok(value) => KdlMantissa::Integer(value),
        Err(_) => match mantissa_chars.parse::<f64>() {
            Ok(value) => KdlMantissa::Float(value),
            Err(_) => {
                return Err(s.error(start, "Number-like string didn't actually parse as a number"))
            }
        },
    };

    let mut exponent = 0i64;
    if matches!(s.at(i), Some('e') | Some('E')) {
        let exp_start = i + 1;
        let mut j = exp_start;
        if let Some((_, next)) = parse_sign(s, j) {
            j = next;
        }
        let Some((_, next)) = scan_digit_run(s, j, |c| c.is_ascii_digit())? else {
            return Err(s.error(j, "Expected a number after the exponent"));
        };
        j = next;
        exponent = s.text[exp_start..j]
            .replace('_', "")
            .parse::<i64>()
            .map_err(|e| s.error(exp_start, format!("Invalid exponent: {e}")))?;
        i = j;
    }

    Ok((KdlLiteral::Decimal { mantissa, exponent }, i))
}

/// Scans a run of digits with `_` separators. Underscores must sit
/// between two digits; `1__2` and trailing `_` are rejected.
fn scan_digit_run(
    s: &Source<'_>,
    start: usize,
    digit: impl Fn(char) -> bool,
) -> PResult<Option<(String, usize)>> {
    let Some(first) = s.at(start).filter(|c| digit(*c)) else {
        return Ok(None);
    };
    let mut digits = String::new();
    digits.push(first);
    let mut i = start + first.len_utf8();
    loop {
        match s.at(i) {
            Some(c) if digit(c) => {
                digits.push(c);
                i += c.len_utf8();
            }
            Some('_') => {
                if !s.at(i + 1).is_some_and(|c| digit(c)) {
                    return Err(s.error(i, "Underscores in numbers must sit between digits"));
                }
                i += 1;
            }
            _ => break,
        }
    }
    Ok(Some((digits, i)))
}

// --- strings ---

fn parse_string_literal(s: &Source<'_>, start: usize) -> PResult<Option<(KdlLiteral, usize)>> {
    match s.at(start) {
        Some('"') => parse_escaped_string(s, start).map(Some),
        Some('r') if matches!(s.at(start + 1), Some('#') | Some('"')) => parse_raw_string(s, start),
        _ => Ok(None),
    }
}

fn parse_escaped_string(s: &Source<'_>, start: usize) -> PResult<(KdlLiteral, usize)> {
    let mut i = start + 1;
    let mut chars = String::new();
    loop {
        match s.at(i) {
            None => {
                return Err(s.error(start, "Hit EOF while looking for the end of the string"))
            }
            Some('"') => break,
            Some('\\') => {
                let (c, next) = parse_escape(s, i)?;
                chars.push(c);
                i = next;
            }
            Some(c) => {
                chars.push(c);
                i += c.len_utf8();
            }
        }
    }
    Ok((KdlLiteral::String(chars), i + 1))
}

fn parse_escape(s: &Source<'_>, start: usize) -> PResult<(char, usize)> {
    match s.at(start + 1) {
        Some('n') => Ok(('\n', start + 2)),
        Some('r') => Ok(('\r', start + 2)),
        Some('t') => Ok(('\t', start + 2)),
        Some('\\') => Ok(('\\', start + 2)),
        Some('/') => Ok(('/', start + 2)),
        Some('"') => Ok(('"', start + 2)),
        Some('b') => Ok(('\u{08}', start + 2)),
        Some('f') => Ok(('\u{0C}', start + 2)),
        Some('u') => {
            if s.at(start + 2) != Some('{') {
                return Err(s.error(start, "Unicode escapes must surround their codepoint in {}"));
            }
            let hex_start = start + 3;
            let mut i = hex_start;
            while s.at(i).is_some_and(|c| c.is_ascii_hexdigit()) {
                i += 1;
            }
            let count = i - hex_start;
            if s.at(i) != Some('}') {
                return Err(s.error(hex_start, "Expected } to finish a unicode escape"));
            }
            if count < 1 {
                return Err(s.error(hex_start, "Unicode escape doesn't contain a codepoint"));
            }
            if count > 6 {
                return Err(s.error(hex_start, "Unicode escapes can contain at most six digits"));
            }
            let code = u32::from_str_radix(&s.text[hex_start..i], 16)
                .map_err(|_| s.error(hex_start, "Invalid unicode escape"))?;
            if code > 0x10FFFF {
                return Err(s.error(
                    hex_start,
                    "Maximum codepoint in a unicode escape is 0x10ffff",
                ));
            }
            let Some(c) = char::from_u32(code) else {
                return Err(s.error(hex_start, "Unicode escape names a surrogate codepoint"));
            };
            Ok((c, i + 1))
        }
        _ => Err(s.error(start, "Invalid character escape")),
    }
}

fn parse_raw_string(s: &Source<'_>, start: usize) -> PResult<Option<(KdlLiteral, usize)>> {
    let hash_start = start + 1;
    let mut i = hash_start;
    while s.at(i) == Some('#') {
        i += 1;
    }
    let hashes = i - hash_start;
    if s.at(i) != Some('"') {
        return Ok(None);
    }
    i += 1;
    let body_start = i;
    loop {
        match s.at(i) {
            None => {
                return Err(s.error(start, "Hit EOF while looking for the end of the raw string"))
            }
            Some('"') => {
                let body_end = i;
                let mut j = i + 1;
                while s.at(j) == Some('#') {
                    j += 1;
                }
                let count = j - (i + 1);
                if count == hashes {
                    let value = s.text[body_start..body_end].to_string();
                    return Ok(Some((KdlLiteral::RawString { value, hashes }, j)));
                }
                if count > hashes {
                    return Err(s.error(
                        i + 1,
                        format!("Expected {hashes} hashes at the end of a raw string; got {count}"),
                    ));
                }
                i = j;
            }
            Some(c) => i += c.len_utf8(),
        }
    }
}

// --- whitespace, comments, continuations ---

fn parse_newline(s: &Source<'_>, i: usize) -> Option<usize> {
    match s.at(i) {
        Some('\r') if s.at(i + 1) == Some('\n') => Some(i + 2),
        Some(c) if is_newline_char(c) => Some(i + c.len_utf8()),
        _ => None,
    }
}

/// Non-newline whitespace: unicode spaces and block comments, zero or
/// more of each.
fn parse_whitespace(s: &Source<'_>, start: usize) -> PResult<usize> {
    let mut i = start;
    loop {
        let mut progressed = false;
        while let Some(c) = s.at(i).filter(|c| is_unicode_space(*c)) {
            i += c.len_utf8();
            progressed = true;
        }
        if let Some(next) = parse_block_comment(s, i)? {
            i = next;
            progressed = true;
        }
        if !progressed {
            return Ok(i);
        }
    }
}

/// Whitespace legal between nodes: spaces, newlines, and single-line
/// comments.
fn parse_linespace(s: &Source<'_>, start: usize) -> PResult<usize> {
    let mut i = start;
    loop {
        if let Some(next) = parse_newline(s, i) {
            i = next;
            continue;
        }
        let next = parse_whitespace(s, i)?;
        if next != i {
            i = next;
            continue;
        }
        if let Some(next) = parse_single_line_comment(s, i) {
            i = next;
            continue;
        }
        return Ok(i);
    }
}

/// Whitespace legal inside a node: spaces plus `\` line continuations.
fn parse_nodespace(s: &Source<'_>, start: usize) -> PResult<usize> {
    let mut i = start;
    loop {
        let after_space = parse_whitespace(s, i)?;
        match parse_escline(s, after_space)? {
            Some(next) => i = next,
            None => return Ok(after_space),
        }
    }
}

fn parse_escline(s: &Source<'_>, start: usize) -> PResult<Option<usize>> {
    if s.at(start) != Some('\\') {
        return Ok(None);
    }
    let i = parse_whitespace(s, start + 1)?;
    if let Some(next) = parse_newline(s, i) {
        return Ok(Some(next));
    }
    if let Some(next) = parse_single_line_comment(s, i) {
        return Ok(Some(next));
    }
    Err(s.error(start, "Expected a newline after the line continuation"))
}

fn parse_slashdash(s: &Source<'_>, start: usize) -> PResult<Option<usize>> {
    if s.at(start) == Some('/') && s.at(start + 1) == Some('-') {
        let i = parse_nodespace(s, start + 2)?;
        Ok(Some(i))
    } else {
        Ok(None)
    }
}

fn parse_single_line_comment(s: &Source<'_>, start: usize) -> Option<usize> {
    if !(s.at(start) == Some('/') && s.at(start + 1) == Some('/')) {
        return None;
    }
    let mut i = start + 2;
    while let Some(c) = s.at(i) {
        if is_newline_char(c) {
            break;
        }
        i += c.len_utf8();
    }
    if let Some(next) = parse_newline(s, i) {
        i = next;
    }
    Some(i)
}

fn parse_block_comment(s: &Source<'_>, start: usize) -> PResult<Option<usize>> {
    if !(s.at(start) == Some('/') && s.at(start + 1) == Some('*')) {
        return Ok(None);
    }
    let mut depth = 1;
    let mut i = start + 2;
    while depth > 0 {
        if s.eof(i) {
            return Err(s.error(start, "Hit EOF while inside a multiline comment"));
        }
        if s.at(i) == Some('*') && s.at(i + 1) == Some('/') {
            depth -= 1;
            i += 2;
        } else if s.at(i) == Some('/') && s.at(i + 1) == Some('*') {
            depth += 1;
            i += 2;
        } else if let Some(c) = s.at(i) {
            i += c.len_utf8();
        }
    }
    Ok(Some(i))
}
