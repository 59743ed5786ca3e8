//! Character classes and quoting rules shared by the parser and the
//! printer.

/// All line-break unicode whitespace. CRLF is handled by the parser so
/// that it counts as a single break.
pub(crate) fn is_newline_char(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0085}' | '\u{000C}' | '\u{2028}' | '\u{2029}'
    )
}

/// The KDL `ws` production (non-newline whitespace), including the BOM.
pub(crate) fn is_unicode_space(c: char) -> bool {
    matches!(
        c,
        '\t' | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

pub(crate) fn is_ident_char(c: char) -> bool {
    !matches!(
        c,
        '\\' | '/' | '(' | ')' | '{' | '}' | '<' | '>' | ';' | '[' | ']' | '=' | ',' | '"'
    ) && !is_unicode_space(c)
        && !is_newline_char(c)
        && (c as u32) > 0x20
}

pub(crate) fn is_keyword(ident: &str) -> bool {
    matches!(ident, "null" | "true" | "false")
}

pub(crate) fn is_sign(c: char) -> bool {
    matches!(c, '+' | '-')
}

pub(crate) fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

pub(crate) fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

/// Whether `chars` re-lexes as a single bare identifier: identifier
/// characters throughout, no leading digit (or sign-then-digit, which
/// would start a number), and not a keyword.
pub(crate) fn is_bare_ident(chars: &str) -> bool {
    let mut iter = chars.chars();
    let Some(first) = iter.next() else {
        return false;
    };
    if !is_ident_char(first) || first.is_ascii_digit() {
        return false;
    }
    if is_sign(first) && iter.clone().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    iter.all(is_ident_char) && !is_keyword(chars)
}

/// Quotes and escapes `chars` unless it can be emitted as a bare
/// identifier.
pub(crate) fn print_ident(chars: &str) -> String {
    if is_bare_ident(chars) {
        chars.into()
    } else {
        format!("\"{}\"", escape_string(chars))
    }
}

/// Escapes a string body for `"…"` output: the named KDL escapes, plus
/// `\u{…}` for any other control character.
pub(crate) fn escape_string(chars: &str) -> String {
    let mut out = String::with_capacity(chars.len());
    for c in chars.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// The minimum number of hashes a raw string needs so that its body
/// contains no terminating `"#…#` sequence.
pub(crate) fn required_hashes(chars: &str) -> usize {
    let mut hashes = 0;
    loop {
        let ender = format!("\"{}", "#".repeat(hashes));
        if !chars.contains(&ender) {
            return hashes;
        }
        hashes += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_idents() {
        assert!(is_bare_ident("foo"));
        assert!(is_bare_ident("foo123~!@$%^&*.:'|?"));
        assert!(is_bare_ident("+foo"));
        assert!(is_bare_ident("-"));
        assert!(!is_bare_ident(""));
        assert!(!is_bare_ident("123"));
        assert!(!is_bare_ident("+1"));
        assert!(!is_bare_ident("-0b"));
        assert!(!is_bare_ident("true"));
        assert!(!is_bare_ident("has space"));
        assert!(!is_bare_ident("semi;colon"));
    }

    #[test]
    fn ident_printing() {
        assert_eq!(print_ident("foo"), "foo");
        assert_eq!(print_ident("two words"), r#""two words""#);
        assert_eq!(print_ident("null"), r#""null""#);
        assert_eq!(print_ident("say \"hi\""), r#""say \"hi\"""#);
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_string("a\nb\tc"), "a\\nb\\tc");
        assert_eq!(escape_string("back\\slash"), "back\\\\slash");
        assert_eq!(escape_string("\u{7}"), "\\u{7}");
    }

    #[test]
    fn hash_counts() {
        assert_eq!(required_hashes("plain"), 0);
        assert_eq!(required_hashes("a \"quoted\" b"), 1);
        assert_eq!(required_hashes("ends with \"#"), 2);
    }
}
