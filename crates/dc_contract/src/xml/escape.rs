//! Text and attribute escaping.
//!
//! Markup characters become entities. Control characters below `0x20`
//! become hexadecimal character references (`&#x6;`), except tab and line
//! feed in text. Carriage returns are always escaped so they survive
//! line-end normalization.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt::Write;

use crate::error::{Error, Result};

#[inline]
fn needs_text_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>') || (c < '\u{20}' && c != '\t' && c != '\n')
}

#[inline]
fn needs_attribute_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"') || c < '\u{20}'
}

fn escape_with(input: &str, needs_escape: fn(char) -> bool) -> Cow<'_, str> {
    let Some(first) = input.find(needs_escape) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 8);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if needs_escape('"') => out.push_str("&quot;"),
            c if needs_escape(c) => {
                let _ = write!(out, "&#x{:X};", u32::from(c));
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes element text content.
///
/// ```
/// use dc_contract::xml::escape_text;
///
/// assert_eq!(escape_text("a < b"), "a &lt; b");
/// assert_eq!(escape_text("bell\u{6}"), "bell&#x6;");
/// assert_eq!(escape_text("line\r\n"), "line&#xD;\n");
/// ```
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape_with(input, needs_text_escape)
}

/// Escapes a double-quoted attribute value.
///
/// ```
/// use dc_contract::xml::escape_attribute;
///
/// assert_eq!(escape_attribute("say \"hi\"\t"), "say &quot;hi&quot;&#x9;");
/// ```
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    escape_with(input, needs_attribute_escape)
}

/// Resolves the predefined entities and character references.
///
/// ```
/// use dc_contract::xml::unescape;
///
/// assert_eq!(unescape("&lt;&#x6;&#65;&apos;").unwrap(), "<\u{6}A'");
/// assert!(unescape("&bogus;").is_err());
/// ```
pub fn unescape(input: &str) -> Result<Cow<'_, str>> {
    quick_xml::escape::unescape(input).map_err(|e| Error::MalformedContent(e.to_string()))
}

/// Applies XML line-end normalization to raw text: `\r\n` and lone `\r`
/// become `\n`.
pub(crate) fn normalize_line_ends(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Applies attribute-value normalization to raw text: literal tab, line
/// feed and carriage return become spaces.
pub(crate) fn normalize_attribute(input: &str) -> Cow<'_, str> {
    if !input.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(
        normalize_line_ends(input)
            .chars()
            .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
            .collect(),
    )
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{escape_attribute, escape_text, normalize_attribute, normalize_line_ends, unescape};

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_text("plain"), alloc::borrow::Cow::Borrowed(_)));
        assert!(matches!(unescape("plain").unwrap(), alloc::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn control_characters_round_trip() {
        let raw = "a\u{6}b\u{1F}c\rd";
        let escaped = escape_text(raw);
        assert_eq!(escaped, "a&#x6;b&#x1F;c&#xD;d");
        assert_eq!(unescape(&escaped).unwrap(), raw);
    }

    #[test]
    fn attributes_escape_whitespace() {
        assert_eq!(escape_attribute("a\nb\rc"), "a&#xA;b&#xD;c");
        assert_eq!(escape_attribute("x<y&z"), "x&lt;y&amp;z");
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_line_ends("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(normalize_attribute("a\tb\r\nc"), "a b c");
    }

    #[test]
    fn bad_references() {
        assert!(unescape("&#xZZ;").is_err());
        assert!(unescape("a & b").is_err());
        assert!(unescape("&#0;").is_err());
    }
}
