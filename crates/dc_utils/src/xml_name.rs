//! XML name character classes.
//!
//! Contract and member names end up as element local names, so they have
//! to be valid `NCName`s (XML names without a colon). Names that are not
//! get their offending characters encoded as `_xHHHH_`.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::Write;

/// Returns `true` if `c` may start an `NCName`.
pub fn is_ncname_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` may appear after the first character of an `NCName`.
pub fn is_ncname_char(c: char) -> bool {
    is_ncname_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Returns `true` if `name` is a non-empty `NCName`.
///
/// # Examples
///
/// ```
/// use dc_utils::xml_name::is_ncname;
///
/// assert!(is_ncname("ArrayOfint"));
/// assert!(is_ncname("_hidden.1"));
/// assert!(!is_ncname("1st"));
/// assert!(!is_ncname("a:b"));
/// assert!(!is_ncname(""));
/// ```
pub fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_ncname_start_char(first) => chars.all(is_ncname_char),
        _ => false,
    }
}

fn is_ascii_local_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => bytes.all(|b| b.is_ascii_alphanumeric()),
        _ => false,
    }
}

// `_xHHHH_` in the input must survive decoding, so its underscore is escaped.
fn looks_escaped(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() >= 7
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

fn push_escape(out: &mut String, c: char) {
    let code = c as u32;
    // Writing into a `String` cannot fail.
    let _ = if code > 0xFFFF {
        write!(out, "_x{code:08X}_")
    } else {
        write!(out, "_x{code:04X}_")
    };
}

/// Encodes `name` into a valid `NCName`.
///
/// Names that already are valid are borrowed unchanged. Otherwise every
/// character that is not allowed at its position becomes `_xHHHH_`.
///
/// # Examples
///
/// ```
/// use dc_utils::xml_name::encode_local_name;
///
/// assert_eq!(encode_local_name("Person"), "Person");
/// assert_eq!(encode_local_name("Order Line"), "Order_x0020_Line");
/// assert_eq!(encode_local_name("2D"), "_x0032_D");
/// assert_eq!(encode_local_name("a:b"), "a_x003A_b");
/// ```
pub fn encode_local_name(name: &str) -> Cow<'_, str> {
    if is_ascii_local_name(name) || (is_ncname(name) && !name.contains("_x")) {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 8);
    for (index, c) in name.char_indices() {
        let valid = if index == 0 {
            is_ncname_start_char(c)
        } else {
            is_ncname_char(c)
        };
        if !valid || (c == '_' && looks_escaped(&name[index..])) {
            push_escape(&mut out, c);
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{encode_local_name, is_ncname};

    #[test]
    fn unicode_names_stay() {
        assert!(is_ncname("Straße"));
        assert_eq!(encode_local_name("Straße"), "Straße");
    }

    #[test]
    fn escape_lookalike_is_protected() {
        assert_eq!(encode_local_name("a_x0041_"), "a_x005F_x0041_");
    }

    #[test]
    fn astral_char_uses_eight_digits() {
        assert_eq!(encode_local_name("a\u{F0000}"), "a_x000F0000_");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(encode_local_name(""), "");
    }
}
