//! Character classes for Recon tokens.

use unicode_xid::UnicodeXID;

#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_xid_start()
}

#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c == '-' || c.is_xid_continue()
}

/// Whether the whole of `text` would lex as one identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_char),
        _ => false,
    }
}

#[inline]
pub fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
pub fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

#[inline]
pub fn is_space(c: char) -> bool {
    is_inline_space(c) || is_newline(c)
}

#[inline]
pub fn is_number_start(c: char) -> bool {
    c == '-' || c.is_ascii_digit()
}

#[inline]
pub fn is_blob_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='
}

#[inline]
pub fn is_item_separator(c: char) -> bool {
    c == ',' || c == ';'
}

/// Identifiers that lex as something other than text.
pub fn is_keyword(text: &str) -> bool {
    text == "true" || text == "false" || non_finite_value(text).is_some()
}

/// `nan`, `inf` and `infinity` in any letter case.
pub fn non_finite_value(text: &str) -> Option<f64> {
    if text.eq_ignore_ascii_case("nan") {
        Some(f64::NAN)
    } else if text.eq_ignore_ascii_case("inf") || text.eq_ignore_ascii_case("infinity") {
        Some(f64::INFINITY)
    } else {
        None
    }
}
