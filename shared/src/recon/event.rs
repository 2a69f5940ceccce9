//! Parser events: the flat, token-level output of the Recon parser.
//!
//! Structure is represented by start/end pairs, emitted in exactly the order
//! the text nests:
//!
//! `@point(x: 1) {label}` emits:
//! ```text
//! StartAttribute("point")
//! Text("x")
//! Slot
//! Number(Int(1))
//! EndAttribute
//! StartBody
//! Text("label")
//! EndRecord
//! ```
//!
//! A slot is emitted between its key and its value events.

use std::fmt;

/// A numeric literal as written in Recon text.
///
/// Integers fitting `i64` are `Int`, larger positive integers are `UInt`,
/// anything with a fraction or exponent (or too large for either) is `Float`.
#[derive(Debug, Clone, Copy)]
pub enum NumericLiteral {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl PartialEq for NumericLiteral {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumericLiteral::Int(a), NumericLiteral::Int(b)) => a == b,
            (NumericLiteral::UInt(a), NumericLiteral::UInt(b)) => a == b,
            // NaN is equal to itself here, so event sequences compare reflexively
            (NumericLiteral::Float(a), NumericLiteral::Float(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            _ => false,
        }
    }
}

impl fmt::Display for NumericLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericLiteral::Int(n) => write!(f, "{}", n),
            NumericLiteral::UInt(n) => write!(f, "{}", n),
            NumericLiteral::Float(n) if n.is_nan() => f.write_str("nan"),
            NumericLiteral::Float(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_negative() { "-inf" } else { "inf" })
            }
            NumericLiteral::Float(n) => write!(f, "{:?}", n),
        }
    }
}

/// Parser output events.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadEvent {
    // ========== Value Events ==========

    /// An absent value: empty input, an empty item or an empty slot side
    Extant,

    /// `true` or `false`
    Boolean(bool),

    /// Integer or floating point literal, including `nan` and `inf`
    Number(NumericLiteral),

    /// Quoted string or bare identifier
    Text(String),

    /// `%`-prefixed base64 blob, decoded
    Blob(Vec<u8>),

    // ========== Structure Events ==========

    /// `@name`; the attribute's arguments (if any) follow until `EndAttribute`
    StartAttribute(String),

    /// End of an attribute's arguments
    EndAttribute,

    /// `{`, or the implicit body of a record whose attributes have been read
    StartBody,

    /// End of a record body
    EndRecord,

    /// `:` between a slot key and its value
    Slot,
}

impl ReadEvent {
    /// Check if this is a primitive value event.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ReadEvent::Extant
                | ReadEvent::Boolean(_)
                | ReadEvent::Number(_)
                | ReadEvent::Text(_)
                | ReadEvent::Blob(_)
        )
    }

    /// Check if this is a structure start event (has matching end).
    pub fn is_structure_start(&self) -> bool {
        matches!(self, ReadEvent::StartAttribute(_) | ReadEvent::StartBody)
    }

    /// Check if this is a structure end event.
    pub fn is_structure_end(&self) -> bool {
        matches!(self, ReadEvent::EndAttribute | ReadEvent::EndRecord)
    }
}

impl From<bool> for ReadEvent {
    fn from(value: bool) -> Self {
        ReadEvent::Boolean(value)
    }
}

impl From<i64> for ReadEvent {
    fn from(value: i64) -> Self {
        ReadEvent::Number(NumericLiteral::Int(value))
    }
}

impl From<f64> for ReadEvent {
    fn from(value: f64) -> Self {
        ReadEvent::Number(NumericLiteral::Float(value))
    }
}

impl From<&str> for ReadEvent {
    fn from(value: &str) -> Self {
        ReadEvent::Text(value.to_string())
    }
}
