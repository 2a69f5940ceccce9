//! `Form`: the key/value codec that turns values into Recon text and back.
//!
//! Typed record codecs are generated elsewhere; this module carries the
//! trait and the implementations for primitive types, which decode through
//! the event parser.

use thiserror::Error;

use crate::recon::{
    error::ReconError,
    event::{NumericLiteral, ReadEvent},
    parser::parse_events,
    printer::print_compact,
};

/// Errors raised while decoding a `Form` payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The payload bytes are not UTF-8
    #[error("Payload is not valid UTF-8")]
    InvalidUtf8,

    /// The payload is not well-formed Recon
    #[error("Payload is not valid Recon: {0}")]
    Parse(#[from] ReconError),

    /// The payload parsed, but does not describe the target type
    #[error("Expected {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: String,
    },

    /// A number that does not fit the target type
    #[error("Number {value} is out of range for {target}")]
    OutOfRange {
        value: String,
        target: &'static str,
    },
}

/// Round-trip codec between a type and compact Recon text.
///
/// `decode(encode(x).as_bytes())` must reproduce `x`.
pub trait Form: Sized {
    fn encode(&self) -> String;
    fn decode(bytes: &[u8]) -> Result<Self, FormError>;
}

/// Parse `bytes` and require it to hold exactly one primitive event.
fn single_event(bytes: &[u8], expected: &'static str) -> Result<ReadEvent, FormError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FormError::InvalidUtf8)?;
    let mut events = parse_events(text)?;
    if events.len() == 1 {
        if let Some(event) = events.pop() {
            return Ok(event);
        }
    }
    Err(FormError::UnexpectedValue {
        expected,
        found: print_compact(&events),
    })
}

fn unexpected(expected: &'static str, event: &ReadEvent) -> FormError {
    FormError::UnexpectedValue {
        expected,
        found: print_compact(std::slice::from_ref(event)),
    }
}

impl Form for String {
    fn encode(&self) -> String {
        print_compact(&[ReadEvent::Text(self.clone())])
    }

    fn decode(bytes: &[u8]) -> Result<Self, FormError> {
        match single_event(bytes, "text")? {
            ReadEvent::Text(text) => Ok(text),
            other => Err(unexpected("text", &other)),
        }
    }
}

impl Form for bool {
    fn encode(&self) -> String {
        print_compact(&[ReadEvent::Boolean(*self)])
    }

    fn decode(bytes: &[u8]) -> Result<Self, FormError> {
        match single_event(bytes, "boolean")? {
            ReadEvent::Boolean(value) => Ok(value),
            other => Err(unexpected("boolean", &other)),
        }
    }
}

impl Form for Vec<u8> {
    fn encode(&self) -> String {
        print_compact(&[ReadEvent::Blob(self.clone())])
    }

    fn decode(bytes: &[u8]) -> Result<Self, FormError> {
        match single_event(bytes, "blob")? {
            ReadEvent::Blob(blob) => Ok(blob),
            other => Err(unexpected("blob", &other)),
        }
    }
}

impl Form for f64 {
    fn encode(&self) -> String {
        print_compact(&[ReadEvent::Number(NumericLiteral::Float(*self))])
    }

    fn decode(bytes: &[u8]) -> Result<Self, FormError> {
        match single_event(bytes, "number")? {
            ReadEvent::Number(NumericLiteral::Float(n)) => Ok(n),
            ReadEvent::Number(NumericLiteral::Int(n)) => Ok(n as f64),
            ReadEvent::Number(NumericLiteral::UInt(n)) => Ok(n as f64),
            other => Err(unexpected("number", &other)),
        }
    }
}

macro_rules! impl_integer_form {
    ($($ty:ty),*) => {
        $(
            impl Form for $ty {
                fn encode(&self) -> String {
                    self.to_string()
                }

                fn decode(bytes: &[u8]) -> Result<Self, FormError> {
                    let target = stringify!($ty);
                    let out_of_range = |value: String| FormError::OutOfRange { value, target };
                    match single_event(bytes, target)? {
                        ReadEvent::Number(NumericLiteral::Int(n)) => {
                            <$ty>::try_from(n).map_err(|_| out_of_range(n.to_string()))
                        }
                        ReadEvent::Number(NumericLiteral::UInt(n)) => {
                            <$ty>::try_from(n).map_err(|_| out_of_range(n.to_string()))
                        }
                        other => Err(unexpected(target, &other)),
                    }
                }
            }
        )*
    };
}

impl_integer_form!(i32, i64, u32, u64);
