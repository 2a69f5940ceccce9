use thiserror::Error;

/// Cause of a terminal parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconErrorKind {
    /// A character that cannot appear at this position
    #[error("unexpected character {found:?}")]
    UnexpectedCharacter { found: char },

    /// Input ended where a token was required
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Input ended inside a quoted string
    #[error("unclosed string literal")]
    UnclosedString,

    /// Input ended inside a `{...}` body
    #[error("unclosed record body")]
    UnclosedRecord,

    /// Input ended inside an `@name(...)` body
    #[error("unclosed attribute body")]
    UnclosedAttribute,

    /// A backslash escape that is not recognised, or a bad `\u` sequence
    #[error("invalid escape sequence")]
    InvalidEscape,

    /// Malformed numeric literal
    #[error("invalid numeric literal")]
    InvalidNumber,

    /// `%` followed by text that is not valid base64
    #[error("invalid base64 blob")]
    InvalidBlob,

    /// Nesting exceeded the configured depth
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// The final chunk was already fed or the parse failed; construct a new one
    #[error("parser has already finished")]
    ParserFinished,
}

/// A terminal parse error: the cause plus the byte offset in the stream
/// where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte offset {offset}")]
pub struct ReconError {
    pub kind: ReconErrorKind,
    pub offset: usize,
}

impl ReconError {
    pub fn new(kind: ReconErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}
