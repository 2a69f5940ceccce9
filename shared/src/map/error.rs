use thiserror::Error;

use lanelink_serde::SerdeErr;

/// Framing failures while decoding a map-operation frame.
///
/// Any of these is fatal for the frame it was raised on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapCodecError {
    /// A length field itself could not be read
    #[error("Truncated length field: {0}")]
    Truncated(#[from] SerdeErr),

    /// The total length field declares more bytes than were received
    #[error("Frame declares {declared} bytes but only {available} are available")]
    TruncatedFrame { declared: usize, available: usize },

    /// A total length of zero leaves no room for the tag byte
    #[error("Frame has a total length of zero")]
    EmptyFrame,

    #[error("Unknown map operation tag {tag}")]
    UnknownTag { tag: u8 },

    /// Clear frames carry exactly the tag byte
    #[error("Clear frame must have a total length of 1, found {length}")]
    InvalidClearLength { length: usize },

    /// An Update frame too short to hold its key length field
    #[error("Update frame of length {length} has no room for a key length")]
    MissingKeyLength { length: usize },

    #[error("Key length {key_length} exceeds the {available} bytes left in the frame")]
    KeyLengthExceedsFrame { key_length: usize, available: usize },
}
