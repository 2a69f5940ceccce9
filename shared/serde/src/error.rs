use thiserror::Error;

/// Errors raised while reading bytes from a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Fewer bytes remained than the read required
    #[error("Unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEnd { needed: usize, available: usize },

    /// A length field does not fit in the address space of this platform
    #[error("Length {length} does not fit in usize")]
    LengthOverflow { length: u64 },
}
