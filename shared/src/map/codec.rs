//! Binary framing of map operations.
//!
//! All integers are big-endian u64, payloads are compact Recon text:
//!
//! ```text
//! Update: [total][0][key length][key][value]
//! Remove: [total][1][key]
//! Clear:  [total = 1][2]
//! ```
//!
//! `total` counts every byte after itself. Only the framing integers are
//! validated here; payloads are decoded later by the caller's `Form`.

use lanelink_serde::{ByteReader, ByteWrite};

use super::{error::MapCodecError, map_operation::MapOperation, map_operation::RawMapOperation};

pub const UPDATE_TAG: u8 = 0;
pub const REMOVE_TAG: u8 = 1;
pub const CLEAR_TAG: u8 = 2;

const LENGTH_BYTES: usize = 8;
const TAG_BYTES: usize = 1;

/// Number of bytes [`encode_map_operation`] writes for `operation`,
/// including the total length field.
pub fn frame_len<K: AsRef<[u8]>, V: AsRef<[u8]>>(operation: &MapOperation<K, V>) -> usize {
    LENGTH_BYTES + body_len(operation)
}

fn body_len<K: AsRef<[u8]>, V: AsRef<[u8]>>(operation: &MapOperation<K, V>) -> usize {
    match operation {
        MapOperation::Update { key, value } => {
            TAG_BYTES + LENGTH_BYTES + key.as_ref().len() + value.as_ref().len()
        }
        MapOperation::Remove { key } => TAG_BYTES + key.as_ref().len(),
        MapOperation::Clear => TAG_BYTES,
    }
}

/// Writes one self-delimited frame. Works against a `ByteCounter` as well,
/// which is how callers check for room before writing.
pub fn encode_map_operation<K: AsRef<[u8]>, V: AsRef<[u8]>>(
    operation: &MapOperation<K, V>,
    writer: &mut dyn ByteWrite,
) {
    writer.write_u64(body_len(operation) as u64);
    match operation {
        MapOperation::Update { key, value } => {
            let key = key.as_ref();
            writer.write_byte(UPDATE_TAG);
            writer.write_u64(key.len() as u64);
            writer.write_bytes(key);
            writer.write_bytes(value.as_ref());
        }
        MapOperation::Remove { key } => {
            writer.write_byte(REMOVE_TAG);
            writer.write_bytes(key.as_ref());
        }
        MapOperation::Clear => {
            writer.write_byte(CLEAR_TAG);
        }
    }
}

/// Reads map-operation frames off a [`ByteReader`].
pub struct MapOperationDecoder;

impl MapOperationDecoder {
    /// Decodes exactly one frame. On success the reader sits on the first
    /// byte after the frame; on failure its position is unspecified and the
    /// rest of the buffer should be discarded.
    pub fn decode(reader: &mut ByteReader) -> Result<RawMapOperation, MapCodecError> {
        let total = reader.read_length()?;
        let available = reader.bytes_remaining();
        if total > available {
            return Err(MapCodecError::TruncatedFrame {
                declared: total,
                available,
            });
        }
        if total == 0 {
            return Err(MapCodecError::EmptyFrame);
        }
        let mut frame = ByteReader::new(reader.read_bytes(total)?);

        let tag = frame.read_byte()?;
        match tag {
            UPDATE_TAG => {
                if frame.bytes_remaining() < LENGTH_BYTES {
                    return Err(MapCodecError::MissingKeyLength { length: total });
                }
                let key_length = frame.read_length()?;
                let available = frame.bytes_remaining();
                if key_length > available {
                    return Err(MapCodecError::KeyLengthExceedsFrame {
                        key_length,
                        available,
                    });
                }
                let key = frame.read_bytes(key_length)?.to_vec();
                let value = frame.read_bytes(frame.bytes_remaining())?.to_vec();
                Ok(MapOperation::Update { key, value })
            }
            REMOVE_TAG => {
                let key = frame.read_bytes(frame.bytes_remaining())?.to_vec();
                Ok(MapOperation::Remove { key })
            }
            CLEAR_TAG => {
                if total != TAG_BYTES {
                    return Err(MapCodecError::InvalidClearLength { length: total });
                }
                Ok(MapOperation::Clear)
            }
            tag => Err(MapCodecError::UnknownTag { tag }),
        }
    }
}
