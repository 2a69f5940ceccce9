//! The envelope a lane wraps around each outgoing record.
//!
//! ```text
//! 0 Event:     [0][map operation frame]
//! 1 SyncEvent: [1][remote id][map operation frame]
//! 2 Synced:    [2][remote id]
//! 3 Linked:    [3][remote id]
//! 4 Unlinked:  [4][remote id]
//! ```

use thiserror::Error;

use lanelink_serde::{ByteReader, ByteWrite, SerdeErr};

use crate::{
    map::{
        codec::{encode_map_operation, frame_len, MapOperationDecoder},
        error::MapCodecError,
        map_operation::{MapOperation, RawMapOperation},
    },
    types::RemoteId,
};

const EVENT: u8 = 0;
const SYNC_EVENT: u8 = 1;
const SYNCED: u8 = 2;
const LINKED: u8 = 3;
const UNLINKED: u8 = 4;

const KIND_BYTES: usize = 1;
const REMOTE_BYTES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("Truncated response: {0}")]
    Truncated(#[from] SerdeErr),

    #[error("Unknown response kind {kind}")]
    UnknownKind { kind: u8 },

    #[error("Malformed map operation: {0}")]
    Codec(#[from] MapCodecError),
}

/// A lane's message to its remotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneResponse<T> {
    /// Live operation, sent to every linked remote
    Event(T),
    /// One step of a remote's initial sync
    SyncEvent { remote: RemoteId, body: T },
    /// The remote's sync has finished
    Synced(RemoteId),
    Linked(RemoteId),
    Unlinked(RemoteId),
}

impl<T> LaneResponse<T> {
    pub fn remote(&self) -> Option<RemoteId> {
        match self {
            LaneResponse::Event(_) => None,
            LaneResponse::SyncEvent { remote, .. }
            | LaneResponse::Synced(remote)
            | LaneResponse::Linked(remote)
            | LaneResponse::Unlinked(remote) => Some(*remote),
        }
    }
}

impl<K: AsRef<[u8]>, V: AsRef<[u8]>> LaneResponse<MapOperation<K, V>> {
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        match self {
            LaneResponse::Event(operation) => write_event(operation, writer),
            LaneResponse::SyncEvent { remote, body } => write_sync_event(*remote, body, writer),
            LaneResponse::Synced(remote) => write_synced(*remote, writer),
            LaneResponse::Linked(remote) => write_marker(LINKED, *remote, writer),
            LaneResponse::Unlinked(remote) => write_marker(UNLINKED, *remote, writer),
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            LaneResponse::Event(operation) => KIND_BYTES + frame_len(operation),
            LaneResponse::SyncEvent { body, .. } => KIND_BYTES + REMOTE_BYTES + frame_len(body),
            _ => KIND_BYTES + REMOTE_BYTES,
        }
    }
}

impl LaneResponse<RawMapOperation> {
    pub fn read(reader: &mut ByteReader) -> Result<Self, ResponseError> {
        let kind = reader.read_byte()?;
        Ok(match kind {
            EVENT => LaneResponse::Event(MapOperationDecoder::decode(reader)?),
            SYNC_EVENT => {
                let remote = RemoteId(reader.read_u64()?);
                let body = MapOperationDecoder::decode(reader)?;
                LaneResponse::SyncEvent { remote, body }
            }
            SYNCED => LaneResponse::Synced(RemoteId(reader.read_u64()?)),
            LINKED => LaneResponse::Linked(RemoteId(reader.read_u64()?)),
            UNLINKED => LaneResponse::Unlinked(RemoteId(reader.read_u64()?)),
            kind => return Err(ResponseError::UnknownKind { kind }),
        })
    }
}

pub fn write_event<K: AsRef<[u8]>, V: AsRef<[u8]>>(
    operation: &MapOperation<K, V>,
    writer: &mut dyn ByteWrite,
) {
    writer.write_byte(EVENT);
    encode_map_operation(operation, writer);
}

pub fn write_sync_event<K: AsRef<[u8]>, V: AsRef<[u8]>>(
    remote: RemoteId,
    operation: &MapOperation<K, V>,
    writer: &mut dyn ByteWrite,
) {
    writer.write_byte(SYNC_EVENT);
    writer.write_u64(remote.0);
    encode_map_operation(operation, writer);
}

pub fn write_synced(remote: RemoteId, writer: &mut dyn ByteWrite) {
    write_marker(SYNCED, remote, writer);
}

pub fn write_linked(remote: RemoteId, writer: &mut dyn ByteWrite) {
    write_marker(LINKED, remote, writer);
}

pub fn write_unlinked(remote: RemoteId, writer: &mut dyn ByteWrite) {
    write_marker(UNLINKED, remote, writer);
}

fn write_marker(kind: u8, remote: RemoteId, writer: &mut dyn ByteWrite) {
    writer.write_byte(kind);
    writer.write_u64(remote.0);
}
