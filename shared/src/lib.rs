//! # Lanelink Shared
//! Common functionality shared between lanelink-server & lanelink-client crates:
//! the incremental Recon event parser and printer, the `Form` codec, the
//! map-operation wire codec and the lane response envelope.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use lanelink_serde::{
    ByteCounter, ByteReader, ByteWrite, FrameWriter, SerdeErr, StreamWriter,
};

mod form;
mod map;
mod response;
mod types;

pub mod recon;

pub use form::{Form, FormError};
pub use map::{
    codec::{encode_map_operation, frame_len, MapOperationDecoder, CLEAR_TAG, REMOVE_TAG, UPDATE_TAG},
    error::MapCodecError,
    map_operation::{MapOperation, RawMapOperation},
};
pub use recon::{
    error::{ReconError, ReconErrorKind},
    event::{NumericLiteral, ReadEvent},
    parser::{parse_events, FeedResult, ReconParser},
    parser_config::ParserConfig,
    printer::print_compact,
    transition::{NestingContext, StateChange},
};
pub use response::{
    write_event, write_linked, write_sync_event, write_synced, write_unlinked, LaneResponse,
    ResponseError,
};
pub use types::RemoteId;
