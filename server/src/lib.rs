//! # Lanelink Server
//! Map lanes: canonical map state hosted by the server, replicated to linked
//! remotes as a stream of map-operation records.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use lanelink_shared::{FrameWriter, LaneResponse, MapOperation, RemoteId};

mod collector;
mod config;
mod error;
mod map_lane;
mod pending_writes;
mod sync_request;

pub use collector::{FlushCollector, LaneId};
pub use config::MapLaneConfig;
pub use error::MapLaneError;
pub use map_lane::MapLane;
pub use pending_writes::{PendingWrites, WriteResult};
pub use sync_request::SyncRequest;
