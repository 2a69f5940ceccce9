//! # Lanelink Client
//! Map downlinks: a local, insertion-ordered mirror of a remote map lane,
//! kept in step by the lane's responses and reported to an observer.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use lanelink_shared::{LaneResponse, MapOperation, RawMapOperation, RemoteId};

mod config;
mod error;
mod map_downlink;
mod observer;
mod operation;

pub use config::DownlinkConfig;
pub use error::DownlinkError;
pub use map_downlink::MapDownlink;
pub use observer::{MapDownlinkObserver, ObserverError};
pub use operation::MapClientOperation;
