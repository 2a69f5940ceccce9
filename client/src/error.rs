use thiserror::Error;

use lanelink_shared::{FormError, ResponseError};

use crate::observer::ObserverError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownlinkError {
    /// The lane response could not be framed; the link should be dropped
    #[error("Malformed lane response: {0}")]
    Response(#[from] ResponseError),

    /// A key or value payload did not decode as the downlink's types
    #[error("Could not decode payload: {0}")]
    Form(#[from] FormError),

    /// The cache was updated, but an observer callback failed
    #[error("{0}")]
    Observer(#[from] ObserverError),
}
