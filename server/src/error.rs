use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapLaneError {
    /// A single record is larger than the writer could ever hold, so retrying
    /// after a flush would never make progress
    #[error("Record of {needed} bytes can never fit in a write buffer of {capacity} bytes")]
    FrameExceedsBuffer { needed: usize, capacity: usize },
}
