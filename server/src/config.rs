use std::default::Default;

/// Contains Config properties which will be used by a MapLane
#[derive(Clone, Debug)]
pub struct MapLaneConfig {
    /// Whether the first write attempt of a lane prefers its sync queue over
    /// its queue of live operations. The preference alternates after every
    /// attempt from there on.
    pub sync_first: bool,
}

impl Default for MapLaneConfig {
    fn default() -> Self {
        Self { sync_first: true }
    }
}
