use std::fmt;

/// Identifies the remote end of one link to a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteId(pub u64);

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote#{}", self.0)
    }
}

impl From<u64> for RemoteId {
    fn from(id: u64) -> Self {
        RemoteId(id)
    }
}
