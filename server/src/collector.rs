use std::{fmt, sync::mpsc::Sender};

use log::warn;

/// Identifies a lane to its flush collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(pub u64);

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane#{}", self.0)
    }
}

/// Receives notice that a lane has pending writes and should be flushed.
///
/// Registration is a hand-off only: the collector never touches the lane.
pub trait FlushCollector {
    fn register(&mut self, lane: LaneId);
}

/// A lane nobody needs to hear about.
impl FlushCollector for () {
    fn register(&mut self, _: LaneId) {}
}

impl FlushCollector for Sender<LaneId> {
    fn register(&mut self, lane: LaneId) {
        if self.send(lane).is_err() {
            warn!("Flush collector for {} has hung up", lane);
        }
    }
}

impl FlushCollector for Vec<LaneId> {
    fn register(&mut self, lane: LaneId) {
        self.push(lane);
    }
}
