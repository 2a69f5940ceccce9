use std::{collections::BTreeMap, hash::Hash};

use lanelink_client::{DownlinkConfig, DownlinkError, MapDownlink};
use lanelink_server::{FrameWriter, LaneId, MapLane, MapLaneConfig, MapLaneError, WriteResult};
use lanelink_shared::{ByteReader, Form, LaneResponse, RemoteId, ResponseError};

use crate::event_log::EventLog;

/// Failures surfaced while pumping records from the lane to its downlinks.
#[derive(Debug)]
pub enum LinkError {
    Lane(MapLaneError),
    Response(ResponseError),
    Downlink(RemoteId, DownlinkError),
}

/// A map lane wired to any number of downlinks through real encoded
/// buffers of a fixed size.
///
/// Records addressed to one remote go only to that remote's downlink; live
/// events go to every linked downlink.
pub struct TestLink<K: Clone, V: Clone> {
    lane: MapLane<K, V, Vec<LaneId>>,
    downlinks: BTreeMap<RemoteId, MapDownlink<K, V, EventLog<K, V>>>,
    writer: FrameWriter,
}

impl<K, V> TestLink<K, V>
where
    K: Eq + Hash + Clone + Form,
    V: Clone + Form,
{
    pub fn new(buffer_capacity: usize) -> Self {
        Self::with_config(buffer_capacity, MapLaneConfig::default())
    }

    pub fn with_config(buffer_capacity: usize, config: MapLaneConfig) -> Self {
        Self {
            lane: MapLane::with_collector(LaneId(1), Vec::new(), config),
            downlinks: BTreeMap::new(),
            writer: FrameWriter::with_capacity(buffer_capacity),
        }
    }

    pub fn lane(&self) -> &MapLane<K, V, Vec<LaneId>> {
        &self.lane
    }

    pub fn lane_mut(&mut self) -> &mut MapLane<K, V, Vec<LaneId>> {
        &mut self.lane
    }

    pub fn downlink(&self, remote: RemoteId) -> Option<&MapDownlink<K, V, EventLog<K, V>>> {
        self.downlinks.get(&remote)
    }

    pub fn downlink_mut(
        &mut self,
        remote: RemoteId,
    ) -> Option<&mut MapDownlink<K, V, EventLog<K, V>>> {
        self.downlinks.get_mut(&remote)
    }

    /// Opens a downlink for `remote` and queues its sync.
    pub fn link(&mut self, remote: RemoteId) -> Result<(), LinkError> {
        let mut downlink =
            MapDownlink::with_observer(EventLog::default(), DownlinkConfig::default());
        downlink
            .on_response(LaneResponse::Linked(remote))
            .map_err(|error| LinkError::Downlink(remote, error))?;
        self.downlinks.insert(remote, downlink);
        self.lane.sync(remote);
        Ok(())
    }

    pub fn unlink(&mut self, remote: RemoteId) -> Result<(), LinkError> {
        self.lane.abandon_sync(remote);
        if let Some(downlink) = self.downlinks.get_mut(&remote) {
            downlink
                .on_response(LaneResponse::Unlinked(remote))
                .map_err(|error| LinkError::Downlink(remote, error))?;
        }
        Ok(())
    }

    /// Writes one buffer and delivers it. Returns whether the lane still has
    /// records waiting.
    pub fn pump_once(&mut self) -> Result<bool, LinkError> {
        let result = self.lane.write_into(&mut self.writer).map_err(LinkError::Lane)?;
        let bytes = self.writer.flush();
        if !bytes.is_empty() {
            self.deliver(&bytes)?;
        }
        Ok(result == WriteResult::DataStillAvailable)
    }

    /// Pumps until the lane has nothing left to write.
    pub fn pump(&mut self) -> Result<(), LinkError> {
        while self.pump_once()? {}
        Ok(())
    }

    fn deliver(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let mut reader = ByteReader::new(bytes);
        while !reader.is_empty() {
            let response = LaneResponse::read(&mut reader).map_err(LinkError::Response)?;
            match response.remote() {
                Some(remote) => {
                    if let Some(downlink) = self.downlinks.get_mut(&remote) {
                        downlink
                            .on_response(response)
                            .map_err(|error| LinkError::Downlink(remote, error))?;
                    }
                }
                None => {
                    for (remote, downlink) in self.downlinks.iter_mut() {
                        if downlink.is_linked() {
                            downlink
                                .on_response(response.clone())
                                .map_err(|error| LinkError::Downlink(*remote, error))?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
