use std::hash::Hash;

use indexmap::IndexMap;
use log::trace;

use lanelink_shared::{Form, FrameWriter, MapOperation, RemoteId};

use crate::{
    collector::{FlushCollector, LaneId},
    config::MapLaneConfig,
    error::MapLaneError,
    pending_writes::{PendingWrites, WriteResult},
    sync_request::SyncRequest,
};

/// Canonical, insertion-ordered map state of one lane.
///
/// Every mutation applies to the map, queues exactly one [`MapOperation`]
/// for linked remotes and registers the lane with its [`FlushCollector`].
/// Records are produced by [`MapLane::write_into`].
pub struct MapLane<K, V, C: FlushCollector = ()> {
    id: LaneId,
    state: IndexMap<K, V>,
    pending: PendingWrites<K, V>,
    collector: C,
}

impl<K, V> MapLane<K, V, ()> {
    pub fn new(id: LaneId) -> Self {
        Self::with_collector(id, (), MapLaneConfig::default())
    }
}

impl<K, V, C: FlushCollector> MapLane<K, V, C> {
    pub fn with_collector(id: LaneId, collector: C, config: MapLaneConfig) -> Self {
        Self {
            id,
            state: IndexMap::new(),
            pending: PendingWrites::new(config.sync_first),
            collector,
        }
    }

    pub fn id(&self) -> LaneId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn has_pending_writes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Read-only view of the canonical state
    pub fn state(&self) -> &IndexMap<K, V> {
        &self.state
    }

    pub fn collector(&self) -> &C {
        &self.collector
    }

    /// Drops the unfinished sync of `remote`, if any. Nothing drops a sync on
    /// its own, so callers that unlink a remote mid-sync decide here whether
    /// the rest of its snapshot is still worth sending.
    pub fn abandon_sync(&mut self, remote: RemoteId) -> bool {
        self.pending.abandon_sync(remote)
    }

    fn enqueue(&mut self, operation: MapOperation<K, V>) {
        self.pending.push_operation(operation);
        self.collector.register(self.id);
    }
}

impl<K: Eq + Hash + Clone, V: Clone, C: FlushCollector> MapLane<K, V, C> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.state.get(key)
    }

    /// Inserts or replaces `key`. A replaced key keeps its position.
    pub fn update(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.state.insert(key.clone(), value.clone());
        self.enqueue(MapOperation::Update { key, value });
        previous
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.state.shift_remove(key);
        self.enqueue(MapOperation::Remove { key: key.clone() });
        removed
    }

    pub fn clear(&mut self) {
        self.state.clear();
        self.enqueue(MapOperation::Clear);
    }

    /// Queues a catch-up for `remote` over the keys present right now. Values
    /// are read when each key's record is written.
    pub fn sync(&mut self, remote: RemoteId) {
        trace!("{} queued sync of {} keys for {}", self.id, self.state.len(), remote);
        self.pending
            .push_sync(SyncRequest::new(remote, self.state.keys().cloned()));
        self.collector.register(self.id);
    }
}

impl<K: Eq + Hash + Form, V: Form, C: FlushCollector> MapLane<K, V, C> {
    /// See [`PendingWrites::write_into`].
    pub fn write_into(&mut self, writer: &mut FrameWriter) -> Result<WriteResult, MapLaneError> {
        self.pending.write_into(&self.state, writer)
    }
}
