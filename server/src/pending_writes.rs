use std::collections::VecDeque;
use std::hash::Hash;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use lanelink_shared::{
    write_event, write_sync_event, write_synced, ByteWrite, Form, FrameWriter, MapOperation,
    RemoteId,
};

use crate::{error::MapLaneError, sync_request::SyncRequest};

/// Outcome of [`PendingWrites::write_into`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteResult {
    /// Both queues are empty
    Done,
    /// The buffer filled up; flush it and call again
    DataStillAvailable,
}

enum Attempt {
    Written,
    /// The attempt consumed its turn without producing a record
    Skipped,
    Overflowed { needed: usize },
}

/// Outgoing records of one lane: a queue of per-remote sync requests and a
/// queue of live operations, multiplexed by an alternating bias bit.
///
/// Nothing leaves either queue until its record has been written in full, so
/// an overflowed attempt is simply retried on the next call.
pub struct PendingWrites<K, V> {
    sync_requests: VecDeque<SyncRequest<K>>,
    operations: VecDeque<MapOperation<K, V>>,
    prefer_sync: bool,
}

impl<K, V> PendingWrites<K, V> {
    pub fn new(sync_first: bool) -> Self {
        Self {
            sync_requests: VecDeque::new(),
            operations: VecDeque::new(),
            prefer_sync: sync_first,
        }
    }

    pub fn push_operation(&mut self, operation: MapOperation<K, V>) {
        self.operations.push_back(operation);
    }

    pub fn push_sync(&mut self, request: SyncRequest<K>) {
        self.sync_requests.push_back(request);
    }

    /// Drops every queued sync request for `remote`. Returns whether any was
    /// found.
    pub fn abandon_sync(&mut self, remote: RemoteId) -> bool {
        let before = self.sync_requests.len();
        self.sync_requests.retain(|request| request.remote() != remote);
        before != self.sync_requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sync_requests.is_empty() && self.operations.is_empty()
    }

    pub fn pending_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn pending_syncs(&self) -> usize {
        self.sync_requests.len()
    }

    /// Whether the next attempt will go to the sync queue, if it has work.
    pub fn prefers_sync(&self) -> bool {
        self.prefer_sync
    }
}

impl<K: Eq + Hash + Form, V: Form> PendingWrites<K, V> {
    /// Writes as many records as fit into `writer`, alternating between the
    /// sync queue and the operation queue. An empty queue is passed over in
    /// favour of the other. Sync values are read from `state` as each key
    /// is written.
    pub fn write_into(
        &mut self,
        state: &IndexMap<K, V>,
        writer: &mut FrameWriter,
    ) -> Result<WriteResult, MapLaneError> {
        loop {
            let use_sync = match (self.sync_requests.is_empty(), self.operations.is_empty()) {
                (true, true) => return Ok(WriteResult::Done),
                (false, true) => true,
                (true, false) => false,
                (false, false) => self.prefer_sync,
            };

            let attempt = if use_sync {
                self.write_sync_step(state, writer)
            } else {
                self.write_operation(writer)
            };
            self.prefer_sync = !self.prefer_sync;

            if let Attempt::Overflowed { needed } = attempt {
                if needed > writer.capacity() {
                    return Err(MapLaneError::FrameExceedsBuffer {
                        needed,
                        capacity: writer.capacity(),
                    });
                }
                debug!(
                    "Write buffer full: next record needs {} bytes, {} free",
                    needed,
                    writer.bytes_free()
                );
                return Ok(WriteResult::DataStillAvailable);
            }
        }
    }

    fn write_sync_step(&mut self, state: &IndexMap<K, V>, writer: &mut FrameWriter) -> Attempt {
        let Some(request) = self.sync_requests.front_mut() else {
            return Attempt::Skipped;
        };
        let remote = request.remote();

        let Some(key) = request.peek_key() else {
            // snapshot exhausted, the Synced marker takes its own turn
            if let Some(needed) = measure(writer, |counter| write_synced(remote, counter)) {
                return Attempt::Overflowed { needed };
            }
            write_synced(remote, writer);
            trace!("Sync for {} complete", remote);
            self.sync_requests.pop_front();
            return Attempt::Written;
        };

        let Some(value) = state.get(key) else {
            warn!("Key removed before its sync step for {}, skipping", remote);
            request.advance();
            return Attempt::Skipped;
        };

        let body = MapOperation::Update {
            key: key.encode(),
            value: value.encode(),
        };
        if let Some(needed) = measure(writer, |counter| write_sync_event(remote, &body, counter)) {
            return Attempt::Overflowed { needed };
        }
        write_sync_event(remote, &body, writer);
        trace!("Wrote sync step for {}", remote);
        request.advance();
        Attempt::Written
    }

    fn write_operation(&mut self, writer: &mut FrameWriter) -> Attempt {
        let Some(operation) = self.operations.front() else {
            return Attempt::Skipped;
        };

        let body = operation.to_text();
        if let Some(needed) = measure(writer, |counter| write_event(&body, counter)) {
            return Attempt::Overflowed { needed };
        }
        write_event(&body, writer);
        trace!("Wrote live operation");
        self.operations.pop_front();
        Attempt::Written
    }
}

/// Runs `write` against a counter for the writer's free space. Returns the
/// bytes the record needs if it does not fit.
fn measure(writer: &FrameWriter, write: impl FnOnce(&mut dyn ByteWrite)) -> Option<usize> {
    let mut counter = writer.counter();
    write(&mut counter);
    if counter.overflowed() {
        Some(counter.bytes_needed())
    } else {
        None
    }
}
