use std::collections::VecDeque;

use lanelink_shared::RemoteId;

/// A remote's pending catch-up: the keys the lane held when the remote asked
/// to sync. Values are looked up when each key is written, not here.
pub struct SyncRequest<K> {
    remote: RemoteId,
    keys: VecDeque<K>,
}

impl<K> SyncRequest<K> {
    pub fn new(remote: RemoteId, keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            remote,
            keys: keys.into_iter().collect(),
        }
    }

    pub fn remote(&self) -> RemoteId {
        self.remote
    }

    /// The key the next sync step will write, if any remain.
    pub fn peek_key(&self) -> Option<&K> {
        self.keys.front()
    }

    /// Consumes the key returned by [`SyncRequest::peek_key`]. Each snapshot
    /// key is handed out once.
    pub fn advance(&mut self) -> Option<K> {
        self.keys.pop_front()
    }
}
