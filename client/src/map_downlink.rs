use std::hash::Hash;

use indexmap::IndexMap;
use log::{trace, warn};

use lanelink_shared::{ByteReader, Form, LaneResponse, RawMapOperation};

use crate::{
    config::DownlinkConfig,
    error::DownlinkError,
    observer::{MapDownlinkObserver, ObserverError},
    operation::MapClientOperation,
};

/// Client side mirror of a remote map lane.
///
/// Until the lane's `Synced` marker arrives the mirror is updated silently;
/// from then on each operation notifies the observer:
///
/// | Operation | Callback view of the map |
/// |-----------|--------------------------|
/// | Update    | after the insert |
/// | Remove    | after the removal |
/// | Clear     | before clearing |
/// | Take(n)   | after truncation, once per dropped entry |
/// | Drop(n)   | mid-removal, once per dropped entry |
///
/// Observer failures are logged and reported, but never undo a change and
/// never stop later callbacks.
pub struct MapDownlink<K, V, O: MapDownlinkObserver<K, V> = ()> {
    config: DownlinkConfig,
    state: IndexMap<K, V>,
    observer: O,
    linked: bool,
    synced: bool,
}

impl<K, V> MapDownlink<K, V, ()> {
    pub fn new() -> Self {
        Self::with_observer((), DownlinkConfig::default())
    }
}

impl<K, V> Default for MapDownlink<K, V, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, O: MapDownlinkObserver<K, V>> MapDownlink<K, V, O> {
    pub fn with_observer(observer: O, config: DownlinkConfig) -> Self {
        Self {
            config,
            state: IndexMap::new(),
            observer,
            linked: false,
            synced: false,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn snapshot(&self) -> &IndexMap<K, V> {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

impl<K: Eq + Hash + Form, V: Form, O: MapDownlinkObserver<K, V>> MapDownlink<K, V, O> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.state.get(key)
    }

    /// Decodes and handles every lane response in `bytes`.
    ///
    /// A framing or payload error stops processing. An observer error does
    /// not: the remaining responses are still applied and the first observer
    /// error is returned at the end.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<(), DownlinkError> {
        let mut reader = ByteReader::new(bytes);
        let mut first_failure = None;
        while !reader.is_empty() {
            let response = LaneResponse::read(&mut reader)?;
            match self.on_response(response) {
                Ok(()) => {}
                Err(DownlinkError::Observer(error)) => {
                    first_failure.get_or_insert(error);
                }
                Err(error) => return Err(error),
            }
        }
        match first_failure {
            Some(error) => Err(DownlinkError::Observer(error)),
            None => Ok(()),
        }
    }

    pub fn on_response(
        &mut self,
        response: LaneResponse<RawMapOperation>,
    ) -> Result<(), DownlinkError> {
        match response {
            LaneResponse::Linked(remote) => {
                trace!("Linked as {}", remote);
                self.linked = true;
                self.synced = false;
                finish(self.observer.on_linked())
            }
            LaneResponse::SyncEvent { body, .. } | LaneResponse::Event(body) => {
                self.apply(body.into())
            }
            LaneResponse::Synced(remote) => {
                trace!("Synced as {} with {} entries", remote, self.state.len());
                self.synced = true;
                finish(self.observer.on_synced(&self.state))
            }
            LaneResponse::Unlinked(remote) => {
                trace!("Unlinked as {}", remote);
                self.linked = false;
                self.synced = false;
                if self.config.clear_on_unlink {
                    self.state.clear();
                }
                finish(self.observer.on_unlinked())
            }
        }
    }

    /// Applies an operation whose key and value are still Recon text.
    pub fn apply(
        &mut self,
        operation: MapClientOperation<Vec<u8>, Vec<u8>>,
    ) -> Result<(), DownlinkError> {
        let operation = operation.decode_with::<K, V>()?;
        self.apply_decoded(operation)
    }

    pub fn take(&mut self, n: usize) -> Result<(), DownlinkError> {
        self.apply_decoded(MapClientOperation::Take(n))
    }

    pub fn drop_first(&mut self, n: usize) -> Result<(), DownlinkError> {
        self.apply_decoded(MapClientOperation::Drop(n))
    }

    pub fn apply_decoded(
        &mut self,
        operation: MapClientOperation<K, V>,
    ) -> Result<(), DownlinkError> {
        let notify = self.synced;
        let mut failure = None;

        match operation {
            MapClientOperation::Update { key, value } => {
                let (index, old) = self.state.insert_full(key, value);
                if notify {
                    if let Some((key, new)) = self.state.get_index(index) {
                        let result = self.observer.on_update(key, &self.state, old.as_ref(), new);
                        record(&mut failure, result);
                    }
                }
            }
            MapClientOperation::Remove { key } => {
                if let Some((key, old)) = self.state.shift_remove_entry(&key) {
                    if notify {
                        record(&mut failure, self.observer.on_remove(&key, &self.state, &old));
                    }
                }
            }
            MapClientOperation::Clear => {
                if notify {
                    record(&mut failure, self.observer.on_clear(&self.state));
                }
                self.state.clear();
            }
            MapClientOperation::Take(n) => {
                let start = n.min(self.state.len());
                let dropped: Vec<(K, V)> = self.state.drain(start..).collect();
                if notify {
                    for (key, old) in dropped.iter() {
                        record(&mut failure, self.observer.on_remove(key, &self.state, old));
                    }
                }
            }
            MapClientOperation::Drop(n) => {
                for _ in 0..n.min(self.state.len()) {
                    let Some((key, old)) = self.state.shift_remove_index(0) else {
                        break;
                    };
                    if notify {
                        record(&mut failure, self.observer.on_remove(&key, &self.state, &old));
                    }
                }
            }
        }

        match failure {
            Some(error) => Err(DownlinkError::Observer(error)),
            None => Ok(()),
        }
    }
}

fn record(failure: &mut Option<ObserverError>, result: Result<(), ObserverError>) {
    if let Err(error) = result {
        warn!("Map downlink observer failed: {}", error.message());
        failure.get_or_insert(error);
    }
}

fn finish(result: Result<(), ObserverError>) -> Result<(), DownlinkError> {
    if let Err(error) = &result {
        warn!("Map downlink observer failed: {}", error.message());
    }
    result.map_err(DownlinkError::from)
}
