use indexmap::IndexMap;

use lanelink_client::{MapDownlinkObserver, ObserverError};

/// One observer callback, with the map view it was handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<K, V> {
    Linked,
    Synced(Vec<(K, V)>),
    Update { key: K, old: Option<V>, new: V },
    Remove { key: K, old: V, view: Vec<K> },
    Clear(Vec<(K, V)>),
    Unlinked,
}

/// Observer that records every callback in order.
#[derive(Debug, Clone)]
pub struct EventLog<K, V> {
    events: Vec<Observed<K, V>>,
}

impl<K, V> Default for EventLog<K, V> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<K, V> EventLog<K, V> {
    pub fn events(&self) -> &[Observed<K, V>] {
        &self.events
    }

    /// Hands back the events recorded so far and starts a fresh log.
    pub fn take(&mut self) -> Vec<Observed<K, V>> {
        std::mem::take(&mut self.events)
    }
}

fn entries<K: Clone, V: Clone>(map: &IndexMap<K, V>) -> Vec<(K, V)> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

impl<K: Clone, V: Clone> MapDownlinkObserver<K, V> for EventLog<K, V> {
    fn on_linked(&mut self) -> Result<(), ObserverError> {
        self.events.push(Observed::Linked);
        Ok(())
    }

    fn on_synced(&mut self, map: &IndexMap<K, V>) -> Result<(), ObserverError> {
        self.events.push(Observed::Synced(entries(map)));
        Ok(())
    }

    fn on_update(
        &mut self,
        key: &K,
        _map: &IndexMap<K, V>,
        old: Option<&V>,
        new: &V,
    ) -> Result<(), ObserverError> {
        self.events.push(Observed::Update {
            key: key.clone(),
            old: old.cloned(),
            new: new.clone(),
        });
        Ok(())
    }

    fn on_remove(&mut self, key: &K, map: &IndexMap<K, V>, old: &V) -> Result<(), ObserverError> {
        self.events.push(Observed::Remove {
            key: key.clone(),
            old: old.clone(),
            view: map.keys().cloned().collect(),
        });
        Ok(())
    }

    fn on_clear(&mut self, map: &IndexMap<K, V>) -> Result<(), ObserverError> {
        self.events.push(Observed::Clear(entries(map)));
        Ok(())
    }

    fn on_unlinked(&mut self) -> Result<(), ObserverError> {
        self.events.push(Observed::Unlinked);
        Ok(())
    }
}
