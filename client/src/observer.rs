use indexmap::IndexMap;
use thiserror::Error;

/// Failure reported by an observer callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Observer failed: {message}")]
pub struct ObserverError {
    message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Callbacks raised by a [`MapDownlink`](crate::MapDownlink).
///
/// Each `map` argument is a read-only view of the mirror; which state it
/// shows relative to the operation differs per operation and is documented
/// on `MapDownlink`. A returned error never rolls back the cache.
pub trait MapDownlinkObserver<K, V> {
    fn on_linked(&mut self) -> Result<(), ObserverError> {
        Ok(())
    }

    fn on_synced(&mut self, _map: &IndexMap<K, V>) -> Result<(), ObserverError> {
        Ok(())
    }

    fn on_update(
        &mut self,
        _key: &K,
        _map: &IndexMap<K, V>,
        _old: Option<&V>,
        _new: &V,
    ) -> Result<(), ObserverError> {
        Ok(())
    }

    fn on_remove(&mut self, _key: &K, _map: &IndexMap<K, V>, _old: &V) -> Result<(), ObserverError> {
        Ok(())
    }

    fn on_clear(&mut self, _map: &IndexMap<K, V>) -> Result<(), ObserverError> {
        Ok(())
    }

    fn on_unlinked(&mut self) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// No observer.
impl<K, V> MapDownlinkObserver<K, V> for () {}
