use lanelink_shared::{Form, FormError, MapOperation};

/// Operations a downlink applies to its mirror.
///
/// `Take` and `Drop` only shape the local cache; a lane never sends them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapClientOperation<K, V> {
    Update { key: K, value: V },
    Remove { key: K },
    Clear,
    /// Keep the first `n` entries
    Take(usize),
    /// Discard the first `n` entries
    Drop(usize),
}

impl<K, V> From<MapOperation<K, V>> for MapClientOperation<K, V> {
    fn from(operation: MapOperation<K, V>) -> Self {
        match operation {
            MapOperation::Update { key, value } => MapClientOperation::Update { key, value },
            MapOperation::Remove { key } => MapClientOperation::Remove { key },
            MapOperation::Clear => MapClientOperation::Clear,
        }
    }
}

impl MapClientOperation<Vec<u8>, Vec<u8>> {
    pub fn decode_with<K: Form, V: Form>(self) -> Result<MapClientOperation<K, V>, FormError> {
        Ok(match self {
            MapClientOperation::Update { key, value } => MapClientOperation::Update {
                key: K::decode(&key)?,
                value: V::decode(&value)?,
            },
            MapClientOperation::Remove { key } => MapClientOperation::Remove {
                key: K::decode(&key)?,
            },
            MapClientOperation::Clear => MapClientOperation::Clear,
            MapClientOperation::Take(n) => MapClientOperation::Take(n),
            MapClientOperation::Drop(n) => MapClientOperation::Drop(n),
        })
    }
}
