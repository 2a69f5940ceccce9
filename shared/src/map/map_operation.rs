use crate::form::{Form, FormError};

/// A mutation of map-shaped lane state, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOperation<K, V> {
    Update { key: K, value: V },
    Remove { key: K },
    Clear,
}

/// A map operation whose key and value are still undecoded Recon text.
pub type RawMapOperation = MapOperation<Vec<u8>, Vec<u8>>;

impl<K, V> MapOperation<K, V> {
    pub fn key(&self) -> Option<&K> {
        match self {
            MapOperation::Update { key, .. } | MapOperation::Remove { key } => Some(key),
            MapOperation::Clear => None,
        }
    }

    /// Fallible conversion of both the key and the value.
    pub fn try_map<K2, V2, E>(
        self,
        mut map_key: impl FnMut(K) -> Result<K2, E>,
        mut map_value: impl FnMut(V) -> Result<V2, E>,
    ) -> Result<MapOperation<K2, V2>, E> {
        Ok(match self {
            MapOperation::Update { key, value } => MapOperation::Update {
                key: map_key(key)?,
                value: map_value(value)?,
            },
            MapOperation::Remove { key } => MapOperation::Remove { key: map_key(key)? },
            MapOperation::Clear => MapOperation::Clear,
        })
    }
}

impl<K: Form, V: Form> MapOperation<K, V> {
    /// Encodes the key and value to compact Recon text.
    pub fn to_text(&self) -> MapOperation<String, String> {
        match self {
            MapOperation::Update { key, value } => MapOperation::Update {
                key: key.encode(),
                value: value.encode(),
            },
            MapOperation::Remove { key } => MapOperation::Remove { key: key.encode() },
            MapOperation::Clear => MapOperation::Clear,
        }
    }
}

impl RawMapOperation {
    /// Decodes the embedded payloads with the `Form` implementations of the
    /// target key and value types.
    pub fn decode_with<K: Form, V: Form>(self) -> Result<MapOperation<K, V>, FormError> {
        self.try_map(|key| K::decode(&key), |value| V::decode(&value))
    }

    /// Decodes only the key, leaving the value untouched.
    pub fn decode_key<K: Form>(&self) -> Option<Result<K, FormError>> {
        self.key().map(|key| K::decode(key))
    }
}

impl From<MapOperation<String, String>> for RawMapOperation {
    fn from(operation: MapOperation<String, String>) -> Self {
        match operation {
            MapOperation::Update { key, value } => MapOperation::Update {
                key: key.into_bytes(),
                value: value.into_bytes(),
            },
            MapOperation::Remove { key } => MapOperation::Remove {
                key: key.into_bytes(),
            },
            MapOperation::Clear => MapOperation::Clear,
        }
    }
}
