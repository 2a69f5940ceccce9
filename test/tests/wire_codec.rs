//! Map-operation frames carrying `Form` payloads.

use proptest::prelude::*;

use lanelink_shared::{
    encode_map_operation, Form, MapOperation, MapOperationDecoder, ByteReader, StreamWriter,
};

fn round_trip<K, V>(operation: &MapOperation<K, V>) -> MapOperation<K, V>
where
    K: Form,
    V: Form,
{
    let mut writer = StreamWriter::new();
    encode_map_operation(&operation.to_text(), &mut writer);
    let bytes = writer.to_bytes();
    let mut reader = ByteReader::new(&bytes);
    let raw = MapOperationDecoder::decode(&mut reader).unwrap();
    assert!(reader.is_empty());
    raw.decode_with().unwrap()
}

#[test]
fn update_key_survives() {
    let operation = MapOperation::Update {
        key: "k".to_string(),
        value: "v".to_string(),
    };
    let mut writer = StreamWriter::new();
    encode_map_operation(&operation.to_text(), &mut writer);
    let bytes = writer.to_bytes();
    let raw = MapOperationDecoder::decode(&mut ByteReader::new(&bytes)).unwrap();
    assert_eq!(raw.decode_key::<String>(), Some(Ok("k".to_string())));
}

#[test]
fn clear_is_a_single_tag_byte() {
    let mut writer = StreamWriter::new();
    encode_map_operation(&MapOperation::<&str, &str>::Clear, &mut writer);
    let bytes = writer.to_bytes();
    let mut reader = ByteReader::new(&bytes);
    assert_eq!(reader.read_u64(), Ok(1));
    assert_eq!(reader.read_byte(), Ok(2));
    assert!(reader.is_empty());
}

proptest! {
    #[test]
    fn prop_text_operations_round_trip(key in "\\PC{0,12}", value in "\\PC{0,24}", remove in any::<bool>()) {
        let operation = if remove {
            MapOperation::Remove { key }
        } else {
            MapOperation::Update { key, value }
        };
        prop_assert_eq!(round_trip(&operation), operation);
    }

    #[test]
    fn prop_numeric_operations_round_trip(key in any::<u64>(), value in any::<i64>()) {
        let operation = MapOperation::Update { key, value };
        prop_assert_eq!(round_trip(&operation), operation);
    }

    #[test]
    fn prop_blob_values_round_trip(key in any::<i32>(), value in prop::collection::vec(any::<u8>(), 0..32)) {
        let operation = MapOperation::Update { key, value };
        prop_assert_eq!(round_trip(&operation), operation);
    }
}
