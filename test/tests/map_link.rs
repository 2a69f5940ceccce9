//! End-to-end tests: a server map lane replicated to client downlinks
//! through encoded buffers.

use indexmap::IndexMap;
use proptest::prelude::*;

use lanelink_server::{
    FrameWriter, LaneId, LaneResponse, MapLane, MapLaneConfig, MapOperation, RemoteId,
    WriteResult,
};
use lanelink_shared::{ByteReader, RawMapOperation};
use lanelink_test::{Observed, TestLink};

fn key(k: &str) -> String {
    k.to_string()
}

fn entries(map: &IndexMap<String, i32>) -> Vec<(String, i32)> {
    map.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

/// Decodes a buffer into (remote, key) pairs, `None` remote for live
/// events and `None` key for Synced markers and Clears.
fn shape(bytes: &[u8]) -> Vec<(Option<RemoteId>, Option<String>)> {
    let mut reader = ByteReader::new(bytes);
    let mut out = Vec::new();
    while !reader.is_empty() {
        let response: LaneResponse<RawMapOperation> = LaneResponse::read(&mut reader).unwrap();
        let key = match &response {
            LaneResponse::Event(body) | LaneResponse::SyncEvent { body, .. } => {
                body.decode_key::<String>().map(|key| key.unwrap())
            }
            _ => None,
        };
        out.push((response.remote(), key));
    }
    out
}

// ========== Downlink Mirror ==========

#[test]
fn mirror_follows_lane_in_arrival_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let remote = RemoteId(1);
    let mut link: TestLink<String, i32> = TestLink::new(256);
    link.link(remote).unwrap();
    link.pump().unwrap();

    let lane = link.lane_mut();
    lane.update(key("a"), 1);
    lane.update(key("b"), 2);
    lane.update(key("c"), 3);
    lane.remove(&key("b"));
    lane.update(key("d"), 4);
    link.pump().unwrap();

    let downlink = link.downlink(remote).unwrap();
    assert_eq!(
        entries(downlink.snapshot()),
        vec![(key("a"), 1), (key("c"), 3), (key("d"), 4)]
    );
    assert_eq!(entries(downlink.snapshot()), entries(link.lane().state()));
}

#[test]
fn late_link_catches_up_through_sync() {
    let mut link: TestLink<String, i32> = TestLink::new(128);
    for (i, k) in ["x", "y", "z"].iter().enumerate() {
        link.lane_mut().update(key(k), i as i32);
    }
    link.pump().unwrap();

    let remote = RemoteId(7);
    link.link(remote).unwrap();
    link.pump().unwrap();

    let downlink = link.downlink(remote).unwrap();
    assert!(downlink.is_synced());
    assert_eq!(
        downlink.observer().events(),
        &[
            Observed::Linked,
            Observed::Synced(vec![(key("x"), 0), (key("y"), 1), (key("z"), 2)]),
        ]
    );
}

#[test]
fn notifications_start_after_synced() {
    let remote = RemoteId(1);
    let mut link: TestLink<String, i32> = TestLink::new(1024);
    link.lane_mut().update(key("a"), 1);
    link.pump().unwrap();
    link.link(remote).unwrap();
    // live update racing the sync
    link.lane_mut().update(key("b"), 2);
    link.pump().unwrap();
    link.lane_mut().update(key("a"), 10);
    link.pump().unwrap();

    let events = link.downlink_mut(remote).unwrap().observer_mut().take();
    assert_eq!(events[0], Observed::Linked);
    assert!(matches!(events[1], Observed::Synced(_)));
    assert_eq!(
        events[2..],
        [Observed::Update {
            key: key("a"),
            old: Some(1),
            new: 10
        }]
    );
}

#[test]
fn unlink_mid_sync() {
    let remote = RemoteId(2);
    let other = RemoteId(3);
    let mut link: TestLink<String, i32> = TestLink::new(64);
    for i in 0..10 {
        link.lane_mut().update(format!("k{}", i), i);
    }
    link.pump().unwrap();

    link.link(remote).unwrap();
    link.link(other).unwrap();
    link.pump_once().unwrap();
    link.unlink(remote).unwrap();
    link.pump().unwrap();

    let dropped = link.downlink(remote).unwrap();
    assert!(!dropped.is_linked());
    assert!(dropped.is_empty());
    assert_eq!(dropped.observer().events().last(), Some(&Observed::Unlinked));

    let kept = link.downlink(other).unwrap();
    assert!(kept.is_synced());
    assert_eq!(kept.len(), 10);
    assert!(!link.lane().has_pending_writes());
}

// ========== Sync Consistency ==========

#[test]
fn sync_reads_live_values_of_snapshot_keys() {
    let remote = RemoteId(1);
    let mut lane: MapLane<String, i32> = MapLane::new(LaneId(1));
    lane.update(key("1"), 1);
    let mut writer = FrameWriter::with_capacity(1024);
    lane.write_into(&mut writer).unwrap();
    writer.flush();

    lane.sync(remote);
    lane.update(key("2"), 2);
    lane.update(key("1"), 5);
    assert_eq!(lane.write_into(&mut writer), Ok(WriteResult::Done));

    let mut reader = ByteReader::new(writer.as_slice());
    let mut synced = Vec::new();
    while !reader.is_empty() {
        if let LaneResponse::SyncEvent { body, .. } = LaneResponse::read(&mut reader).unwrap() {
            synced.push(body.decode_with::<String, i32>().unwrap());
        }
    }
    assert_eq!(
        synced,
        vec![MapOperation::Update {
            key: key("1"),
            value: 5
        }]
    );
}

// ========== Bias Fairness ==========

#[test]
fn alternates_until_one_queue_is_empty() {
    const N: usize = 3;
    let remote = RemoteId(9);
    let mut lane: MapLane<String, i32> = MapLane::new(LaneId(1));
    for i in 0..N {
        lane.update(format!("s{}", i), 0);
    }
    let mut writer = FrameWriter::with_capacity(4096);
    lane.write_into(&mut writer).unwrap();
    writer.flush();

    lane.sync(remote);
    for i in 0..N {
        lane.update(format!("s{}", i), 1);
    }

    // every record here is the same shape, so sizes only differ by the remote id
    let sync_len = LaneResponse::SyncEvent {
        remote,
        body: MapOperation::Update {
            key: "s0",
            value: "1",
        },
    }
    .encoded_len();
    let event_len = LaneResponse::Event(MapOperation::Update {
        key: "s0",
        value: "1",
    })
    .encoded_len();

    let mut writer = FrameWriter::with_capacity(N * (sync_len + event_len));
    let first = lane.write_into(&mut writer).unwrap();
    assert_eq!(writer.bytes_free(), 0);
    let shape_first = shape(&writer.flush());

    let second = lane.write_into(&mut writer).unwrap();
    let shape_second = shape(&writer.flush());

    let prefers_sync = shape_first[0].0.is_some();
    for (i, (remote_of, _)) in shape_first.iter().enumerate() {
        let expect_sync = (i % 2 == 0) == prefers_sync;
        assert_eq!(remote_of.is_some(), expect_sync, "record {} of {:?}", i, shape_first);
    }
    assert_eq!(shape_first.len(), 2 * N);

    // the Synced marker did not fit and goes out next
    assert_eq!(first, WriteResult::DataStillAvailable);
    assert_eq!(second, WriteResult::Done);
    assert_eq!(shape_second, vec![(Some(remote), None)]);
}

#[test]
fn drains_remaining_queue_exclusively() {
    let remote = RemoteId(4);
    let mut lane: MapLane<String, i32> =
        MapLane::with_collector(LaneId(1), (), MapLaneConfig { sync_first: true });
    lane.update(key("only"), 1);
    let mut writer = FrameWriter::with_capacity(4096);
    lane.write_into(&mut writer).unwrap();
    writer.flush();

    lane.sync(remote);
    for i in 0..4 {
        lane.update(format!("live{}", i), i);
    }
    lane.write_into(&mut writer).unwrap();
    let shape = shape(writer.as_slice());
    let sync_positions: Vec<usize> = shape
        .iter()
        .enumerate()
        .filter(|(_, (remote_of, _))| remote_of.is_some())
        .map(|(i, _)| i)
        .collect();
    // one sync step and the Synced marker, interleaved with the first events
    assert_eq!(sync_positions.len(), 2);
    assert!(sync_positions[1] <= 3);
    assert_eq!(shape.len(), 6);
    assert!(shape[4..].iter().all(|(remote_of, _)| remote_of.is_none()));
}

// ========== Backpressure ==========

#[derive(Debug, Clone)]
enum LaneOp {
    Update(u8, i32),
    Remove(u8),
    Clear,
    Sync(u8),
}

fn lane_op_strategy() -> impl Strategy<Value = LaneOp> {
    prop_oneof![
        6 => (0u8..12, any::<i32>()).prop_map(|(k, v)| LaneOp::Update(k, v)),
        2 => (0u8..12).prop_map(LaneOp::Remove),
        1 => Just(LaneOp::Clear),
        1 => (0u8..3).prop_map(LaneOp::Sync),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Small buffers force many overflows; the mirror must still end up
    /// identical to the lane with every record delivered exactly once.
    #[test]
    fn prop_overflow_loses_nothing(
        ops in prop::collection::vec(lane_op_strategy(), 1..40),
        capacity in 64usize..160,
        pump_every in 1usize..5,
    ) {
        let remotes = [RemoteId(0), RemoteId(1), RemoteId(2)];
        let mut link: TestLink<String, i32> = TestLink::new(capacity);
        link.link(remotes[0]).unwrap();

        for (i, op) in ops.iter().enumerate() {
            match op {
                LaneOp::Update(k, v) => {
                    link.lane_mut().update(format!("key{}", k), *v);
                }
                LaneOp::Remove(k) => {
                    link.lane_mut().remove(&format!("key{}", k));
                }
                LaneOp::Clear => link.lane_mut().clear(),
                LaneOp::Sync(r) => {
                    let remote = remotes[*r as usize];
                    if link.downlink(remote).is_none() {
                        link.link(remote).unwrap();
                    }
                }
            }
            if i % pump_every == 0 {
                link.pump_once().unwrap();
            }
        }
        link.pump().unwrap();

        let expected = entries(link.lane().state());
        for remote in remotes {
            if let Some(downlink) = link.downlink(remote) {
                prop_assert!(downlink.is_synced());
                prop_assert_eq!(entries(downlink.snapshot()), expected.clone());
            }
        }
    }
}
