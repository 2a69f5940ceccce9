//! Property tests for the incremental Recon parser.
//!
//! 1. Chunking invariance: any split of the input yields the same events
//! 2. Round-trip: parse, print compact, parse again yields the same events

use proptest::prelude::*;

use lanelink_shared::{
    parse_events, print_compact, FeedResult, NumericLiteral, ReadEvent, ReconError, ReconParser,
};

// ========== Value Trees ==========

#[derive(Debug, Clone)]
enum Value {
    Extant,
    Boolean(bool),
    Number(NumericLiteral),
    Text(String),
    Blob(Vec<u8>),
    Record {
        attrs: Vec<(String, Vec<Item>)>,
        items: Vec<Item>,
    },
}

#[derive(Debug, Clone)]
enum Item {
    Value(Value),
    Slot(Value, Value),
}

impl Value {
    fn push_events(&self, out: &mut Vec<ReadEvent>) {
        match self {
            Value::Extant => out.push(ReadEvent::Extant),
            Value::Boolean(b) => out.push(ReadEvent::Boolean(*b)),
            Value::Number(n) => out.push(ReadEvent::Number(*n)),
            Value::Text(text) => out.push(ReadEvent::Text(text.clone())),
            Value::Blob(bytes) => out.push(ReadEvent::Blob(bytes.clone())),
            Value::Record { attrs, items } => {
                for (name, params) in attrs {
                    out.push(ReadEvent::StartAttribute(name.clone()));
                    push_items(params, out);
                    out.push(ReadEvent::EndAttribute);
                }
                out.push(ReadEvent::StartBody);
                push_items(items, out);
                out.push(ReadEvent::EndRecord);
            }
        }
    }

    fn events(&self) -> Vec<ReadEvent> {
        let mut out = Vec::new();
        self.push_events(&mut out);
        out
    }
}

fn push_items(items: &[Item], out: &mut Vec<ReadEvent>) {
    for item in items {
        match item {
            Item::Value(value) => value.push_events(out),
            Item::Slot(key, value) => {
                key.push_events(out);
                out.push(ReadEvent::Slot);
                value.push_events(out);
            }
        }
    }
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,5}"
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_-]{0,6}",
        "\\PC{0,8}",
        Just("true".to_string()),
        Just("NaN".to_string()),
        Just("tab\tand \"quote\"".to_string()),
    ]
}

fn number_strategy() -> impl Strategy<Value = NumericLiteral> {
    prop_oneof![
        any::<i64>().prop_map(NumericLiteral::Int),
        ((i64::MAX as u64 + 1)..=u64::MAX).prop_map(NumericLiteral::UInt),
        any::<f64>().prop_map(NumericLiteral::Float),
        (-1000i32..1000).prop_map(|n| NumericLiteral::Float(f64::from(n) / 8.0)),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Extant),
        any::<bool>().prop_map(Value::Boolean),
        number_strategy().prop_map(Value::Number),
        text_strategy().prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 1..8).prop_map(Value::Blob),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        let item = prop_oneof![
            3 => inner.clone().prop_map(Item::Value),
            1 => (inner.clone(), inner.clone()).prop_map(|(k, v)| Item::Slot(k, v)),
        ];
        let items = prop::collection::vec(item, 0..4);
        (
            prop::collection::vec((name_strategy(), items.clone()), 0..3),
            items,
        )
            .prop_map(|(attrs, items)| Value::Record { attrs, items })
    })
}

// ========== Helpers ==========

/// Feeds `text` split at `cuts` (char-boundary byte offsets, ascending).
/// Chunks after an early `Done` are still fed so trailing text is checked.
fn parse_in_pieces(text: &str, cuts: &[usize]) -> Result<Vec<ReadEvent>, ReconError> {
    let mut parser = ReconParser::new();
    let mut events = Vec::new();
    let mut done = false;
    let mut start = 0;
    let ends = cuts.iter().copied().chain(std::iter::once(text.len()));
    for end in ends {
        let is_partial = end < text.len();
        match parser.feed(&text[start..end], is_partial) {
            FeedResult::Done(tail) => {
                events.extend(tail);
                done = true;
            }
            FeedResult::Error(error) => return Err(error),
            FeedResult::NeedsMoreInput => assert!(!done, "input needed after completion"),
        }
        start = end;
    }
    assert!(done, "final non-partial chunk did not resolve {:?}", text);
    Ok(events)
}

fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices().map(|(i, _)| i).skip(1).collect()
}

fn assert_split_everywhere(text: &str) {
    let whole = parse_events(text);
    for cut in char_boundaries(text) {
        assert_eq!(parse_in_pieces(text, &[cut]), whole, "split at {} of {:?}", cut, text);
    }
    let every_char = char_boundaries(text);
    assert_eq!(parse_in_pieces(text, &every_char), whole, "one char at a time {:?}", text);
}

// ========== Fixed Corpus ==========

const CORPUS: &[&str] = &[
    "",
    "   ",
    "42",
    "-17",
    "18446744073709551615",
    "3.25e-2",
    "-inf",
    "Infinity",
    "true",
    "identifier-with-dash",
    "\"quoted \\\"text\\\" \\u00e9\\ud83d\\ude00\"",
    "%AQIDBA==",
    "{}",
    "{,}",
    "{a:}",
    "{:1}",
    "{ a: 1, b: 2; c }",
    "{\n  first: 1\n  second: {nested: true}\n}",
    "@flag",
    "@point(x: 1.5, y: -2) { label, note: \"n\" }",
    "@a@b(1)@c{x}",
    "@\"quoted name\"(1)",
    "{@inner(1), @bare, @rec{z}: 3}",
    "@outer(@inner{a: %AA==})",
];

#[test]
fn corpus_is_chunking_invariant() {
    let _ = env_logger::builder().is_test(true).try_init();
    for text in CORPUS {
        assert!(parse_events(text).is_ok(), "corpus entry must parse: {:?}", text);
        assert_split_everywhere(text);
    }
}

#[test]
fn corpus_round_trips() {
    for text in CORPUS {
        let events = parse_events(text).unwrap();
        let printed = print_compact(&events);
        assert_eq!(parse_events(&printed), Ok(events), "{:?} printed as {:?}", text, printed);
    }
}

#[test]
fn errors_are_chunking_invariant() {
    for text in [
        "{a:1", "@a(1", "\"open", "{a b}", "{)", "%AQ", "-x", "1 2", "{a} junk}", "@a 1",
        "\"s\" x",
    ] {
        let whole = parse_events(text);
        assert!(whole.is_err(), "{:?} should fail", text);
        for cut in char_boundaries(text) {
            assert_eq!(parse_in_pieces(text, &[cut]), whole, "split at {} of {:?}", cut, text);
        }
    }
}

// ========== Properties ==========

proptest! {
    #[test]
    fn prop_printed_values_parse_back(value in value_strategy()) {
        let events = value.events();
        let text = print_compact(&events);
        prop_assert_eq!(parse_events(&text), Ok(events), "text {:?}", text);
    }

    #[test]
    fn prop_round_trip_is_stable(value in value_strategy()) {
        let text = print_compact(&value.events());
        let parsed = parse_events(&text).unwrap();
        let reprinted = print_compact(&parsed);
        prop_assert_eq!(parse_events(&reprinted), Ok(parsed));
    }

    #[test]
    fn prop_chunking_invariance(
        value in value_strategy(),
        raw_cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let text = print_compact(&value.events());
        let whole = parse_events(&text);

        let boundaries = char_boundaries(&text);
        let mut cuts: Vec<usize> = if boundaries.is_empty() {
            Vec::new()
        } else {
            raw_cuts.iter().map(|index| boundaries[index.index(boundaries.len())]).collect()
        };
        cuts.sort_unstable();
        cuts.dedup();

        prop_assert_eq!(parse_in_pieces(&text, &cuts), whole);
    }
}
