//! Compact Recon output for an event sequence.
//!
//! The printed text parses back to exactly the events it was printed from.

use std::fmt::Write;

use base64::{engine::general_purpose::STANDARD, Engine};

use super::{
    classifiers::{is_identifier, is_keyword},
    event::{NumericLiteral, ReadEvent},
};

enum Frame {
    /// An open `{...}` or `(...)` body
    Body {
        closer: char,
        items: usize,
        slot_value_next: bool,
        trailing_extant: bool,
    },
    /// A record whose attributes have been printed but whose body has not
    Header,
}

impl Frame {
    fn body(closer: char) -> Self {
        Frame::Body {
            closer,
            items: 0,
            slot_value_next: false,
            trailing_extant: false,
        }
    }
}

/// Print `events` as compact Recon text.
pub fn print_compact(events: &[ReadEvent]) -> String {
    let mut out = String::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut index = 0;

    while index < events.len() {
        let event = &events[index];
        let next = events.get(index + 1);
        index += 1;

        match event {
            ReadEvent::Extant => {
                begin_item(&mut out, &mut frames);
                if let Some(Frame::Body {
                    trailing_extant, ..
                }) = frames.last_mut()
                {
                    *trailing_extant = true;
                }
            }
            ReadEvent::Boolean(value) => {
                begin_item(&mut out, &mut frames);
                out.push_str(if *value { "true" } else { "false" });
            }
            ReadEvent::Number(number) => {
                begin_item(&mut out, &mut frames);
                write_number(&mut out, number);
            }
            ReadEvent::Text(text) => {
                begin_item(&mut out, &mut frames);
                write_text(&mut out, text);
            }
            ReadEvent::Blob(bytes) => {
                begin_item(&mut out, &mut frames);
                out.push('%');
                out.push_str(&STANDARD.encode(bytes));
            }
            ReadEvent::StartAttribute(name) => {
                if !matches!(frames.last(), Some(Frame::Header)) {
                    begin_item(&mut out, &mut frames);
                    frames.push(Frame::Header);
                }
                out.push('@');
                write_text(&mut out, name);
                if matches!(next, Some(ReadEvent::EndAttribute)) {
                    index += 1;
                } else {
                    out.push('(');
                    frames.push(Frame::body(')'));
                }
            }
            ReadEvent::StartBody => {
                if matches!(frames.last(), Some(Frame::Header)) {
                    frames.pop();
                    if matches!(next, Some(ReadEvent::EndRecord)) {
                        index += 1;
                        continue;
                    }
                } else {
                    begin_item(&mut out, &mut frames);
                }
                out.push('{');
                frames.push(Frame::body('}'));
            }
            ReadEvent::EndAttribute | ReadEvent::EndRecord => {
                if let Some(Frame::Body {
                    closer,
                    trailing_extant,
                    ..
                }) = frames.pop()
                {
                    if trailing_extant {
                        out.push(',');
                    }
                    out.push(closer);
                }
            }
            ReadEvent::Slot => {
                out.push(':');
                if let Some(Frame::Body {
                    slot_value_next,
                    trailing_extant,
                    ..
                }) = frames.last_mut()
                {
                    *slot_value_next = true;
                    *trailing_extant = false;
                }
            }
        }
    }
    out
}

fn begin_item(out: &mut String, frames: &mut [Frame]) {
    if let Some(Frame::Body {
        items,
        slot_value_next,
        trailing_extant,
        ..
    }) = frames.last_mut()
    {
        if *slot_value_next {
            *slot_value_next = false;
        } else {
            if *items > 0 {
                out.push(',');
            }
            *items += 1;
        }
        *trailing_extant = false;
    }
}

fn write_number(out: &mut String, number: &NumericLiteral) {
    // Display already prints floats in a form that reads back as a float
    let _ = write!(out, "{}", number);
}

/// Bare identifier where that lexes back as the same text, quoted otherwise.
pub fn write_text(out: &mut String, text: &str) {
    if is_identifier(text) && !is_keyword(text) {
        out.push_str(text);
        return;
    }
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
