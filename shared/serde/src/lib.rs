//! # Lanelink Serde
//! Byte-level writers and readers for lanelink frames.
//!
//! Writers come in two flavours: [`FrameWriter`] has a fixed capacity and
//! supports probing with a [`ByteCounter`] before committing any bytes, while
//! [`StreamWriter`] grows as needed.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod error;
mod stream_writer;

pub use byte_reader::ByteReader;
pub use byte_writer::{ByteCounter, ByteWrite, FrameWriter};
pub use error::SerdeErr;
pub use stream_writer::StreamWriter;
