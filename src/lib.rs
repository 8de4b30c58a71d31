//! Buffered big-endian transcoding for scientific binary data.
//!
//! # Overview
//!
//! A transcoding layer that converts between in-memory primitive values and
//! the fixed big-endian, densely packed wire encoding used by scientific
//! binary containers. It is designed to sit between code that manipulates
//! typed numeric arrays and an arbitrary byte stream:
//! - Scalar encode/decode for every supported fixed-width kind, plus raw
//!   text emission
//! - A recursive dispatcher over jagged and rectangular array values
//! - An exact-read guarantee over streams that deliver short reads
//! - A reusable staging buffer so batched writes allocate once per batch,
//!   not once per element
//!
//! The underlying stream is anything implementing [Medium]: a [std::fs::File],
//! an in-memory [std::io::Cursor], or a directional [Reader]/[Writer]
//! wrapper around any other endpoint. Reads are buffered; writes accumulate
//! and drain at the buffer capacity.
//!
//! Truncation follows the container convention: scalar reads fail with
//! [Error::UnexpectedEndOfStream], while batched and array reads absorb the
//! shortfall and report how many bytes actually decoded ([Progress] and the
//! byte count returned by [Transcoder::read_array]).
//!
//! # Example
//!
//! ```
//! use fitstream::{Array, Leaf, Transcoder, Value};
//! use std::io::Cursor;
//!
//! // Write a jagged 2x[3] block of 32-bit integers.
//! let mut writer = Transcoder::new(Cursor::new(Vec::new()));
//! let rows = Value::Array(Array::Jagged(vec![
//!     Array::Flat(Leaf::I32(vec![1, 2, 3])),
//!     Array::Flat(Leaf::I32(vec![4, 5, 6])),
//! ]));
//! writer.write_array(&rows).unwrap();
//! let wire = writer.into_inner().unwrap().into_inner();
//! assert_eq!(wire.len(), 24);
//!
//! // Read it back into a destination of the same shape.
//! let mut reader = Transcoder::new(Cursor::new(wire));
//! let mut dst = Value::Array(Array::Jagged(vec![
//!     Array::Flat(Leaf::I32(vec![0; 3])),
//!     Array::Flat(Leaf::I32(vec![0; 3])),
//! ]));
//! assert_eq!(reader.read_array(&mut dst).unwrap(), 24);
//! assert_eq!(dst, rows);
//! ```

pub mod error;
pub mod medium;
mod staging;
pub mod transcoder;
pub mod types;

// Re-export main types and traits
pub use error::Error;
pub use medium::{Medium, Reader, Writer};
pub use transcoder::{Progress, Transcoder, DEFAULT_CAPACITY};
pub use types::{Array, Kind, Leaf, Scalar, Value};
