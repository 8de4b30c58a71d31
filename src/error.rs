//! Error types for transcoding operations

use thiserror::Error;

/// Error type for transcoding operations
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying stream ended before an exact read was satisfied.
    ///
    /// `actual` is the number of bytes obtained before the stream ran dry.
    /// Scalar reads propagate this error; batched reads absorb it into a
    /// short [crate::Progress] instead.
    #[error("unexpected end of stream: expected {expected} bytes, got {actual}")]
    UnexpectedEndOfStream { expected: usize, actual: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),
    #[error("unsupported shape: {0}")]
    UnsupportedShape(&'static str),
    #[error("seek not supported: {0}")]
    SeekNotSupported(&'static str),
    #[error("transcoder closed")]
    Closed,
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
