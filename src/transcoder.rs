//! Buffered transcoding adapter over a [Medium].
//!
//! A [Transcoder] owns its medium exclusively, along with a read buffer, a
//! write accumulation buffer, and the batched-write staging area. Every
//! operation takes `&mut self`, so concurrent use of one adapter is
//! unrepresentable; callers needing parallelism use independent adapters
//! over independent streams.

mod array;
mod read;
mod write;

use crate::{error::Error, medium::Medium, staging::Staging};
use bytes::BytesMut;
use std::io::SeekFrom;
use tracing::{debug, trace};

/// Default buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Scratch size for emulated forward seeks on non-seekable media.
const SKIP_CHUNK: usize = 1024;

/// Progress of a batched read.
///
/// Truncation and transport failures are absorbed into a short byte count
/// rather than an error; `complete` distinguishes a full decode from a
/// partial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes successfully transcoded, always a whole number of elements.
    pub bytes: usize,
    /// Whether every requested element was decoded.
    pub complete: bool,
}

/// Buffered big-endian transcoder over an underlying [Medium].
pub struct Transcoder<M: Medium> {
    medium: M,
    /// Read buffer: `buf[pos..filled]` holds bytes fetched but not consumed.
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    /// Pending output not yet handed to the medium.
    out: BytesMut,
    /// Batched-write staging area (grow-only, exact-size).
    staging: Staging,
    /// Landing area for the batch-side exact-read guard.
    scratch: Vec<u8>,
    capacity: usize,
    writable: bool,
    closed: bool,
}

impl<M: Medium> Transcoder<M> {
    /// Creates a transcoder with the default buffer capacity.
    pub fn new(medium: M) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, medium)
    }

    /// Creates a transcoder with the given buffer capacity.
    ///
    /// The write path is engaged only when the medium reports itself
    /// writable.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, medium: M) -> Self {
        assert!(capacity > 0, "buffer capacity must be greater than zero");
        let writable = medium.can_write();
        Self {
            medium,
            buf: vec![0; capacity],
            pos: 0,
            filled: 0,
            out: BytesMut::new(),
            staging: Staging::default(),
            scratch: Vec::new(),
            capacity,
            writable,
            closed: false,
        }
    }

    pub fn can_read(&self) -> bool {
        self.medium.can_read()
    }

    pub fn can_write(&self) -> bool {
        self.medium.can_write()
    }

    pub fn can_seek(&self) -> bool {
        self.medium.can_seek()
    }

    /// Current logical position: the medium position adjusted for buffered
    /// read-ahead and pending unflushed writes.
    pub fn position(&mut self) -> Result<u64, Error> {
        self.ensure_open()?;
        let raw = self.medium.seek(SeekFrom::Current(0))?;
        let ahead = (self.filled - self.pos) as u64;
        Ok(raw - ahead + self.out.len() as u64)
    }

    /// Repositions the stream at an absolute offset.
    pub fn set_position(&mut self, position: u64) -> Result<(), Error> {
        self.seek(SeekFrom::Start(position)).map(|_| ())
    }

    /// Total stream size in bytes. Pending writes are flushed first so the
    /// answer reflects everything emitted so far.
    pub fn size(&mut self) -> Result<u64, Error> {
        self.ensure_open()?;
        self.flush_out()?;
        Ok(self.medium.size()?)
    }

    /// Capacity of the batched-write staging buffer, in bytes.
    pub fn staging_capacity(&self) -> usize {
        self.staging.capacity()
    }

    /// Repositions the stream, returning the signed distance actually moved.
    ///
    /// On a seekable medium every origin is delegated. On a non-seekable
    /// medium only a forward seek from the current position is emulated, by
    /// reading and discarding until the distance is consumed or the stream
    /// ends; the return value is then the number of bytes actually skipped,
    /// which may be short at end of stream. Anything else fails with
    /// [Error::SeekNotSupported].
    pub fn seek(&mut self, from: SeekFrom) -> Result<i64, Error> {
        self.ensure_open()?;
        if self.medium.can_seek() {
            self.flush_out()?;
            let ahead = (self.filled - self.pos) as i64;
            let old = self.medium.seek(SeekFrom::Current(0))? as i64 - ahead;
            let target = match from {
                // The medium sits ahead of the logical position by the
                // buffered unread bytes.
                SeekFrom::Current(distance) => SeekFrom::Current(distance - ahead),
                other => other,
            };
            let new = self.medium.seek(target)? as i64;
            self.pos = 0;
            self.filled = 0;
            Ok(new - old)
        } else if let SeekFrom::Current(distance) = from {
            if distance < 0 {
                return Err(Error::SeekNotSupported(
                    "cannot emulate a backward seek on a non-seekable stream",
                ));
            }
            let skipped = self.skip(distance as u64)?;
            Ok(skipped as i64)
        } else {
            Err(Error::SeekNotSupported(
                "absolute seeks require a seekable stream",
            ))
        }
    }

    /// Consumes and discards up to `remaining` bytes through the read path.
    fn skip(&mut self, mut remaining: u64) -> Result<u64, Error> {
        self.flush_out()?;
        let mut chunk = [0u8; SKIP_CHUNK];
        let mut skipped = 0u64;
        while remaining > 0 {
            let want = remaining.min(SKIP_CHUNK as u64) as usize;
            let got = self.read_buffered(&mut chunk[..want])?;
            if got == 0 {
                break;
            }
            skipped += got as u64;
            remaining -= got as u64;
        }
        trace!(skipped, "emulated forward seek");
        Ok(skipped)
    }

    /// Drains pending output to the medium and flushes the medium itself.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.flush_out()?;
        self.medium.flush()?;
        Ok(())
    }

    /// Flushes pending output, releases the staging buffer, and marks the
    /// adapter closed. A second call is a no-op. After closing, scalar reads
    /// and all writes fail with [Error::Closed]; batched reads report zero
    /// progress.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.flush_out()?;
        self.medium.flush()?;
        self.staging.release();
        self.scratch = Vec::new();
        self.buf = Vec::new();
        self.pos = 0;
        self.filled = 0;
        self.closed = true;
        debug!("transcoder closed");
        Ok(())
    }

    /// Returns a reference to the underlying medium.
    pub fn get_ref(&self) -> &M {
        &self.medium
    }

    /// Flushes pending output and returns the underlying medium.
    pub fn into_inner(mut self) -> Result<M, Error> {
        self.flush_out()?;
        Ok(self.medium)
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    /// Rejects writes on a read-only medium before anything reaches the
    /// accumulation buffer.
    fn ensure_writable(&self) -> Result<(), Error> {
        self.ensure_open()?;
        if !self.writable {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "medium is not writable",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::Reader;
    use std::io::Cursor;

    #[test]
    fn test_capabilities_delegate() {
        let transcoder = Transcoder::new(Cursor::new(Vec::new()));
        assert!(transcoder.can_read() && transcoder.can_write() && transcoder.can_seek());
        let transcoder = Transcoder::new(Reader::new(&b""[..]));
        assert!(transcoder.can_read());
        assert!(!transcoder.can_write());
        assert!(!transcoder.can_seek());
    }

    #[test]
    fn test_seek_returns_distance_moved() {
        let mut transcoder = Transcoder::new(Cursor::new(vec![0u8; 100]));
        assert_eq!(transcoder.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert_eq!(transcoder.seek(SeekFrom::Current(5)).unwrap(), 5);
        assert_eq!(transcoder.seek(SeekFrom::Current(-15)).unwrap(), -15);
        assert_eq!(transcoder.seek(SeekFrom::End(0)).unwrap(), 100);
    }

    #[test]
    fn test_seek_accounts_for_read_ahead() {
        let data: Vec<u8> = (0u8..32).collect();
        let mut transcoder = Transcoder::with_capacity(16, Cursor::new(data));
        // Consume four bytes; the buffer has read further ahead than that.
        assert_eq!(transcoder.read_i32().unwrap(), 0x00010203);
        assert_eq!(transcoder.position().unwrap(), 4);
        assert_eq!(transcoder.seek(SeekFrom::Current(4)).unwrap(), 4);
        assert_eq!(transcoder.read_u8().unwrap(), 8);
    }

    #[test]
    fn test_emulated_skip() {
        let data: Vec<u8> = (0u8..20).collect();
        let mut transcoder = Transcoder::new(Reader::new(&data[..]));
        assert_eq!(transcoder.seek(SeekFrom::Current(10)).unwrap(), 10);
        assert_eq!(transcoder.read_u8().unwrap(), 10);
    }

    #[test]
    fn test_emulated_skip_past_end() {
        let data = [0u8; 7];
        let mut transcoder = Transcoder::new(Reader::new(&data[..]));
        assert_eq!(transcoder.seek(SeekFrom::Current(10)).unwrap(), 7);
        assert_eq!(transcoder.seek(SeekFrom::Current(10)).unwrap(), 0);
    }

    #[test]
    fn test_unsupported_seeks() {
        let mut transcoder = Transcoder::new(Reader::new(&b"abc"[..]));
        assert!(matches!(
            transcoder.seek(SeekFrom::Current(-1)),
            Err(Error::SeekNotSupported(_))
        ));
        assert!(matches!(
            transcoder.seek(SeekFrom::Start(0)),
            Err(Error::SeekNotSupported(_))
        ));
        assert!(matches!(
            transcoder.seek(SeekFrom::End(-1)),
            Err(Error::SeekNotSupported(_))
        ));
    }

    #[test]
    fn test_close_releases_staging() {
        let mut transcoder = Transcoder::new(Cursor::new(Vec::new()));
        transcoder.write_i64s(&[1, 2, 3]).unwrap();
        assert_eq!(transcoder.staging_capacity(), 24);
        transcoder.close().unwrap();
        assert_eq!(transcoder.staging_capacity(), 0);
        // Repeat close and flush are no-ops.
        transcoder.close().unwrap();
        transcoder.flush().unwrap();
    }

    #[test]
    fn test_operations_after_close() {
        let mut transcoder = Transcoder::new(Cursor::new(vec![1, 2, 3, 4]));
        transcoder.close().unwrap();
        assert!(matches!(transcoder.read_i32(), Err(Error::Closed)));
        assert!(matches!(transcoder.write_i32(1), Err(Error::Closed)));
        assert!(matches!(transcoder.seek(SeekFrom::Start(0)), Err(Error::Closed)));
        let progress = transcoder.read_i32s(&mut [0; 1]);
        assert_eq!(progress, Progress { bytes: 0, complete: false });
    }

    #[test]
    fn test_write_to_read_only_medium_fails_up_front() {
        let mut transcoder = Transcoder::new(Reader::new(&b"data"[..]));
        match transcoder.write_i32(1) {
            Err(Error::Io(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::Unsupported)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_position_tracks_pending_writes() {
        let mut transcoder = Transcoder::new(Cursor::new(Vec::new()));
        transcoder.write_i32(7).unwrap();
        assert_eq!(transcoder.position().unwrap(), 4);
        assert_eq!(transcoder.size().unwrap(), 4);
    }

    #[test]
    #[should_panic(expected = "buffer capacity must be greater than zero")]
    fn test_zero_capacity_panics() {
        let _ = Transcoder::with_capacity(0, Cursor::new(Vec::new()));
    }
}
