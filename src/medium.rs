//! The byte-stream seam between the transcoder and the outside world.
//!
//! A [Medium] is whatever the transcoded bytes ultimately come from or go
//! to: a file, an in-memory buffer, a socket, a decompressor. Capability
//! flags describe what the endpoint supports so the adapter can decide up
//! front whether to engage its write path or emulate a seek; operations
//! outside the advertised capabilities fail with
//! [std::io::ErrorKind::Unsupported].

use std::{
    fs::File,
    io::{self, Cursor, SeekFrom},
};

/// An underlying byte stream.
///
/// `read` may return fewer bytes than requested; `Ok(0)` signals end of
/// stream. The exact-read guarantee is layered on top by the transcoder,
/// never expected from the medium itself.
pub trait Medium {
    fn can_read(&self) -> bool;
    fn can_write(&self) -> bool;
    fn can_seek(&self) -> bool;

    /// Reads up to `dst.len()` bytes, returning how many were read.
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize>;

    /// Writes all of `src` or fails.
    fn write_all(&mut self, src: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Repositions the stream, returning the new absolute position.
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64>;

    /// Total size of the stream in bytes, when knowable.
    fn size(&self) -> io::Result<u64>;
}

fn unsupported(what: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, what)
}

/// File handles do not expose their open mode, so all capabilities are
/// advertised; a misdirected call surfaces as an I/O error from the OS.
impl Medium for File {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, dst)
    }

    fn write_all(&mut self, src: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, src)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(self)
    }

    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        io::Seek::seek(self, from)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

/// In-memory stream, readable, writable, and seekable.
impl Medium for Cursor<Vec<u8>> {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, dst)
    }

    fn write_all(&mut self, src: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, src)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        io::Seek::seek(self, from)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }
}

/// Read-only, non-seekable wrapper for any [io::Read] endpoint (socket,
/// decompressor, pipe).
pub struct Reader<R> {
    inner: R,
}

impl<R: io::Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> Medium for Reader<R> {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        false
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        self.inner.read(dst)
    }

    fn write_all(&mut self, _: &[u8]) -> io::Result<()> {
        Err(unsupported("write on a read-only medium"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
        Err(unsupported("seek on a non-seekable medium"))
    }

    fn size(&self) -> io::Result<u64> {
        Err(unsupported("size of a non-seekable medium"))
    }
}

/// Write-only, non-seekable wrapper for any [io::Write] endpoint.
pub struct Writer<W> {
    inner: W,
}

impl<W: io::Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Medium for Writer<W> {
    fn can_read(&self) -> bool {
        false
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(unsupported("read on a write-only medium"))
    }

    fn write_all(&mut self, src: &[u8]) -> io::Result<()> {
        self.inner.write_all(src)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
        Err(unsupported("seek on a non-seekable medium"))
    }

    fn size(&self) -> io::Result<u64> {
        Err(unsupported("size of a non-seekable medium"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_capabilities() {
        let cursor = Cursor::new(Vec::new());
        assert!(cursor.can_read() && cursor.can_write() && cursor.can_seek());
    }

    #[test]
    fn test_cursor_roundtrip() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_all(b"abcd").unwrap();
        assert_eq!(Medium::size(&cursor).unwrap(), 4);
        Medium::seek(&mut cursor, SeekFrom::Start(1)).unwrap();
        let mut dst = [0u8; 2];
        assert_eq!(Medium::read(&mut cursor, &mut dst).unwrap(), 2);
        assert_eq!(&dst, b"bc");
    }

    #[test]
    fn test_reader_capabilities() {
        let mut reader = Reader::new(&b"xyz"[..]);
        assert!(reader.can_read());
        assert!(!reader.can_write());
        assert!(!reader.can_seek());
        let err = reader.write_all(b"no").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        let err = reader.seek(SeekFrom::Start(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_writer_capabilities() {
        let mut writer = Writer::new(Vec::new());
        assert!(!writer.can_read());
        assert!(writer.can_write());
        writer.write_all(b"ok").unwrap();
        let err = writer.read(&mut [0u8; 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert_eq!(writer.into_inner(), b"ok");
    }
}
