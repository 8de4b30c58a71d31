//! Read path: buffered reads, the exact-read guard, and scalar/batch
//! big-endian decoding.
//!
//! Two guard entry points split the error contract. [Transcoder::read_fully]
//! backs the scalar reads and propagates [Error::UnexpectedEndOfStream] with
//! the shortfall. The batch-side guard absorbs truncation and transport
//! failures into a short byte count; batch decodes then convert whatever
//! whole elements arrived and report [Progress] instead of failing.

use super::{Progress, Transcoder};
use crate::{
    error::Error,
    medium::Medium,
    types::{Kind, Scalar},
};
use bytes::Buf;
use paste::paste;
use std::io;
use tracing::trace;

impl<M: Medium> Transcoder<M> {
    /// Reads up to `dst.len()` bytes through the internal buffer. Requests
    /// at least as large as the buffer bypass it when it is empty.
    pub(super) fn read_buffered(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }
        if self.pos >= self.filled {
            if dst.len() >= self.buf.len() {
                return self.medium.read(dst);
            }
            self.pos = 0;
            self.filled = self.medium.read(&mut self.buf)?;
            if self.filled == 0 {
                return Ok(0);
            }
        }
        let n = dst.len().min(self.filled - self.pos);
        dst[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    /// Exact-read guard: fills `dst` completely or reports how far it got.
    fn read_fully(&mut self, dst: &mut [u8]) -> Result<(), Error> {
        self.flush_out()?;
        let mut filled = 0;
        while filled < dst.len() {
            let got = self.read_buffered(&mut dst[filled..])?;
            if got == 0 {
                return Err(Error::UnexpectedEndOfStream {
                    expected: dst.len(),
                    actual: filled,
                });
            }
            filled += got;
        }
        Ok(())
    }

    /// Batch-side guard: accumulates up to `want` bytes into the scratch
    /// buffer, swallowing truncation and transport failures into a short
    /// count.
    fn fill_scratch(&mut self, want: usize) -> usize {
        if self.closed || self.flush_out().is_err() {
            return 0;
        }
        let mut scratch = std::mem::take(&mut self.scratch);
        if scratch.len() < want {
            scratch.resize(want, 0);
        }
        let mut filled = 0;
        while filled < want {
            match self.read_buffered(&mut scratch[filled..want]) {
                Ok(0) => break,
                Ok(got) => filled += got,
                Err(err) => {
                    trace!(%err, "read failure absorbed by batch decode");
                    break;
                }
            }
        }
        self.scratch = scratch;
        filled
    }

    /// Reads one boolean byte. Zero decodes as `false`, anything else as
    /// `true`.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.ensure_open()?;
        let mut wire = [0u8; 1];
        self.read_fully(&mut wire)?;
        Ok(wire[0] != 0)
    }

    /// Decodes booleans into `dst` until it is full or the stream ends.
    pub fn read_bools(&mut self, dst: &mut [bool]) -> Progress {
        let got = self.fill_scratch(dst.len());
        for (slot, wire) in dst.iter_mut().zip(&self.scratch[..got]) {
            *slot = *wire != 0;
        }
        Progress {
            bytes: got,
            complete: got == dst.len(),
        }
    }

    /// Reads one scalar of the given kind. Text has no fixed wire width and
    /// cannot be read.
    pub fn read_scalar(&mut self, kind: Kind) -> Result<Scalar, Error> {
        match kind {
            Kind::Bool => self.read_bool().map(Scalar::Bool),
            Kind::U8 => self.read_u8().map(Scalar::U8),
            Kind::I8 => self.read_i8().map(Scalar::I8),
            Kind::Char => self.read_char().map(Scalar::Char),
            Kind::I16 => self.read_i16().map(Scalar::I16),
            Kind::I32 => self.read_i32().map(Scalar::I32),
            Kind::I64 => self.read_i64().map(Scalar::I64),
            Kind::F32 => self.read_f32().map(Scalar::F32),
            Kind::F64 => self.read_f64().map(Scalar::F64),
            Kind::Text => Err(Error::UnsupportedType(Kind::Text.name())),
        }
    }
}

// Scalar and batch reads for every fixed-width kind. The scalar form
// propagates truncation; the batch form decodes the whole elements that
// arrived and leaves the rest of the destination untouched.
macro_rules! impl_reads {
    ($($name:ident: $ty:ty => $get:ident),+ $(,)?) => { paste! { $(
        impl<M: Medium> Transcoder<M> {
            #[doc = concat!("Reads one big-endian `", stringify!($ty), "`.")]
            pub fn [<read_ $name>](&mut self) -> Result<$ty, Error> {
                self.ensure_open()?;
                let mut wire = [0u8; std::mem::size_of::<$ty>()];
                self.read_fully(&mut wire)?;
                let mut src = &wire[..];
                Ok(src.$get())
            }

            #[doc = concat!(
                "Decodes big-endian `", stringify!($ty),
                "` elements into `dst` until it is full or the stream ends.",
            )]
            pub fn [<read_ $name s>](&mut self, dst: &mut [$ty]) -> Progress {
                let width = std::mem::size_of::<$ty>();
                let got = self.fill_scratch(width * dst.len());
                let whole = got / width;
                let mut src = &self.scratch[..whole * width];
                for slot in &mut dst[..whole] {
                    *slot = src.$get();
                }
                Progress {
                    bytes: whole * width,
                    complete: whole == dst.len(),
                }
            }
        }
    )+ } };
}

impl_reads! {
    u8: u8 => get_u8,
    i8: i8 => get_i8,
    char: u16 => get_u16,
    i16: i16 => get_i16,
    i32: i32 => get_i32,
    i64: i64 => get_i64,
    f32: f32 => get_f32,
    f64: f64 => get_f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::Reader;
    use std::io::Cursor;

    fn over(bytes: &[u8]) -> Transcoder<Cursor<Vec<u8>>> {
        Transcoder::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn test_scalar_decode() {
        let mut transcoder = over(&[
            0x01, 0x02, 0x03, 0x04, // i32
            0x00, 0x41, // char 'A'
            0xFF, 0xFF, // i16 -1
        ]);
        assert_eq!(transcoder.read_i32().unwrap(), 0x01020304);
        assert_eq!(transcoder.read_char().unwrap(), 0x0041);
        assert_eq!(transcoder.read_i16().unwrap(), -1);
    }

    #[test]
    fn test_float_decode_is_bit_pattern() {
        let mut transcoder = over(&1.5f32.to_be_bytes());
        assert_eq!(transcoder.read_f32().unwrap(), 1.5);
        let mut transcoder = over(&f64::NAN.to_be_bytes());
        assert_eq!(
            transcoder.read_f64().unwrap().to_bits(),
            f64::NAN.to_bits()
        );
    }

    #[test]
    fn test_scalar_truncation_reports_shortfall() {
        let mut transcoder = over(&[0x01, 0x02, 0x03]);
        match transcoder.read_i32() {
            Err(Error::UnexpectedEndOfStream { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_lenient_bool_decode() {
        let mut transcoder = over(&[0x00, 0x01, 0x02, 0xFF]);
        assert!(!transcoder.read_bool().unwrap());
        assert!(transcoder.read_bool().unwrap());
        assert!(transcoder.read_bool().unwrap());
        assert!(transcoder.read_bool().unwrap());
    }

    #[test]
    fn test_batch_partial_decode() {
        // Ten bytes is two and a half i32 elements.
        let mut transcoder = over(&[0, 0, 0, 1, 0, 0, 0, 2, 0, 0]);
        let mut dst = [-1i32; 10];
        let progress = transcoder.read_i32s(&mut dst);
        assert_eq!(
            progress,
            Progress {
                bytes: 8,
                complete: false
            }
        );
        assert_eq!(&dst[..2], &[1, 2]);
        // Elements past the decoded prefix are untouched.
        assert!(dst[2..].iter().all(|&v| v == -1));
    }

    #[test]
    fn test_batch_complete_decode() {
        let mut transcoder = over(&[0x00, 0x01, 0x00, 0x02]);
        let mut dst = [0u16; 2];
        let progress = transcoder.read_chars(&mut dst);
        assert_eq!(
            progress,
            Progress {
                bytes: 4,
                complete: true
            }
        );
        assert_eq!(dst, [1, 2]);
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let mut transcoder = over(&[]);
        let progress = transcoder.read_f64s(&mut []);
        assert_eq!(
            progress,
            Progress {
                bytes: 0,
                complete: true
            }
        );
    }

    #[test]
    fn test_batch_larger_than_buffer_bypasses_it() {
        let data: Vec<u8> = (0..64u8).collect();
        let mut transcoder = Transcoder::with_capacity(8, Cursor::new(data.clone()));
        let mut dst = [0u8; 64];
        let progress = transcoder.read_u8s(&mut dst);
        assert!(progress.complete);
        assert_eq!(&dst[..], &data[..]);
    }

    #[test]
    fn test_short_reads_are_accumulated() {
        // A reader that delivers one byte per call; the guard must still
        // fill the destination exactly.
        struct Dribble<'a>(&'a [u8]);
        impl std::io::Read for Dribble<'_> {
            fn read(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
                if self.0.is_empty() {
                    return Ok(0);
                }
                dst[0] = self.0[0];
                self.0 = &self.0[1..];
                Ok(1)
            }
        }
        let mut transcoder = Transcoder::new(Reader::new(Dribble(&[
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
        ])));
        assert_eq!(transcoder.read_i64().unwrap(), 0x0102030405060708);
    }

    #[test]
    fn test_read_scalar_dispatch() {
        let mut transcoder = over(&[0x01, 0x7F]);
        assert_eq!(
            transcoder.read_scalar(Kind::Bool).unwrap(),
            Scalar::Bool(true)
        );
        assert_eq!(transcoder.read_scalar(Kind::I8).unwrap(), Scalar::I8(127));
        assert!(matches!(
            transcoder.read_scalar(Kind::Text),
            Err(Error::UnsupportedType("text"))
        ));
    }
}
