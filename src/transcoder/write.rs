//! Write path: scalar/batch big-endian encoding, the staging buffer, and
//! the output accumulation buffer.
//!
//! Scalar writes append to the accumulation buffer and drain it once it
//! reaches capacity. Batch writes size the staging buffer once for the
//! whole run, serialize every element into it, then emit it; batches at
//! least as large as the accumulation buffer go straight to the medium.

use super::Transcoder;
use crate::{
    error::Error,
    medium::Medium,
    types::Scalar,
};
use bytes::BufMut;
use paste::paste;

impl<M: Medium> Transcoder<M> {
    /// Drains the accumulation buffer to the medium.
    pub(super) fn flush_out(&mut self) -> Result<(), Error> {
        if self.out.is_empty() {
            return Ok(());
        }
        self.medium.write_all(&self.out)?;
        self.out.clear();
        Ok(())
    }

    /// Drains the accumulation buffer once it reaches capacity.
    fn spill(&mut self) -> Result<(), Error> {
        if self.out.len() >= self.capacity {
            self.flush_out()
        } else {
            Ok(())
        }
    }

    /// Emits `len` staged bytes.
    fn emit_staged(&mut self, len: usize) -> Result<(), Error> {
        if len >= self.capacity {
            self.flush_out()?;
            self.medium.write_all(self.staging.filled(len))?;
            Ok(())
        } else {
            self.out.extend_from_slice(self.staging.filled(len));
            self.spill()
        }
    }

    /// Writes one boolean byte, `0x00` or `0x01`.
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.ensure_writable()?;
        self.out.put_u8(value as u8);
        self.spill()
    }

    /// Writes booleans as one byte each.
    pub fn write_bools(&mut self, src: &[bool]) -> Result<(), Error> {
        self.ensure_writable()?;
        let wire = self.staging.prepare(src.len());
        for (slot, value) in wire.iter_mut().zip(src) {
            *slot = *value as u8;
        }
        self.emit_staged(src.len())
    }

    /// Writes one raw byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.ensure_writable()?;
        self.out.put_u8(value);
        self.spill()
    }

    /// Writes raw bytes as-is. No staging: the run is already wire-shaped.
    pub fn write_u8s(&mut self, src: &[u8]) -> Result<(), Error> {
        self.ensure_writable()?;
        if src.len() >= self.capacity {
            self.flush_out()?;
            self.medium.write_all(src)?;
            return Ok(());
        }
        self.out.extend_from_slice(src);
        self.spill()
    }

    /// Writes the string as raw bytes, one byte per character (the low
    /// eight bits of each code point), with no length prefix or terminator.
    pub fn write_text(&mut self, value: &str) -> Result<(), Error> {
        self.ensure_writable()?;
        for c in value.chars() {
            self.out.put_u8(c as u8);
        }
        self.spill()
    }

    /// Writes strings back-to-back with no separators.
    pub fn write_texts<S: AsRef<str>>(&mut self, src: &[S]) -> Result<(), Error> {
        for value in src {
            self.write_text(value.as_ref())?;
        }
        Ok(())
    }

    /// Writes one scalar of any supported kind.
    pub fn write_scalar(&mut self, value: &Scalar) -> Result<(), Error> {
        match value {
            Scalar::Bool(v) => self.write_bool(*v),
            Scalar::U8(v) => self.write_u8(*v),
            Scalar::I8(v) => self.write_i8(*v),
            Scalar::Char(v) => self.write_char(*v),
            Scalar::I16(v) => self.write_i16(*v),
            Scalar::I32(v) => self.write_i32(*v),
            Scalar::I64(v) => self.write_i64(*v),
            Scalar::F32(v) => self.write_f32(*v),
            Scalar::F64(v) => self.write_f64(*v),
            Scalar::Text(v) => self.write_text(v),
        }
    }
}

// Scalar and batch writes for the fixed-width numeric kinds. Floats are
// emitted as their IEEE-754 bit patterns, never numerically converted.
macro_rules! impl_writes {
    ($($name:ident: $ty:ty => $put:ident),+ $(,)?) => { paste! { $(
        impl<M: Medium> Transcoder<M> {
            #[doc = concat!("Writes one `", stringify!($ty), "` big-endian.")]
            pub fn [<write_ $name>](&mut self, value: $ty) -> Result<(), Error> {
                self.ensure_writable()?;
                self.out.$put(value);
                self.spill()
            }

            #[doc = concat!(
                "Writes a run of `", stringify!($ty),
                "` elements big-endian, staging the whole batch at once.",
            )]
            pub fn [<write_ $name s>](&mut self, src: &[$ty]) -> Result<(), Error> {
                self.ensure_writable()?;
                let need = std::mem::size_of::<$ty>() * src.len();
                let mut wire = self.staging.prepare(need);
                for value in src {
                    wire.$put(*value);
                }
                self.emit_staged(need)
            }
        }
    )+ } };
}

impl_writes! {
    i8: i8 => put_i8,
    char: u16 => put_u16,
    i16: i16 => put_i16,
    i32: i32 => put_i32,
    i64: i64 => put_i64,
    f32: f32 => put_f32,
    f64: f64 => put_f64,
}
