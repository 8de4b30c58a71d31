//! Recursive dispatcher over nested and rectangular arrays.
//!
//! Reads fill the caller's destination in place and report the number of
//! bytes actually transcoded; ordinary truncation never fails, it just
//! stops contributing to the count. Structural problems (a scalar where an
//! array is required, a kind outside the supported set, a rectangular
//! destination on the read path) always propagate.

use super::{Progress, Transcoder};
use crate::{
    error::Error,
    medium::Medium,
    types::{Array, Kind, Leaf, Value},
};

impl<M: Medium> Transcoder<M> {
    /// Reads into every leaf run of `value`, in index order, and returns
    /// the number of bytes transcoded.
    ///
    /// The count is reset at the start of each call and accumulated across
    /// the recursive walk, so a truncated stream yields how far decoding
    /// progressed; the remainder of the destination is left unspecified.
    /// Only jagged nesting is readable: a rectangular destination fails
    /// with [Error::UnsupportedShape], the converse of the write path.
    pub fn read_array(&mut self, value: &mut Value) -> Result<usize, Error> {
        let array = match value {
            Value::Scalar(_) => {
                return Err(Error::InvalidArgument("read_array requires an array value"))
            }
            Value::Array(array) => array,
        };
        let mut transcoded = 0;
        self.read_nested(array, &mut transcoded)?;
        Ok(transcoded)
    }

    fn read_nested(&mut self, array: &mut Array, transcoded: &mut usize) -> Result<(), Error> {
        match array {
            Array::Jagged(items) => {
                for item in items {
                    self.read_nested(item, transcoded)?;
                }
                Ok(())
            }
            Array::Rectangular { .. } => Err(Error::UnsupportedShape(
                "rectangular arrays cannot be read in place; use a jagged destination",
            )),
            Array::Flat(leaf) => {
                *transcoded += self.read_leaf(leaf)?.bytes;
                Ok(())
            }
        }
    }

    fn read_leaf(&mut self, leaf: &mut Leaf) -> Result<Progress, Error> {
        match leaf {
            Leaf::Bool(run) => Ok(self.read_bools(run)),
            Leaf::U8(run) => Ok(self.read_u8s(run)),
            Leaf::I8(run) => Ok(self.read_i8s(run)),
            Leaf::Char(run) => Ok(self.read_chars(run)),
            Leaf::I16(run) => Ok(self.read_i16s(run)),
            Leaf::I32(run) => Ok(self.read_i32s(run)),
            Leaf::I64(run) => Ok(self.read_i64s(run)),
            Leaf::F32(run) => Ok(self.read_f32s(run)),
            Leaf::F64(run) => Ok(self.read_f64s(run)),
            Leaf::Text(_) => Err(Error::UnsupportedType(Kind::Text.name())),
        }
    }

    /// Writes every leaf run of `value` in index order.
    ///
    /// Jagged nests recurse; rectangular blocks emit their row-major flat
    /// data as a single run, which is only defined for the fixed-width
    /// numeric kinds.
    pub fn write_array(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Scalar(_) => Err(Error::InvalidArgument(
                "write_array requires an array value",
            )),
            Value::Array(array) => self.write_nested(array),
        }
    }

    fn write_nested(&mut self, array: &Array) -> Result<(), Error> {
        match array {
            Array::Jagged(items) => {
                for item in items {
                    self.write_nested(item)?;
                }
                Ok(())
            }
            Array::Rectangular { data, .. } => self.write_rectangular(data),
            Array::Flat(leaf) => self.write_leaf(leaf),
        }
    }

    fn write_rectangular(&mut self, data: &Leaf) -> Result<(), Error> {
        match data {
            Leaf::Bool(_) | Leaf::Char(_) | Leaf::Text(_) => {
                Err(Error::UnsupportedShape(data.kind().name()))
            }
            leaf => self.write_leaf(leaf),
        }
    }

    fn write_leaf(&mut self, leaf: &Leaf) -> Result<(), Error> {
        match leaf {
            Leaf::Bool(run) => self.write_bools(run),
            Leaf::U8(run) => self.write_u8s(run),
            Leaf::I8(run) => self.write_i8s(run),
            Leaf::Char(run) => self.write_chars(run),
            Leaf::I16(run) => self.write_i16s(run),
            Leaf::I32(run) => self.write_i32s(run),
            Leaf::I64(run) => self.write_i64s(run),
            Leaf::F32(run) => self.write_f32s(run),
            Leaf::F64(run) => self.write_f64s(run),
            Leaf::Text(run) => self.write_texts(run),
        }
    }
}
