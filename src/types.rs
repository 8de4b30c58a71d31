//! Typed values and array shapes accepted by the transcoder.

pub mod kind;
pub mod value;

pub use kind::Kind;
pub use value::{Array, Leaf, Scalar, Value};
