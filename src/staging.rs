//! Reusable staging buffer for batched writes.

/// Grow-only scratch area backing every batched write.
///
/// Invariant: the buffer grows to exactly the requested batch size, never
/// over-allocates, and never shrinks until [Staging::release]. One instance
/// is owned by each transcoder; it is never shared.
#[derive(Debug, Default)]
pub(crate) struct Staging {
    buf: Vec<u8>,
}

impl Staging {
    /// Returns a mutable window of exactly `len` bytes, reallocating only
    /// when the current buffer is smaller.
    pub fn prepare(&mut self, len: usize) -> &mut [u8] {
        if self.buf.len() < len {
            self.buf = vec![0; len];
        }
        &mut self.buf[..len]
    }

    /// The first `len` bytes, as most recently filled by [Staging::prepare].
    pub fn filled(&self, len: usize) -> &[u8] {
        &self.buf[..len]
    }

    /// Current allocation size in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Drops the allocation entirely; capacity returns to zero.
    pub fn release(&mut self) {
        self.buf = Vec::new();
    }
}
