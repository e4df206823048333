//! Growable, append-only byte buffer shared by the encoder and decoder.
//!
//! Backed by a `Vec<u8>` rather than a hand-rolled `malloc`/`realloc` pair —
//! the idiomatic Rust stand-in for the original's manual reallocation, with
//! the same amortized-growth and large-buffer-release policy.

use crate::{
    constants::{INITIAL_CAPACITY, RELEASE_THRESHOLD},
    error::BufferError,
};

/// An append-only region with amortized doubling growth.
///
/// # Invariants
///
/// `length <= capacity` always holds (enforced by `Vec` itself). Storage is
/// either unallocated (`length == 0 && capacity == 0`) or owns `capacity`
/// bytes, of which the first `length` are valid data.
///
/// Callers must not rely on pointer stability across writes: any mutating
/// call may reallocate and invalidate previously returned slices.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Creates an empty, unallocated buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Valid bytes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no valid bytes are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes currently allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// A view over the valid bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Appends `bytes`, growing capacity to `2 * (length + bytes.len())` if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError`] if growth fails. On failure, the buffer's
    /// prior contents and capacity are left untouched.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        let needed = self.data.len().checked_add(bytes.len()).ok_or(BufferError)?;
        if needed > self.data.capacity() {
            let target = needed.checked_mul(2).ok_or(BufferError)?;
            let additional = target - self.data.len();
            self.data.try_reserve_exact(additional).map_err(|_| BufferError)?;
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Grows capacity to exactly `minimum` if it is currently smaller. Never
    /// shrinks.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError`] if growth fails.
    pub fn ensure_capacity(&mut self, minimum: usize) -> Result<(), BufferError> {
        if self.data.capacity() < minimum {
            let additional = minimum - self.data.len();
            self.data.try_reserve_exact(additional).map_err(|_| BufferError)?;
        }
        Ok(())
    }

    /// Resets length to 0. Lazily allocates the initial 512 KiB the first
    /// time this is called on an unallocated buffer; otherwise preserves the
    /// existing capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError`] if the initial allocation fails.
    pub fn reset(&mut self) -> Result<(), BufferError> {
        if self.data.capacity() == 0 {
            self.data.try_reserve_exact(INITIAL_CAPACITY).map_err(|_| BufferError)?;
        }
        self.data.clear();
        Ok(())
    }

    /// Frees storage if capacity reached the large-buffer threshold,
    /// otherwise only resets length.
    ///
    /// Keeps the hot per-connection allocation cached for small frames, and
    /// returns memory to the allocator after a large burst.
    pub fn release(&mut self) {
        if self.data.capacity() >= RELEASE_THRESHOLD {
            self.data = Vec::new();
        } else {
            self.data.clear();
        }
    }

    /// Shifts the bytes `[pos, length)` to the front of the buffer, used by
    /// the enclosing session layer after partial drains.
    ///
    /// # Panics
    ///
    /// Panics if `pos > self.len()`.
    pub fn compact(&mut self, pos: usize) {
        let len = self.data.len();
        assert!(pos <= len, "compact position {pos} out of bounds for length {len}");
        self.data.copy_within(pos.., 0);
        self.data.truncate(len - pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_unallocated() {
        let buf = Buffer::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn write_appends_and_preserves_prior_contents() {
        let mut buf = Buffer::new();
        buf.write(b"hello").unwrap();
        buf.write(b" world").unwrap();
        assert_eq!(buf.as_slice(), b"hello world");
    }

    #[test]
    fn ensure_capacity_never_shrinks() {
        let mut buf = Buffer::new();
        buf.ensure_capacity(1000).unwrap();
        let grown = buf.capacity();
        assert!(grown >= 1000);
        buf.ensure_capacity(10).unwrap();
        assert_eq!(buf.capacity(), grown);
    }

    #[test]
    fn reset_lazily_allocates_then_preserves_capacity() {
        let mut buf = Buffer::new();
        buf.reset().unwrap();
        assert!(buf.capacity() >= 512 * 1024);
        let cap = buf.capacity();

        buf.write(b"abc").unwrap();
        buf.reset().unwrap();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn release_frees_large_buffer() {
        let mut buf = Buffer::new();
        buf.ensure_capacity(3 * 1024 * 1024).unwrap();
        buf.write(b"payload").unwrap();
        buf.release();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn release_keeps_small_buffer() {
        let mut buf = Buffer::new();
        buf.reset().unwrap();
        buf.write(b"payload").unwrap();
        let cap = buf.capacity();
        buf.release();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn compact_shifts_tail_to_front() {
        let mut buf = Buffer::new();
        buf.write(b"ABCDEF").unwrap();
        buf.compact(2);
        assert_eq!(buf.as_slice(), b"CDEF");
    }
}
