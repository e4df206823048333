//! Error types for buffer allocation and frame decoding.
//!
//! Strongly-typed per layer, following the same split the rest of the
//! workspace uses for connection vs. transport errors: the buffer only ever
//! fails one way, while the decoder's failures are a closed set of three
//! protocol-relevant kinds.

use thiserror::Error;

/// Buffer growth or allocation failure.
///
/// In practice this only fires when a requested capacity does not fit in
/// `usize`/`isize::MAX` — Rust's global allocator aborts the process on a
/// genuine out-of-memory condition rather than returning an error, unlike
/// the `realloc`-based buffer this type is modeled on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("buffer allocation failed")]
pub struct BufferError;

/// Fatal decode error for the frame currently in progress.
///
/// All three variants are unrecoverable for the current byte stream: the
/// session layer is expected to close the transport, since there is no
/// framing delimiter to resynchronize on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The decoder's internal buffer failed to grow.
    #[error("buffer allocation failed")]
    Memory,

    /// The first byte of a new frame was not a recognized opcode.
    #[error("unrecognized opcode {0:#04x}")]
    InvalidOpcode(u8),

    /// The declared payload size exceeds [`crate::DATA_SIZE_MAX`].
    #[error("declared payload size {declared} exceeds DATA_SIZE_MAX ({max})")]
    InvalidSize {
        /// Size the header claimed.
        declared: u32,
        /// The hard limit that was exceeded.
        max: u32,
    },
}

impl From<BufferError> for DecodeError {
    fn from(_: BufferError) -> Self {
        Self::Memory
    }
}
