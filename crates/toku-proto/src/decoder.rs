//! Resumable frame decoder.
//!
//! [`Decoder`] consumes transport bytes in arbitrary-sized chunks and emits
//! complete frames, maintaining enough state across calls to resume exactly
//! where it left off. It never reads past a frame's declared payload size
//! and rejects unrecognized opcodes and oversized payloads before
//! allocating.
//!
//! # Idle sentinel and internal representation
//!
//! The wire has no reserved "no frame in progress" opcode; byte 0 on the
//! wire is a real, assigned value (`HELLO`). The original C decoder reused
//! that same 0 as its in-memory idle sentinel, which makes a `HELLO` frame
//! whose header arrives split across two `feed` calls indistinguishable
//! from "idle" on the second call. This implementation instead tracks the
//! current opcode as `Option<Opcode>`, so `None` means idle and
//! `Some(Opcode::Hello)` means "decoding a `HELLO` frame" — a plain sum
//! type that removes the aliasing hazard while leaving every `feed`/
//! `consumed` contract and field offset in this file unchanged. See
//! `DESIGN.md` for the full rationale.

use crate::{
    buffer::Buffer,
    constants::DATA_SIZE_MAX,
    error::{BufferError, DecodeError},
    flags::Flags,
    opcode::Opcode,
};

/// Outcome of a single [`Decoder::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// The frame is incomplete; call `feed` again with more bytes.
    NeedsMore,
    /// A full frame is available. Header accessors and the payload view are
    /// valid until [`Decoder::reset`].
    Complete,
    /// Allocation failure. The decoder's state is not guaranteed after this;
    /// callers should discard it.
    Memory,
    /// The first byte of a new frame was not a recognized opcode. Carries
    /// that byte.
    InvalidOpcode(u8),
    /// The declared payload size exceeds [`DATA_SIZE_MAX`].
    InvalidSize {
        /// Size the header claimed.
        declared: u32,
        /// The hard limit that was exceeded.
        max: u32,
    },
}

/// Non-error half of [`FeedStatus`], returned by [`Decoder::feed_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The frame is incomplete; call `feed` again with more bytes.
    NeedsMore,
    /// A full frame is available.
    Complete,
}

/// Resumable decoder state machine.
///
/// Owned by a single connection and driven by a single task: not
/// thread-safe, performs no I/O, and every operation completes in bounded
/// time proportional to the bytes it processes.
#[derive(Clone, Default)]
pub struct Decoder {
    buffer: Buffer,
    current_opcode: Option<Opcode>,
    header_size: usize,
    payload_remaining: u32,
    complete: bool,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("buffered_len", &self.buffer.len())
            .field("current_opcode", &self.current_opcode)
            .field("header_size", &self.header_size)
            .field("payload_remaining", &self.payload_remaining)
            .field("complete", &self.complete)
            .finish()
    }
}

impl Decoder {
    /// Creates an idle decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes bytes from `data`, returning the resulting status and how
    /// many bytes were absorbed.
    ///
    /// Once this returns [`FeedStatus::Complete`], further calls return
    /// `Complete` immediately and consume 0 bytes until [`Decoder::reset`].
    pub fn feed(&mut self, data: &[u8]) -> (FeedStatus, usize) {
        if self.complete {
            return (FeedStatus::Complete, 0);
        }
        match self.current_opcode {
            None => self.read_new(data),
            Some(_) => self.read_append(data),
        }
    }

    /// [`Decoder::feed`], with the three fatal statuses folded into a
    /// `Result` for callers that prefer `?`-style propagation.
    pub fn feed_result(&mut self, data: &[u8]) -> (Result<Progress, DecodeError>, usize) {
        let (status, consumed) = self.feed(data);
        let result = match status {
            FeedStatus::NeedsMore => Ok(Progress::NeedsMore),
            FeedStatus::Complete => Ok(Progress::Complete),
            FeedStatus::Memory => Err(DecodeError::Memory),
            FeedStatus::InvalidOpcode(byte) => Err(DecodeError::InvalidOpcode(byte)),
            FeedStatus::InvalidSize { declared, max } => {
                Err(DecodeError::InvalidSize { declared, max })
            },
        };
        (result, consumed)
    }

    /// Clears `current_opcode`, `payload_remaining`, and the complete flag.
    ///
    /// Intentionally does not touch the internal buffer's allocation —
    /// subsequent frames reuse it. Call [`Decoder::release`] separately to
    /// apply the large-buffer release policy.
    pub fn reset(&mut self) {
        self.current_opcode = None;
        self.payload_remaining = 0;
        self.complete = false;
    }

    /// Applies the buffer's large-buffer release policy.
    pub fn release(&mut self) {
        self.buffer.release();
    }

    /// Bytes currently allocated by the internal buffer.
    ///
    /// Exposed for tests that need to confirm the decoder rejects an
    /// oversized declared payload before attempting to allocate for it;
    /// not otherwise load-bearing.
    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The opcode of the frame currently being decoded, if any.
    #[must_use]
    pub fn current_opcode(&self) -> Option<Opcode> {
        self.current_opcode
    }

    /// Flags of the current frame. Valid once the header has been fully
    /// received; `0` if idle.
    #[must_use]
    pub fn flags(&self) -> Flags {
        Flags::from_byte(self.buffer.as_slice().first().copied().unwrap_or(0))
    }

    /// Protocol version. Only meaningful for `HELLO`; `0` otherwise.
    #[must_use]
    pub fn version(&self) -> u8 {
        match self.current_opcode {
            Some(Opcode::Hello) => self.byte_at(1),
            _ => 0,
        }
    }

    /// Sequence number. Only meaningful for `PING`, `PONG`, `REQUEST`,
    /// `RESPONSE`, and `ERROR`; `0` otherwise.
    #[must_use]
    pub fn seq(&self) -> u32 {
        match self.current_opcode {
            Some(
                Opcode::Ping | Opcode::Pong | Opcode::Request | Opcode::Response | Opcode::Error,
            ) => self.u32_at(1),
            _ => 0,
        }
    }

    /// Status code. Only meaningful for `GOAWAY` and `ERROR`; `0` otherwise.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self.current_opcode {
            Some(Opcode::Goaway) => self.u16_at(1),
            Some(Opcode::Error) => self.u16_at(5),
            _ => 0,
        }
    }

    /// Ping interval in milliseconds. Only meaningful for `HELLO_ACK`; `0`
    /// otherwise.
    #[must_use]
    pub fn ping_interval(&self) -> u32 {
        match self.current_opcode {
            Some(Opcode::HelloAck) => self.u32_at(1),
            _ => 0,
        }
    }

    /// Declared payload size. `0` for frame types that carry no payload or
    /// while idle.
    #[must_use]
    pub fn payload_size(&self) -> u32 {
        match self.current_opcode {
            Some(Opcode::Hello) => self.u32_at(2),
            Some(Opcode::HelloAck | Opcode::Request | Opcode::Response) => self.u32_at(5),
            Some(Opcode::Push) => self.u32_at(1),
            Some(Opcode::Goaway) => self.u32_at(3),
            Some(Opcode::Error) => self.u32_at(7),
            _ => 0,
        }
    }

    /// View over the payload bytes, starting at `header_size` and running
    /// for `payload_size` bytes. Valid once [`FeedStatus::Complete`] has
    /// been returned.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.buffer.as_slice().get(self.header_size..).unwrap_or(&[])
    }

    fn byte_at(&self, offset: usize) -> u8 {
        self.buffer.as_slice().get(offset).copied().unwrap_or(0)
    }

    fn u16_at(&self, offset: usize) -> u16 {
        match self.buffer.as_slice().get(offset..offset + 2) {
            Some(bytes) => u16::from_be_bytes([bytes[0], bytes[1]]),
            None => 0,
        }
    }

    fn u32_at(&self, offset: usize) -> u32 {
        match self.buffer.as_slice().get(offset..offset + 4) {
            Some(bytes) => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            None => 0,
        }
    }

    fn read_new(&mut self, data: &[u8]) -> (FeedStatus, usize) {
        let Some(&first) = data.first() else {
            return (FeedStatus::NeedsMore, 0);
        };
        let Some(opcode) = Opcode::from_u8(first) else {
            return (FeedStatus::InvalidOpcode(first), 1);
        };

        if let Err(BufferError) = self.buffer.reset() {
            return (FeedStatus::Memory, 0);
        }
        self.current_opcode = Some(opcode);
        self.header_size = opcode.header_size();
        self.payload_remaining = 0;

        let (status, appended) = self.read_append(&data[1..]);
        (status, 1 + appended)
    }

    fn read_append(&mut self, mut data: &[u8]) -> (FeedStatus, usize) {
        let mut consumed = 0usize;

        if self.buffer.len() < self.header_size {
            let need = self.header_size - self.buffer.len();
            let take = need.min(data.len());

            if let Err(BufferError) = self.buffer.write(&data[..take]) {
                return (FeedStatus::Memory, consumed);
            }
            consumed += take;
            data = &data[take..];

            if self.buffer.len() < self.header_size {
                return (FeedStatus::NeedsMore, consumed);
            }

            let payload_total = self.payload_size();
            if payload_total > DATA_SIZE_MAX {
                return (
                    FeedStatus::InvalidSize { declared: payload_total, max: DATA_SIZE_MAX },
                    consumed,
                );
            }
            if payload_total > 0 {
                let target = self.header_size + payload_total as usize;
                if let Err(BufferError) = self.buffer.ensure_capacity(target) {
                    return (FeedStatus::Memory, consumed);
                }
            }
            self.payload_remaining = payload_total;
        }

        let take = (self.payload_remaining as usize).min(data.len());
        if take > 0 {
            if let Err(BufferError) = self.buffer.write(&data[..take]) {
                return (FeedStatus::Memory, consumed);
            }
            #[allow(clippy::cast_possible_truncation)]
            {
                self.payload_remaining -= take as u32;
            }
            consumed += take;
        }

        if self.payload_remaining == 0 {
            self.complete = true;
            (FeedStatus::Complete, consumed)
        } else {
            (FeedStatus::NeedsMore, consumed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{append_error, append_goaway, append_hello, append_ping, append_request};

    #[test]
    fn ping_scenario() {
        let mut dec = Decoder::new();
        let (status, consumed) = dec.feed(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(status, FeedStatus::Complete);
        assert_eq!(consumed, 6);
        assert_eq!(dec.seq(), 1);
        assert_eq!(dec.flags().to_byte(), 0);
        assert_eq!(dec.payload_size(), 0);
    }

    #[test]
    fn hello_scenario() {
        let mut dec = Decoder::new();
        let (status, consumed) =
            dec.feed(&[0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(status, FeedStatus::Complete);
        assert_eq!(consumed, 7);
        assert_eq!(dec.version(), 1);
        assert_eq!(dec.payload_size(), 0);
    }

    #[test]
    fn request_scenario() {
        let mut dec = Decoder::new();
        let bytes =
            [0x04, 0x01, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x03, 0x61, 0x62, 0x63];
        let (status, consumed) = dec.feed(&bytes);
        assert_eq!(status, FeedStatus::Complete);
        assert_eq!(consumed, bytes.len());
        assert_eq!(dec.seq(), 10);
        assert_eq!(dec.payload(), b"abc");
    }

    #[test]
    fn goaway_scenario() {
        let mut dec = Decoder::new();
        let bytes = [0x07, 0x00, 0x01, 0xF4, 0x00, 0x00, 0x00, 0x02, 0xFF, 0xFE];
        let (status, _) = dec.feed(&bytes);
        assert_eq!(status, FeedStatus::Complete);
        assert_eq!(dec.code(), 500);
    }

    #[test]
    fn error_scenario_no_payload_call() {
        let mut dec = Decoder::new();
        let bytes = [0x09, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x00];
        let (status, _) = dec.feed(&bytes);
        assert_eq!(status, FeedStatus::Complete);
        assert_eq!(dec.seq(), 7);
        assert_eq!(dec.code(), 42);
        assert_eq!(dec.payload_size(), 0);
    }

    #[test]
    fn unknown_opcode_is_rejected() {
        let mut dec = Decoder::new();
        let (status, consumed) = dec.feed(&[0xFF]);
        assert_eq!(status, FeedStatus::InvalidOpcode(0xFF));
        assert_eq!(consumed, 1);
    }

    #[test]
    fn oversized_request_is_rejected_without_payload_allocation() {
        let mut dec = Decoder::new();
        let mut header = vec![0x04, 0x00, 0x00, 0x00, 0x00, 0x00];
        header.extend_from_slice(&(100 * 1024 * 1024u32).to_be_bytes());
        let (status, _) = dec.feed(&header);
        assert_eq!(
            status,
            FeedStatus::InvalidSize { declared: 100 * 1024 * 1024, max: DATA_SIZE_MAX }
        );
        // The header itself is a handful of bytes; nothing near the declared
        // 100 MiB should ever have been requested from the allocator.
        assert!(dec.buffer_capacity() <= 64);
    }

    #[test]
    fn byte_at_a_time_matches_whole_feed() {
        let mut buf = Buffer::new();
        append_request(&mut buf, Flags::from_byte(0), 99, b"hello world").unwrap();
        let whole = buf.as_slice().to_vec();

        let mut dec = Decoder::new();
        let mut total_consumed = 0;
        let mut last_status = FeedStatus::NeedsMore;
        for byte in &whole {
            let (status, consumed) = dec.feed(std::slice::from_ref(byte));
            assert_eq!(consumed, 1);
            total_consumed += consumed;
            last_status = status;
            if status == FeedStatus::Complete {
                break;
            }
        }
        assert_eq!(last_status, FeedStatus::Complete);
        assert_eq!(total_consumed, whole.len());
        assert_eq!(dec.seq(), 99);
        assert_eq!(dec.payload(), b"hello world");
    }

    #[test]
    fn idempotent_completion() {
        let mut dec = Decoder::new();
        let mut buf = Buffer::new();
        append_ping(&mut buf, Flags::from_byte(0), 5).unwrap();
        let (status, _) = dec.feed(buf.as_slice());
        assert_eq!(status, FeedStatus::Complete);

        let (status2, consumed2) = dec.feed(b"more bytes that should be ignored");
        assert_eq!(status2, FeedStatus::Complete);
        assert_eq!(consumed2, 0);

        dec.reset();
        let (status3, consumed3) = dec.feed(buf.as_slice());
        assert_eq!(status3, FeedStatus::Complete);
        assert_eq!(consumed3, buf.as_slice().len());
    }

    #[test]
    fn chunking_invariance_across_opcodes() {
        let mut buf = Buffer::new();
        append_hello(&mut buf, Flags::from_byte(0), b"hi").unwrap();
        append_error(&mut buf, Flags::from_byte(0), 3, 9, b"oops").unwrap();
        let whole = buf.as_slice().to_vec();

        for chunk_size in 1..=whole.len() {
            let mut dec = Decoder::new();
            let mut offset = 0;
            let mut frames = Vec::new();
            while offset < whole.len() {
                let end = (offset + chunk_size).min(whole.len());
                let (status, consumed) = dec.feed(&whole[offset..end]);
                offset += consumed;
                if status == FeedStatus::Complete {
                    frames.push((dec.current_opcode(), dec.payload().to_vec()));
                    dec.reset();
                } else if consumed == 0 && offset == end {
                    // Needs more bytes in this chunk; advance to next chunk.
                    offset = end;
                }
            }
            assert_eq!(
                frames,
                vec![
                    (Some(Opcode::Hello), b"hi".to_vec()),
                    (Some(Opcode::Error), b"oops".to_vec()),
                ],
                "mismatch at chunk_size={chunk_size}"
            );
        }
    }
}
