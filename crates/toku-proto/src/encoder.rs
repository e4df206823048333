//! Frame encoding: one append operation per frame type.
//!
//! Each function writes the opcode byte, the fixed header, and then the
//! variable-length payload to a caller-owned [`Buffer`] in one logical
//! operation — one `Buffer::write` for the opcode+header block, and a
//! second for the payload, skipped when the payload is empty. All
//! multi-byte integers are big-endian.

use crate::{buffer::Buffer, constants::VERSION, error::BufferError, flags::Flags, opcode::Opcode};

/// Appends a `HELLO` frame. `version` is always [`VERSION`].
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_hello(buf: &mut Buffer, flags: Flags, payload: &[u8]) -> Result<(), BufferError> {
    let mut header = [0u8; 7];
    header[0] = Opcode::Hello.to_u8();
    header[1] = flags.to_byte();
    header[2] = VERSION;
    header[3..7].copy_from_slice(&size_of_payload(payload).to_be_bytes());
    buf.write(&header)?;
    write_payload(buf, payload)
}

/// Appends a `HELLO_ACK` frame.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_hello_ack(
    buf: &mut Buffer,
    flags: Flags,
    ping_interval: u32,
    payload: &[u8],
) -> Result<(), BufferError> {
    let mut header = [0u8; 10];
    header[0] = Opcode::HelloAck.to_u8();
    header[1] = flags.to_byte();
    header[2..6].copy_from_slice(&ping_interval.to_be_bytes());
    header[6..10].copy_from_slice(&size_of_payload(payload).to_be_bytes());
    buf.write(&header)?;
    write_payload(buf, payload)
}

/// Appends a `PING` frame. Carries no payload.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_ping(buf: &mut Buffer, flags: Flags, seq: u32) -> Result<(), BufferError> {
    append_seq_only(buf, Opcode::Ping, flags, seq)
}

/// Appends a `PONG` frame. Carries no payload.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_pong(buf: &mut Buffer, flags: Flags, seq: u32) -> Result<(), BufferError> {
    append_seq_only(buf, Opcode::Pong, flags, seq)
}

fn append_seq_only(buf: &mut Buffer, opcode: Opcode, flags: Flags, seq: u32) -> Result<(), BufferError> {
    let mut header = [0u8; 6];
    header[0] = opcode.to_u8();
    header[1] = flags.to_byte();
    header[2..6].copy_from_slice(&seq.to_be_bytes());
    buf.write(&header)
}

/// Appends a `REQUEST` frame.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_request(
    buf: &mut Buffer,
    flags: Flags,
    seq: u32,
    payload: &[u8],
) -> Result<(), BufferError> {
    append_seq_and_size(buf, Opcode::Request, flags, seq, payload)
}

/// Appends a `RESPONSE` frame.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_response(
    buf: &mut Buffer,
    flags: Flags,
    seq: u32,
    payload: &[u8],
) -> Result<(), BufferError> {
    append_seq_and_size(buf, Opcode::Response, flags, seq, payload)
}

fn append_seq_and_size(
    buf: &mut Buffer,
    opcode: Opcode,
    flags: Flags,
    seq: u32,
    payload: &[u8],
) -> Result<(), BufferError> {
    let mut header = [0u8; 10];
    header[0] = opcode.to_u8();
    header[1] = flags.to_byte();
    header[2..6].copy_from_slice(&seq.to_be_bytes());
    header[6..10].copy_from_slice(&size_of_payload(payload).to_be_bytes());
    buf.write(&header)?;
    write_payload(buf, payload)
}

/// Appends a `PUSH` frame.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_push(buf: &mut Buffer, flags: Flags, payload: &[u8]) -> Result<(), BufferError> {
    let mut header = [0u8; 6];
    header[0] = Opcode::Push.to_u8();
    header[1] = flags.to_byte();
    header[2..6].copy_from_slice(&size_of_payload(payload).to_be_bytes());
    buf.write(&header)?;
    write_payload(buf, payload)
}

/// Appends a `GOAWAY` frame.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_goaway(
    buf: &mut Buffer,
    flags: Flags,
    code: u16,
    payload: &[u8],
) -> Result<(), BufferError> {
    let mut header = [0u8; 8];
    header[0] = Opcode::Goaway.to_u8();
    header[1] = flags.to_byte();
    header[2..4].copy_from_slice(&code.to_be_bytes());
    header[4..8].copy_from_slice(&size_of_payload(payload).to_be_bytes());
    buf.write(&header)?;
    write_payload(buf, payload)
}

/// Appends an `ERROR` frame. `payload` may be empty.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying buffer.
pub fn append_error(
    buf: &mut Buffer,
    flags: Flags,
    seq: u32,
    code: u16,
    payload: &[u8],
) -> Result<(), BufferError> {
    let mut header = [0u8; 12];
    header[0] = Opcode::Error.to_u8();
    header[1] = flags.to_byte();
    header[2..6].copy_from_slice(&seq.to_be_bytes());
    header[6..8].copy_from_slice(&code.to_be_bytes());
    header[8..12].copy_from_slice(&size_of_payload(payload).to_be_bytes());
    buf.write(&header)?;
    write_payload(buf, payload)
}

/// Truncates a payload length to the wire's `u32` width.
///
/// The encoder does not enforce `DATA_SIZE_MAX`; callers are responsible for
/// supplying reasonable sizes.
#[allow(clippy::cast_possible_truncation)]
fn size_of_payload(payload: &[u8]) -> u32 {
    payload.len() as u32
}

fn write_payload(buf: &mut Buffer, payload: &[u8]) -> Result<(), BufferError> {
    if payload.is_empty() {
        return Ok(());
    }
    buf.write(payload)
}
