//! Fuzz target for decoder boundary conditions.
//!
//! Builds headers with deliberately hostile field combinations — payload
//! sizes at, just over, and far over `DATA_SIZE_MAX`, every opcode byte
//! including unassigned ones — and confirms the decoder only ever reaches
//! `NeedsMore`, `Complete`, `InvalidOpcode`, or `InvalidSize`, never a panic
//! or an out-of-bounds read.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use toku_proto::{
    constants::DATA_SIZE_MAX,
    decoder::{Decoder, FeedStatus},
    opcode::Opcode,
};

#[derive(Debug, Arbitrary)]
struct BoundaryFrame {
    opcode_byte: u8,
    flags: u8,
    seq: u32,
    code: u16,
    payload_size: PayloadSize,
    trailing: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum PayloadSize {
    Zero,
    Small(u8),
    AtMax,
    JustOverMax,
    WayOverMax,
    MaxU32,
}

fn resolve(size: &PayloadSize) -> u32 {
    match *size {
        PayloadSize::Zero => 0,
        PayloadSize::Small(s) => u32::from(s),
        PayloadSize::AtMax => DATA_SIZE_MAX,
        PayloadSize::JustOverMax => DATA_SIZE_MAX.saturating_add(1),
        PayloadSize::WayOverMax => DATA_SIZE_MAX.saturating_add(1_000_000),
        PayloadSize::MaxU32 => u32::MAX,
    }
}

fuzz_target!(|frame: BoundaryFrame| {
    let Some(opcode) = Opcode::from_u8(frame.opcode_byte) else {
        let mut decoder = Decoder::new();
        let (status, consumed) = decoder.feed(&[frame.opcode_byte]);
        assert_eq!(status, FeedStatus::InvalidOpcode(frame.opcode_byte));
        assert_eq!(consumed, 1);
        return;
    };

    let declared = resolve(&frame.payload_size);
    let mut bytes = vec![opcode.to_u8(), frame.flags];
    match opcode {
        Opcode::Hello => {
            bytes.push(1);
            bytes.extend_from_slice(&declared.to_be_bytes());
        },
        Opcode::HelloAck => {
            bytes.extend_from_slice(&frame.seq.to_be_bytes());
            bytes.extend_from_slice(&declared.to_be_bytes());
        },
        Opcode::Ping | Opcode::Pong => {
            bytes.extend_from_slice(&frame.seq.to_be_bytes());
        },
        Opcode::Request | Opcode::Response => {
            bytes.extend_from_slice(&frame.seq.to_be_bytes());
            bytes.extend_from_slice(&declared.to_be_bytes());
        },
        Opcode::Push => {
            bytes.extend_from_slice(&declared.to_be_bytes());
        },
        Opcode::Goaway => {
            bytes.extend_from_slice(&frame.code.to_be_bytes());
            bytes.extend_from_slice(&declared.to_be_bytes());
        },
        Opcode::Error => {
            bytes.extend_from_slice(&frame.seq.to_be_bytes());
            bytes.extend_from_slice(&frame.code.to_be_bytes());
            bytes.extend_from_slice(&declared.to_be_bytes());
        },
    }
    bytes.extend_from_slice(&frame.trailing[..frame.trailing.len().min(64)]);

    let mut decoder = Decoder::new();
    let (status, _consumed) = decoder.feed(&bytes);

    match status {
        FeedStatus::InvalidSize { declared: got, max } => {
            assert_eq!(got, declared);
            assert_eq!(max, DATA_SIZE_MAX);
            assert!(declared > DATA_SIZE_MAX);
        },
        FeedStatus::Complete => {
            assert!(declared <= DATA_SIZE_MAX);
            assert_eq!(decoder.current_opcode(), Some(opcode));
        },
        FeedStatus::NeedsMore => {
            assert!(declared <= DATA_SIZE_MAX);
        },
        FeedStatus::Memory | FeedStatus::InvalidOpcode(_) => {},
    }
});
