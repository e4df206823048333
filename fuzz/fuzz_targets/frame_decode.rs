//! Fuzz target for `Decoder::feed`.
//!
//! Feeds arbitrary byte sequences, one arbitrary-sized chunk at a time, to
//! look for:
//! - panics or integer overflow in header/payload size accounting
//! - allocation attempts beyond `DATA_SIZE_MAX`
//! - desynchronization after `InvalidOpcode`/`InvalidSize`
//!
//! The fuzzer should NEVER panic. All invalid input must surface as a
//! `FeedStatus` variant, never a crash.

#![no_main]

use libfuzzer_sys::fuzz_target;
use toku_proto::decoder::{Decoder, FeedStatus};

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new();
    let mut offset = 0;
    while offset < data.len() {
        let (status, consumed) = decoder.feed(&data[offset..]);
        offset += consumed;
        match status {
            FeedStatus::Complete => {
                let _ = decoder.payload();
                decoder.reset();
            },
            FeedStatus::InvalidOpcode(_) | FeedStatus::InvalidSize { .. } | FeedStatus::Memory => {
                break;
            },
            FeedStatus::NeedsMore => {
                if consumed == 0 {
                    break;
                }
            },
        }
    }
});
