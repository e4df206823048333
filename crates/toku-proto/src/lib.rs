//! Binary frame codec for the Toku session protocol.
//!
//! This crate is the wire layer only: a growable buffer, an encoder that
//! appends complete frames to it, and a resumable decoder that reads them
//! back out of arbitrary byte chunks. It does not open sockets, schedule
//! pings, or otherwise drive a connection; callers own that orchestration.
//!
//! ```
//! use toku_proto::{buffer::Buffer, decoder::{Decoder, FeedStatus}, encoder, flags::Flags};
//!
//! let mut buf = Buffer::new();
//! encoder::append_ping(&mut buf, Flags::from_byte(0), 42).unwrap();
//!
//! let mut decoder = Decoder::new();
//! let (status, consumed) = decoder.feed(buf.as_slice());
//! assert_eq!(status, FeedStatus::Complete);
//! assert_eq!(consumed, buf.as_slice().len());
//! assert_eq!(decoder.seq(), 42);
//! ```

pub mod buffer;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod flags;
pub mod opcode;

pub use buffer::Buffer;
pub use constants::{DATA_SIZE_MAX, VERSION};
pub use decoder::{Decoder, FeedStatus, Progress};
pub use error::{BufferError, DecodeError};
pub use flags::Flags;
pub use opcode::Opcode;
