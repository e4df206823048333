//! Wire constants and buffer tuning constants.
//!
//! The wire constants (`VERSION`, `DATA_SIZE_MAX`) are part of the protocol
//! and observable on the wire. The buffer tuning constants are an internal
//! memory/throughput trade-off: they are observable via performance tests
//! but are not part of the wire format and carry no correctness contract.

/// Current protocol version. Carried only in the `HELLO` frame.
pub const VERSION: u8 = 1;

/// Hard upper bound on any single payload: 50 MiB.
///
/// Enforced by the decoder before any payload-sized allocation. The encoder
/// does not enforce this bound; callers are responsible for supplying
/// reasonable sizes.
pub const DATA_SIZE_MAX: u32 = 50 * 1024 * 1024;

/// Lazily allocated on first [`crate::buffer::Buffer::reset`] call.
pub(crate) const INITIAL_CAPACITY: usize = 512 * 1024;

/// [`crate::buffer::Buffer::release`] frees storage at or above this
/// capacity; below it, `release` only resets length.
pub(crate) const RELEASE_THRESHOLD: usize = 2 * 1024 * 1024;
