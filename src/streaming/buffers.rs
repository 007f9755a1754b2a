//! Buffer size constants for streaming operations.
//!
//! The record buffer is deliberately small: a relation line is two names of
//! at most 30 characters plus a comma, so anything near the capacity is
//! already malformed input.

/// Record buffer capacity (256 bytes).
/// A record plus its newline must fit in this window.
pub const RECORD_BUFFER_CAPACITY: usize = 256;

/// Block length for each refill read (100 bytes).
pub const READ_BLOCK_LEN: usize = 100;

/// Default output buffer size (64 KB) for group listings and generated files.
pub const DEFAULT_OUTPUT_BUFFER: usize = 64 * 1024;

/// Clamp a requested refill block length to the buffer capacity.
///
/// A zero block length would never make progress, so it is raised to one.
#[inline]
pub const fn block_len_for(capacity: usize, requested: usize) -> usize {
    if requested == 0 {
        1
    } else if requested > capacity {
        capacity
    } else {
        requested
    }
}
