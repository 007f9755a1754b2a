//! Global configuration for linkroute runtime behavior.
//!
//! This module provides thread-safe global configuration that affects
//! record tokenizing without threading an option through every reader.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for keeping a final record that has no trailing newline.
///
/// By default a stream that ends in the middle of a record drops that
/// fragment: only newline-terminated records are relations. When enabled,
/// the fragment is returned as one last record instead.
///
/// This is set once at startup and read when a tokenizer is constructed.
static KEEP_UNTERMINATED: AtomicBool = AtomicBool::new(false);

/// Enable or disable keeping the final unterminated record.
///
/// # Example
///
/// ```
/// use linkroute::config;
///
/// // Enable at startup before any reader is created
/// config::set_keep_unterminated(true);
///
/// // "A,B\nC,D" now yields two relations instead of one
/// # config::set_keep_unterminated(false);
/// ```
#[inline]
pub fn set_keep_unterminated(enabled: bool) {
    KEEP_UNTERMINATED.store(enabled, Ordering::Release);
}

/// Check if the final unterminated record is kept.
#[inline]
pub fn is_keep_unterminated() -> bool {
    KEEP_UNTERMINATED.load(Ordering::Acquire)
}
