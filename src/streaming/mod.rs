//! Centralized streaming utilities for linkroute.
//!
//! This module provides the components between raw bytes and relations:
//! - Bounded record tokenizing over any reader
//! - Zero-allocation record splitting
//! - Buffer size constants
//!
//! Memory stays O(buffer capacity) no matter how large the input is.

pub mod buffers;
pub mod parsing;
pub mod tokenizer;

pub use parsing::{split_relation, RecordFault};
pub use tokenizer::RecordTokenizer;
