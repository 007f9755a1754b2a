//! Zero-allocation relation record parsing.
//!
//! These functions split a record into its two names without any heap
//! allocation; the caller decides whether and where to copy the names.

use crate::relation::{MAX_NAME_LEN, RELATION_DELIMITER};
use memchr::memchr;
use thiserror::Error;

/// Reasons a single record cannot be split into two names.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFault {
    #[error("missing ',' delimiter")]
    MissingDelimiter,

    #[error("name is not valid UTF-8")]
    InvalidUtf8,

    #[error("name of {len} characters exceeds the {max}-character limit", max = MAX_NAME_LEN)]
    NameTooLong { len: usize },
}

/// Split a record into its two names around the first delimiter.
///
/// Only the first `,` separates; any later comma is part of the second name.
/// The first name is length-checked before the second.
///
/// # Performance
///
/// Uses memchr for the delimiter search and borrows both names from the
/// record.
#[inline]
pub fn split_relation(record: &[u8]) -> Result<(&str, &str), RecordFault> {
    let comma = memchr(RELATION_DELIMITER, record).ok_or(RecordFault::MissingDelimiter)?;
    let from = checked_name(&record[..comma])?;
    let to = checked_name(&record[comma + 1..])?;
    Ok((from, to))
}

/// Validate one name: UTF-8 and at most `MAX_NAME_LEN` characters.
#[inline]
fn checked_name(bytes: &[u8]) -> Result<&str, RecordFault> {
    let name = std::str::from_utf8(bytes).map_err(|_| RecordFault::InvalidUtf8)?;
    // Byte length bounds the character count, so ASCII names skip the walk.
    if bytes.len() > MAX_NAME_LEN {
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(RecordFault::NameTooLong { len });
        }
    }
    Ok(name)
}
