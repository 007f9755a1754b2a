//! Core relation type: one direct connection between two named locations.

use std::fmt;

/// Maximum entity name length, in characters.
pub const MAX_NAME_LEN: usize = 30;

/// Byte separating the two names of a record.
pub const RELATION_DELIMITER: u8 = b',';

/// Byte terminating a record.
pub const RECORD_DELIMITER: u8 = b'\n';

/// A direct connection between two locations.
///
/// Names are case-sensitive opaque keys; `Tel-Aviv` and `tel-aviv` are
/// different locations. The relation is symmetric in meaning, but the order
/// is preserved because it decides which group survives a merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub from: String,
    pub to: String,
}

impl Relation {
    /// Create a new relation.
    #[inline]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.from, self.to)
    }
}
