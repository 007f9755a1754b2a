//! Streaming relation file reader.

use crate::relation::Relation;
use crate::streaming::parsing::{split_relation, RecordFault};
use crate::streaming::tokenizer::RecordTokenizer;
use std::collections::TryReserveError;
use std::fs::File;
use std::io::{self, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading relations or answering a query.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open input '{}': {source}", .path.display())]
    InputUnavailable { path: PathBuf, source: io::Error },

    #[error("Malformed record at line {line}: {fault}")]
    MalformedRecord { line: usize, fault: RecordFault },

    #[error("Record at line {line}: name of {len} characters is too long")]
    NameTooLong { line: usize, len: usize },

    #[error("Record at line {line} does not fit the {capacity}-byte record buffer")]
    RecordOverflow { line: usize, capacity: usize },

    #[error("Location '{name}' does not exist")]
    EntityNotFound { name: String },

    #[error("Out of memory while storing a location: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RouteError {
    /// Process exit status for this error.
    ///
    /// Success (route or no route) exits with 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            RouteError::MalformedRecord { .. } => 2,
            RouteError::NameTooLong { .. } | RouteError::RecordOverflow { .. } => 3,
            RouteError::OutOfMemory(_) => 4,
            RouteError::EntityNotFound { .. } => 5,
            RouteError::InputUnavailable { .. } | RouteError::Io(_) => 6,
            RouteError::InvalidArgument(_) => 7,
        }
    }

    /// Attach a line number to a record-level fault.
    fn from_fault(fault: RecordFault, line: usize) -> Self {
        match fault {
            RecordFault::NameTooLong { len } => RouteError::NameTooLong { line, len },
            fault => RouteError::MalformedRecord { line, fault },
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

/// A streaming relation file reader.
///
/// Every record must be `name,name` followed by a newline. Blank lines and
/// comments are not skipped: they are malformed records.
pub struct RelationReader<R: Read> {
    tokenizer: RecordTokenizer<R>,
    line_number: usize,
}

impl RelationReader<File> {
    /// Open a relation file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open_input(path.as_ref())?))
    }
}

/// Open an input file, reporting a missing or unreadable file as
/// [`RouteError::InputUnavailable`].
pub(crate) fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| RouteError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

impl<R: Read> RelationReader<R> {
    /// Create a new relation reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self::from_tokenizer(RecordTokenizer::new(reader))
    }

    /// Create a relation reader with a custom record buffer and block length.
    pub fn with_capacity(reader: R, capacity: usize, block_len: usize) -> Self {
        Self::from_tokenizer(RecordTokenizer::with_capacity(reader, capacity, block_len))
    }

    /// Wrap an already configured tokenizer.
    pub fn from_tokenizer(tokenizer: RecordTokenizer<R>) -> Self {
        Self {
            tokenizer,
            line_number: 0,
        }
    }

    /// Number of records consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Total bytes pulled from the underlying reader.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.tokenizer.bytes_read()
    }

    /// Read the next relation, or `None` at end of stream.
    pub fn read_relation(&mut self) -> Result<Option<Relation>> {
        let line = self.line_number + 1;
        let record = match self.tokenizer.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(RouteError::RecordOverflow { capacity, .. }) => {
                return Err(RouteError::RecordOverflow { line, capacity })
            }
            Err(e) => return Err(e),
        };
        self.line_number = line;

        let (from, to) =
            split_relation(record).map_err(|fault| RouteError::from_fault(fault, line))?;
        Ok(Some(Relation::new(from, to)))
    }

    /// Get an iterator over all relations.
    pub fn relations(self) -> RelationIter<R> {
        RelationIter {
            reader: self,
            failed: false,
        }
    }
}

/// Iterator over relations.
///
/// Yields at most one error; the stream ends after it.
pub struct RelationIter<R: Read> {
    reader: RelationReader<R>,
    failed: bool,
}

impl<R: Read> Iterator for RelationIter<R> {
    type Item = Result<Relation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_relation() {
            Ok(Some(relation)) => Some(Ok(relation)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for RelationIter<R> {}

/// Read all relations from a file.
pub fn read_relations<P: AsRef<Path>>(path: P) -> Result<Vec<Relation>> {
    RelationReader::from_path(path)?.relations().collect()
}

/// Parse relations from a string (useful for testing).
pub fn parse_relations(content: &str) -> Result<Vec<Relation>> {
    RelationReader::new(content.as_bytes()).relations().collect()
}
