//! Route query: is there a chain of relations between two locations?
//!
//! # Algorithm
//!
//! 1. Ingest every relation of the input into a fresh partition
//! 2. Ask the partition whether both locations share a group
//! 3. Tear the partition down, whatever the outcome
//!
//! A failure while ingesting fails the whole query; no answer is derived
//! from the relations read before the bad record.

use crate::ingest::{ingest, IngestStats};
use crate::partition::Partition;
use crate::relations::{open_input, RelationReader, Result};
use crate::streaming::buffers::{READ_BLOCK_LEN, RECORD_BUFFER_CAPACITY};
use log::debug;
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// Answer to a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    RouteExists,
    NoRoute,
}

impl Outcome {
    #[inline]
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            Outcome::RouteExists
        } else {
            Outcome::NoRoute
        }
    }

    #[inline]
    pub fn is_route(self) -> bool {
        self == Outcome::RouteExists
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::RouteExists => write!(f, "ROUTE"),
            Outcome::NoRoute => write!(f, "NO ROUTE"),
        }
    }
}

/// Route query command configuration.
#[derive(Debug, Clone)]
pub struct QueryCommand {
    /// Record buffer capacity in bytes
    pub buffer_capacity: usize,
    /// Refill block length in bytes
    pub block_len: usize,
}

impl Default for QueryCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCommand {
    pub fn new() -> Self {
        Self {
            buffer_capacity: RECORD_BUFFER_CAPACITY,
            block_len: READ_BLOCK_LEN,
        }
    }

    /// Set the record buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the refill block length.
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        self.block_len = block_len;
        self
    }

    /// Answer a query against a relation file.
    pub fn run<P: AsRef<Path>>(
        &self,
        input_path: P,
        from: &str,
        to: &str,
    ) -> Result<(Outcome, IngestStats)> {
        let file = open_input(input_path.as_ref())?;
        self.run_reader(file, from, to)
    }

    /// Answer a query against relations read from stdin.
    pub fn run_stdin(&self, from: &str, to: &str) -> Result<(Outcome, IngestStats)> {
        let stdin = io::stdin();
        self.run_reader(stdin.lock(), from, to)
    }

    /// Core query: ingest, ask, tear down.
    pub fn run_reader<R: Read>(
        &self,
        input: R,
        from: &str,
        to: &str,
    ) -> Result<(Outcome, IngestStats)> {
        let mut reader =
            RelationReader::with_capacity(input, self.buffer_capacity, self.block_len);
        let mut partition = Partition::new();

        let result = ingest(&mut reader, &mut partition).and_then(|stats| {
            let outcome = Outcome::from_connected(partition.same_group(from, to)?);
            Ok((outcome, stats))
        });

        let released = partition.teardown();
        debug!("Query {} -> {}: released {} locations", from, to, released);
        result
    }
}
