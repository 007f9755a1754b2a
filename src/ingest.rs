//! Ingestion: feed every relation of a stream into a partition.

use crate::partition::{Partition, Registration};
use crate::relations::{RelationReader, Result};
use log::debug;
use std::io::Read;

/// Build up `partition` from every relation in `reader`.
///
/// Stops at end of stream or at the first error. Relations registered before
/// an error stay in the partition; the caller decides whether to use them.
pub fn ingest<R: Read>(
    reader: &mut RelationReader<R>,
    partition: &mut Partition,
) -> Result<IngestStats> {
    let mut stats = IngestStats::default();

    while let Some(relation) = reader.read_relation()? {
        stats.relations_read += 1;
        match partition.register(&relation.from, &relation.to)? {
            Registration::Created(_) => stats.groups_created += 1,
            Registration::Joined(_) => stats.locations_joined += 1,
            Registration::AlreadyConnected(_) => stats.redundant += 1,
            Registration::Merged { .. } => stats.merges += 1,
        }
    }

    stats.bytes_read = reader.bytes_read();
    stats.locations = partition.len();
    stats.groups = partition.group_count();
    debug!("Ingestion finished: {}", stats);
    Ok(stats)
}

/// Statistics from an ingestion pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    /// Number of relations read
    pub relations_read: usize,
    /// Bytes pulled from the input
    pub bytes_read: u64,
    /// Relations that started a new group
    pub groups_created: usize,
    /// Relations that added one new location to a group
    pub locations_joined: usize,
    /// Relations that joined two groups
    pub merges: usize,
    /// Relations already implied by earlier ones
    pub redundant: usize,
    /// Distinct locations after ingestion
    pub locations: usize,
    /// Groups after ingestion
    pub groups: usize,
}

impl std::fmt::Display for IngestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Relations: {}, Bytes: {}, Locations: {}, Groups: {} (created {}, merged {}), Joined: {}, Redundant: {}",
            self.relations_read,
            self.bytes_read,
            self.locations,
            self.groups,
            self.groups_created,
            self.merges,
            self.locations_joined,
            self.redundant
        )
    }
}
