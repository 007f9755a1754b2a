//! List every connectivity group of a relation file.
//!
//! Output is one line per group, members tab-separated with the group's entry
//! point first. With `count`, each line starts with the member count.

use crate::ingest::{ingest, IngestStats};
use crate::partition::Partition;
use crate::relations::{open_input, RelationReader, Result};
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Group listing command configuration.
#[derive(Debug, Clone, Default)]
pub struct GroupsCommand {
    /// Prefix each group with its member count
    pub count: bool,
}

impl GroupsCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set member count reporting.
    pub fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// List the groups of a relation file.
    pub fn run<P: AsRef<Path>, W: Write>(&self, input_path: P, output: W) -> Result<IngestStats> {
        let file = open_input(input_path.as_ref())?;
        self.run_reader(file, output)
    }

    /// List the groups of relations read from stdin.
    pub fn run_stdin<W: Write>(&self, output: W) -> Result<IngestStats> {
        let stdin = io::stdin();
        self.run_reader(stdin.lock(), output)
    }

    /// Core listing: ingest, write, tear down.
    pub fn run_reader<R: Read, W: Write>(&self, input: R, output: W) -> Result<IngestStats> {
        let mut reader = RelationReader::new(input);
        let mut partition = Partition::new();

        let result = ingest(&mut reader, &mut partition).and_then(|stats| {
            self.write_groups(&partition, output)?;
            Ok(stats)
        });

        partition.teardown();
        result
    }

    fn write_groups<W: Write>(&self, partition: &Partition, output: W) -> Result<()> {
        let mut writer = BufWriter::with_capacity(DEFAULT_OUTPUT_BUFFER, output);
        for (_, members) in partition.groups() {
            if self.count {
                write!(writer, "{}\t", members.len())?;
            }
            writeln!(writer, "{}", members.join("\t"))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(content: &str, count: bool) -> String {
        let mut out = Vec::new();
        GroupsCommand::new()
            .with_count(count)
            .run_reader(content.as_bytes(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_groups() {
        let out = list("A,B\nB,C\nD,E\n", false);
        assert_eq!(out, "A\tB\tC\nD\tE\n");
    }

    #[test]
    fn test_list_groups_with_count() {
        let out = list("A,B\nD,E\nE,F\nC,A\n", true);
        assert_eq!(out, "3\tA\tB\tC\n3\tD\tE\tF\n");
    }

    #[test]
    fn test_merged_groups_listed_once() {
        let out = list("A,B\nC,D\nB,C\n", false);
        assert_eq!(out, "A\tB\tC\tD\n");
    }

    #[test]
    fn test_empty_input_lists_nothing() {
        assert_eq!(list("", true), "");
    }

    #[test]
    fn test_error_writes_nothing() {
        let mut out = Vec::new();
        let result = GroupsCommand::new().run_reader(&b"A,B\nbroken\n"[..], &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
