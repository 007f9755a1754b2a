//! Generate synthetic relation files for testing and benchmarking.
//!
//! Locations are named `Loc-000000`, `Loc-000001`, ... and split round-robin
//! into a number of clusters. Every generated relation joins two locations
//! of the same cluster, so locations in different clusters never have a
//! route. Output is deterministic for a given seed.

use crate::relations::{Result, RouteError};
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io::{BufWriter, Write};
use std::time::Instant;

/// Parse a count with an optional K/M suffix (e.g. "500", "10K", "2M").
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();
    if s.is_empty() {
        return None;
    }

    let (num_part, multiplier) = if let Some(n) = s.strip_suffix('K') {
        (n, 1_000u64)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1_000_000u64)
    } else {
        (s.as_str(), 1u64)
    };

    num_part
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
}

/// Name of the `index`-th synthetic location.
#[inline]
pub fn location_name(index: u64) -> String {
    format!("Loc-{:06}", index)
}

/// Generate command configuration.
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// Number of relations to write
    pub relations: u64,
    /// Number of distinct locations to draw from
    pub locations: u64,
    /// Number of disjoint clusters
    pub clusters: u64,
    /// RNG seed
    pub seed: u64,
}

impl Default for GenerateCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerateCommand {
    pub fn new() -> Self {
        Self {
            relations: 1_000,
            locations: 200,
            clusters: 1,
            seed: 42,
        }
    }

    pub fn with_relations(mut self, n: u64) -> Self {
        self.relations = n;
        self
    }

    pub fn with_locations(mut self, n: u64) -> Self {
        self.locations = n;
        self
    }

    pub fn with_clusters(mut self, n: u64) -> Self {
        self.clusters = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.clusters == 0 {
            return Err(RouteError::InvalidArgument(
                "cluster count must be at least 1".to_string(),
            ));
        }
        if self.locations < self.clusters {
            return Err(RouteError::InvalidArgument(format!(
                "{} locations cannot fill {} clusters",
                self.locations, self.clusters
            )));
        }
        Ok(())
    }

    /// Cluster a location belongs to.
    #[inline]
    pub fn cluster_of(&self, location: u64) -> u64 {
        location % self.clusters
    }

    /// Number of locations in a cluster.
    #[inline]
    fn cluster_size(&self, cluster: u64) -> u64 {
        (self.locations - 1 - cluster) / self.clusters + 1
    }

    /// Write the relations to `output`.
    pub fn run<W: Write>(&self, output: W) -> Result<GenerateStats> {
        self.validate()?;
        let start = Instant::now();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut writer = BufWriter::with_capacity(DEFAULT_OUTPUT_BUFFER, output);
        let mut stats = GenerateStats::default();

        for _ in 0..self.relations {
            let a = rng.gen_range(0..self.locations);
            let cluster = self.cluster_of(a);
            let b = cluster + self.clusters * rng.gen_range(0..self.cluster_size(cluster));
            writeln!(writer, "{},{}", location_name(a), location_name(b))?;
            stats.relations += 1;
        }

        writer.flush()?;
        stats.elapsed_secs = start.elapsed().as_secs_f64();
        info!("Generated {}", stats);
        Ok(stats)
    }
}

/// Statistics from generate operation.
#[derive(Debug, Default, Clone)]
pub struct GenerateStats {
    pub relations: u64,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for GenerateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} relations ({:.1}s)",
            self.relations, self.elapsed_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::parse_relations;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("100"), Some(100));
        assert_eq!(parse_count("10k"), Some(10_000));
        assert_eq!(parse_count("2M"), Some(2_000_000));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("abc"), None);
    }

    #[test]
    fn test_location_name_fits_limit() {
        assert_eq!(location_name(7), "Loc-000007");
        assert!(location_name(u64::MAX).len() <= crate::relation::MAX_NAME_LEN);
    }

    #[test]
    fn test_generated_output_parses() {
        let mut out = Vec::new();
        let stats = GenerateCommand::new()
            .with_relations(50)
            .with_locations(10)
            .run(&mut out)
            .unwrap();

        assert_eq!(stats.relations, 50);
        let text = String::from_utf8(out).unwrap();
        let relations = parse_relations(&text).unwrap();
        assert_eq!(relations.len(), 50);
    }

    #[test]
    fn test_same_seed_same_output() {
        let cmd = GenerateCommand::new().with_relations(30).with_seed(7);
        let mut a = Vec::new();
        let mut b = Vec::new();
        cmd.run(&mut a).unwrap();
        cmd.run(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_relations_stay_within_cluster() {
        let cmd = GenerateCommand::new()
            .with_relations(200)
            .with_locations(25)
            .with_clusters(4);
        let mut out = Vec::new();
        cmd.run(&mut out).unwrap();

        for rel in parse_relations(&String::from_utf8(out).unwrap()).unwrap() {
            let a: u64 = rel.from["Loc-".len()..].parse().unwrap();
            let b: u64 = rel.to["Loc-".len()..].parse().unwrap();
            assert!(a < 25 && b < 25);
            assert_eq!(cmd.cluster_of(a), cmd.cluster_of(b), "{}", rel);
        }
    }

    #[test]
    fn test_invalid_clusters() {
        let mut out = Vec::new();
        let err = GenerateCommand::new().with_clusters(0).run(&mut out).unwrap_err();
        assert!(matches!(err, RouteError::InvalidArgument(_)));

        let err = GenerateCommand::new()
            .with_locations(2)
            .with_clusters(3)
            .run(&mut out)
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }
}
