//! linkroute: connectivity checks over named location relations
//!
//! This library ingests a stream of `from,to` relations between named
//! locations and answers whether two locations are connected through any
//! chain of relations.
//!
//! # Features
//!
//! - **Streaming I/O**: Bounded-buffer record tokenizing, independent of input size
//! - **Disjoint groups**: Arena-backed partition with merge-on-relation
//! - **Typed failures**: Every malformed record or unknown location is a `RouteError`
//!
//! # Example
//!
//! ```rust,no_run
//! use linkroute::commands::{Outcome, QueryCommand};
//!
//! let (outcome, _stats) = QueryCommand::new()
//!     .run("routes.txt", "Melbourne", "Jerusalem")
//!     .unwrap();
//! assert_eq!(outcome, Outcome::RouteExists);
//! ```

pub mod commands;
pub mod config;
pub mod ingest;
pub mod partition;
pub mod relation;
pub mod relations;
pub mod streaming;

// Re-export commonly used types
pub use ingest::{ingest, IngestStats};
pub use partition::{GroupId, Partition, Registration};
pub use relation::Relation;
pub use relations::{parse_relations, read_relations, RelationReader, RouteError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{GenerateCommand, GroupsCommand, Outcome, QueryCommand};
    pub use crate::ingest::{ingest, IngestStats};
    pub use crate::partition::{GroupId, Partition, Registration};
    pub use crate::relation::Relation;
    pub use crate::relations::{parse_relations, read_relations, RelationReader, RouteError};
}
