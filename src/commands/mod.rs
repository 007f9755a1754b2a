//! Command implementations for linkroute.

pub mod generate;
pub mod groups;
pub mod query;

pub use generate::{GenerateCommand, GenerateStats};
pub use groups::GroupsCommand;
pub use query::{Outcome, QueryCommand};
