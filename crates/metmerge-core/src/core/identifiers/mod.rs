//! The canonical identifier space shared by all source databases.
//!
//! - [`namespace`] names the databases and parses `<namespace>:<local-id>` identifiers.
//! - [`properties`] holds the aggregated property bag of one canonical entity.
//! - [`table`] is the finalized, persisted lookup used while merging models.
//! - [`compartments`] normalizes compartment codes and suffixes.

pub mod compartments;
pub mod namespace;
pub mod properties;
pub mod table;
