//! # Workflows Module
//!
//! End-to-end procedures built on the [`crate::engine`]: they read inputs from
//! disk, drive the engine with progress reporting, and collect per-file
//! failures instead of aborting on the first unreadable input.
//!
//! - **Table building** ([`build`]) - Ingests the feeds of a manifest into both
//!   identifier tables
//! - **Table storage** ([`tables`]) - Loads, saves and exports the finalized tables
//! - **Model merging** ([`merge`]) - Loads models, merges or translates them, and
//!   writes the merged model with its report

pub mod build;
pub mod merge;
pub mod tables;
