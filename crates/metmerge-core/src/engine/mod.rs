//! # Engine Module
//!
//! The stateful logic of metmerge: building the canonical identifier space
//! from database feeds, and merging metabolic models within it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Corroboration thresholds, namespace preferences and
//!   merge options, each with a validating builder
//! - **Identifier Resolution** ([`resolution`]) - The [`resolution::ResolutionBuilder`] that
//!   unions raw identifiers into canonical ids, arbitrating conflicts with
//!   [`corroboration`] and a per-kind namespace preference
//! - **Canonicalization** ([`canonicalize`]) - Maps model-local identifiers onto finalized tables
//! - **Model Merging** ([`merge`]) - Metabolite and reaction deduplication, objective
//!   reconciliation, provenance and Jaccard similarity
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-wide error type
//!
//! The engine never touches process-wide state: finalized identifier tables are
//! passed into a [`canonicalize::Canonicalizer`] by reference.

pub mod canonicalize;
pub mod config;
pub mod corroboration;
pub mod error;
pub mod merge;
pub mod progress;
pub mod resolution;
