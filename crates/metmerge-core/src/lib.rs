//! # metmerge Core Library
//!
//! Resolves the identifiers used by biochemical databases into one canonical
//! identifier space, and merges genome-scale metabolic models within it so that
//! metabolites and reactions shared by several models appear once.
//!
//! ## Architecture
//!
//! The library keeps a strict three-layer split:
//!
//! - **[`core`]: Data and formats.** Stateless models (`MetabolicModel`,
//!   `PropertyBag`, `IdentifierTable`), namespace and compartment vocabularies,
//!   the COBRA JSON model format and the database feed readers.
//!
//! - **[`engine`]: The logic.** Identifier resolution with corroboration,
//!   canonicalization of model-local ids, and the merge engine with objective
//!   reconciliation and Jaccard similarity.
//!
//! - **[`workflows`]: The public entry points.** Build identifier tables from a
//!   feed manifest, load and merge model files, translate a model into one
//!   namespace, and write the results.

pub mod core;
pub mod engine;
pub mod workflows;
