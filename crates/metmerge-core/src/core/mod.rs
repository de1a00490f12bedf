//! # Core Module
//!
//! Stateless building blocks shared by the resolution and merge engines.
//!
//! - **Model Representation** ([`models`]) - Metabolites, reactions, genes, and annotations
//! - **Identifier Space** ([`identifiers`]) - Namespaces, property bags, and persisted lookup tables
//! - **File I/O** ([`io`]) - Model files and database feed readers

pub mod identifiers;
pub mod io;
pub mod models;
