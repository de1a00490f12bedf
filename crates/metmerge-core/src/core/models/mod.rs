//! Data structures describing genome-scale metabolic models.
//!
//! A [`model::MetabolicModel`] owns its metabolites, reactions, and genes in
//! slot maps keyed by the typed identifiers in [`ids`]. Cross-reference
//! metadata is carried as [`annotation::Annotations`].

pub mod annotation;
pub mod gene;
pub mod ids;
pub mod metabolite;
pub mod model;
pub mod reaction;
