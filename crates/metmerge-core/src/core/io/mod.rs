//! Reading and writing of model files and identifier feeds.
//!
//! Model files go through the [`traits::ModelFile`] trait, implemented for the
//! COBRA JSON layout by [`cobra_json::CobraJsonFile`]. Database dumps are
//! turned into identifier records by [`feeds::read_feed`].

pub mod cobra_json;
pub mod feeds;
pub mod traits;
