pub mod build;
pub mod data;
pub mod export;
pub mod merge;
pub mod translate;
