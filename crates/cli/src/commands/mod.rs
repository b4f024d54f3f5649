//! CLI command implementations

pub mod distribution;
pub mod nodes;
pub mod pods;
pub mod summary;
