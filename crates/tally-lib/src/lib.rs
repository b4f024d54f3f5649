//! Cluster inventory library for kubetally
//!
//! This crate provides:
//! - Resource quantity parsing (CPU cores, memory bytes)
//! - Decoding of pod/node listings and node utilization output
//! - Aggregation into node views, pod distributions and counts
//! - A query facade over a pluggable cluster executor

pub mod aggregate;
pub mod decode;
pub mod executor;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod quantity;

pub use aggregate::{ClusterSummary, NodeServiceCounts, PivotTable};
pub use executor::{ClusterExecutor, ExecutorConfig, ExecutorError, KubectlExecutor};
pub use inventory::{ClusterSnapshot, Inventory};
pub use models::*;
pub use observability::PollLogger;
pub use quantity::{parse_quantity, parse_resource_value, QuantityError};
