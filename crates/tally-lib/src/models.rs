//! Row records produced by a single poll of the cluster

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase reported in a pod's `status.phase`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
    /// The payload carried no phase at all
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl PodPhase {
    /// Map a raw phase string onto the known phases.
    ///
    /// An empty string is `Unset`; anything unrecognised is `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "" => PodPhase::Unset,
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PodPhase::Pending => "Pending",
            PodPhase::Running => "Running",
            PodPhase::Succeeded => "Succeeded",
            PodPhase::Failed => "Failed",
            PodPhase::Unknown => "Unknown",
            PodPhase::Unset => "",
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pod from a namespace listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PodRecord {
    /// Value of the `app` label
    pub microservice: String,
    /// Value of the `svc-id` label
    pub service_id: String,
    pub pod_name: String,
    /// Node the pod is scheduled on, empty while unscheduled
    pub node: String,
    pub phase: PodPhase,
}

/// Capacity and allocatable resources reported by a node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeCapacity {
    pub node: String,
    pub cpu_capacity_cores: f64,
    pub mem_capacity_bytes: f64,
    pub cpu_allocatable_cores: f64,
    pub mem_allocatable_bytes: f64,
}

/// Live usage of a node as reported by the metrics subsystem
///
/// Raw strings are kept next to the parsed values so the presentation
/// layer can show exactly what the metrics source printed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeUtilization {
    pub node: String,
    pub cpu_used_cores_raw: String,
    pub cpu_used_cores: f64,
    pub cpu_used_pct: String,
    pub mem_used_bytes_raw: String,
    pub mem_used_bytes: f64,
    pub mem_used_pct: String,
}

/// A node's capacity joined with its utilization, if any was reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub capacity: NodeCapacity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<NodeUtilization>,
}

impl NodeView {
    pub fn node(&self) -> &str {
        &self.capacity.node
    }

    /// Memory capacity in GiB, rounded to two decimals
    pub fn mem_capacity_gib(&self) -> f64 {
        crate::quantity::to_gib(self.capacity.mem_capacity_bytes)
    }

    /// Memory in use in GiB, absent when no utilization was joined
    pub fn mem_used_gib(&self) -> Option<f64> {
        self.utilization
            .as_ref()
            .map(|u| crate::quantity::to_gib(u.mem_used_bytes))
    }
}
