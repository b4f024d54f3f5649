//! Aggregation over decoded rows
//!
//! Every function here is pure: same input multiset, same output. Keyed
//! outputs use `BTreeMap` so iteration is ordered by node name.

use crate::models::{NodeCapacity, NodeUtilization, NodeView, PodRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Pod counts keyed by `(node, microservice)`
pub type NodeServiceCounts = BTreeMap<(String, String), usize>;

/// Left-join node capacity with utilization on node name.
///
/// Every capacity row appears exactly once. When the metrics source
/// reported the same node twice the first row wins.
pub fn build_node_view(
    capacities: &[NodeCapacity],
    utilizations: &[NodeUtilization],
) -> Vec<NodeView> {
    if utilizations.is_empty() {
        return capacities
            .iter()
            .cloned()
            .map(|capacity| NodeView {
                capacity,
                utilization: None,
            })
            .collect();
    }

    let mut by_node: HashMap<&str, &NodeUtilization> = HashMap::with_capacity(utilizations.len());
    for utilization in utilizations {
        by_node.entry(utilization.node.as_str()).or_insert(utilization);
    }

    capacities
        .iter()
        .map(|capacity| NodeView {
            utilization: by_node.get(capacity.node.as_str()).map(|u| (*u).clone()),
            capacity: capacity.clone(),
        })
        .collect()
}

/// Count pods sharing each `(node, microservice)` pair
pub fn group_pods_by_node_and_service(pods: &[PodRecord]) -> NodeServiceCounts {
    let mut counts = NodeServiceCounts::new();
    for pod in pods {
        *counts
            .entry((pod.node.clone(), pod.microservice.clone()))
            .or_insert(0) += 1;
    }
    counts
}

/// Count pods per node
pub fn count_pods_per_node(pods: &[PodRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for pod in pods {
        *counts.entry(pod.node.clone()).or_insert(0) += 1;
    }
    counts
}

/// Pivot `(node, microservice)` counts into a node-by-microservice table.
pub fn pivot_by_node(grouping: &NodeServiceCounts) -> PivotTable {
    let columns: BTreeSet<&str> = grouping.keys().map(|(_, svc)| svc.as_str()).collect();

    let mut cells: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for ((node, microservice), count) in grouping {
        let row = cells.entry(node.clone()).or_insert_with(|| {
            columns
                .iter()
                .map(|svc| (svc.to_string(), 0))
                .collect()
        });
        row.insert(microservice.clone(), *count);
    }

    PivotTable {
        columns: columns.into_iter().map(str::to_string).collect(),
        cells,
    }
}

/// Pod counts with one row per node and one column per microservice
///
/// Rows are ordered by node name and columns by microservice name. Every
/// row holds a cell for every column; combinations without pods are 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PivotTable {
    #[serde(skip)]
    columns: Vec<String>,
    cells: BTreeMap<String, BTreeMap<String, usize>>,
}

impl PivotTable {
    /// Microservice names, ascending
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Node names, ascending
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Rows as `(node, counts)` with counts in column order
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<usize>)> + '_ {
        self.cells.iter().map(|(node, row)| {
            let counts = self
                .columns
                .iter()
                .map(|svc| row.get(svc).copied().unwrap_or(0))
                .collect();
            (node.as_str(), counts)
        })
    }

    /// Count for a cell, 0 for unknown nodes or microservices
    pub fn get(&self, node: &str, microservice: &str) -> usize {
        self.cells
            .get(node)
            .and_then(|row| row.get(microservice))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of a node's row
    pub fn row_total(&self, node: &str) -> usize {
        self.cells
            .get(node)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Headline counts for a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClusterSummary {
    /// Distinct microservice labels among the pods
    pub microservices: usize,
    pub pods: usize,
    /// Distinct node names in the node inventory
    pub nodes: usize,
}

/// Summarise a pod inventory and node view
pub fn summarize(pods: &[PodRecord], nodes: &[NodeView]) -> ClusterSummary {
    ClusterSummary {
        microservices: pods
            .iter()
            .map(|p| p.microservice.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
        pods: pods.len(),
        nodes: nodes.iter().map(NodeView::node).collect::<BTreeSet<_>>().len(),
    }
}
