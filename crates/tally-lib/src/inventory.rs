//! Read operations over a cluster executor
//!
//! Each call is one independent poll: fetch raw output, decode, aggregate.
//! Nothing is cached between calls. Executor failures and empty output
//! both come back as empty results; telling "no data" apart from "no pods"
//! is left to the caller.

use crate::aggregate::{
    build_node_view, count_pods_per_node, group_pods_by_node_and_service, pivot_by_node,
    summarize, ClusterSummary, PivotTable,
};
use crate::decode::{decode_nodes_json, decode_pods_json, TopNodesColumns, UtilizationDecoder};
use crate::executor::{ClusterExecutor, ExecutorError};
use crate::models::{NodeUtilization, NodeView, PodRecord};
use crate::observability::PollLogger;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::time::Instant;

const POD_SOURCE: &str = "pods";
const NODE_SOURCE: &str = "nodes";
const UTILIZATION_SOURCE: &str = "node_utilization";

/// Query facade turning executor output into inventory tables
pub struct Inventory<E> {
    executor: E,
    utilization_decoder: Box<dyn UtilizationDecoder>,
}

impl<E: ClusterExecutor> Inventory<E> {
    /// Create an inventory reading utilization in `kubectl top nodes` layout
    pub fn new(executor: E) -> Self {
        Self::with_decoder(executor, TopNodesColumns::default())
    }

    /// Create an inventory with a different utilization column contract
    pub fn with_decoder(executor: E, decoder: impl UtilizationDecoder + 'static) -> Self {
        Self {
            executor,
            utilization_decoder: Box::new(decoder),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Pods in a namespace, sorted by microservice then pod name
    pub async fn fetch_pod_inventory(&self, namespace: &str) -> Vec<PodRecord> {
        let logger = PollLogger::new(namespace);
        logger.log_poll_started(POD_SOURCE);

        let raw = self.executor.pod_listing(namespace).await;
        fetched(&logger, POD_SOURCE, raw)
            .map(|raw| decode_pods_json(&raw))
            .unwrap_or_default()
    }

    /// Node view plus the utilization rows it was joined with.
    ///
    /// Without a node listing both are empty and utilization is not fetched.
    pub async fn fetch_node_inventory(&self) -> (Vec<NodeView>, Vec<NodeUtilization>) {
        let logger = PollLogger::new("");
        logger.log_poll_started(NODE_SOURCE);

        let Some(raw_nodes) = fetched(&logger, NODE_SOURCE, self.executor.node_listing().await)
        else {
            return (Vec::new(), Vec::new());
        };
        let capacities = decode_nodes_json(&raw_nodes);

        let utilizations = fetched(
            &logger,
            UTILIZATION_SOURCE,
            self.executor.node_utilization().await,
        )
        .map(|raw| self.utilization_decoder.decode(&raw))
        .unwrap_or_default();

        (build_node_view(&capacities, &utilizations), utilizations)
    }

    /// Pod counts per node and microservice
    pub async fn fetch_distribution(&self, namespace: &str) -> PivotTable {
        let pods = self.fetch_pod_inventory(namespace).await;
        pivot_by_node(&group_pods_by_node_and_service(&pods))
    }

    /// Pod counts per node
    pub async fn fetch_pods_per_node(&self, namespace: &str) -> BTreeMap<String, usize> {
        let pods = self.fetch_pod_inventory(namespace).await;
        count_pods_per_node(&pods)
    }

    /// Run one full poll cycle over pods and nodes
    pub async fn snapshot(&self, namespace: &str) -> ClusterSnapshot {
        let start = Instant::now();
        let polled_at = Utc::now();

        let pods = self.fetch_pod_inventory(namespace).await;
        let (nodes, utilizations) = self.fetch_node_inventory().await;

        PollLogger::new(namespace).log_poll_completed(
            pods.len(),
            nodes.len(),
            !utilizations.is_empty(),
            start.elapsed(),
        );

        ClusterSnapshot {
            polled_at,
            namespace: namespace.to_string(),
            pods,
            nodes,
            utilizations,
        }
    }
}

/// Unwrap executor output, `None` for failures and empty output
fn fetched(
    logger: &PollLogger,
    source: &str,
    result: Result<String, ExecutorError>,
) -> Option<String> {
    match result {
        Ok(raw) if raw.trim().is_empty() => {
            logger.log_fetch_empty(source);
            None
        }
        Ok(raw) => Some(raw),
        Err(e) => {
            logger.log_fetch_failed(source, &e);
            None
        }
    }
}

/// Everything read during one poll cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSnapshot {
    pub polled_at: DateTime<Utc>,
    pub namespace: String,
    pub pods: Vec<PodRecord>,
    pub nodes: Vec<NodeView>,
    pub utilizations: Vec<NodeUtilization>,
}

impl ClusterSnapshot {
    pub fn summary(&self) -> ClusterSummary {
        summarize(&self.pods, &self.nodes)
    }

    pub fn distribution(&self) -> PivotTable {
        pivot_by_node(&group_pods_by_node_and_service(&self.pods))
    }

    pub fn pods_per_node(&self) -> BTreeMap<String, usize> {
        count_pods_per_node(&self.pods)
    }

    /// Whether the metrics source reported any node
    pub fn metrics_available(&self) -> bool {
        !self.utilizations.is_empty()
    }
}
