//! Pod and node listing decoding

use crate::models::{NodeCapacity, PodPhase, PodRecord};
use crate::quantity::parse_quantity;
use serde_json::Value;
use tracing::{debug, warn};

const POD_APP_LABEL: &str = "/metadata/labels/app";
const POD_SERVICE_ID_LABEL: &str = "/metadata/labels/svc-id";
const METADATA_NAME: &str = "/metadata/name";
const POD_NODE_NAME: &str = "/spec/nodeName";
const POD_PHASE: &str = "/status/phase";

const NODE_CPU_CAPACITY: &str = "/status/capacity/cpu";
const NODE_MEMORY_CAPACITY: &str = "/status/capacity/memory";
const NODE_CPU_ALLOCATABLE: &str = "/status/allocatable/cpu";
const NODE_MEMORY_ALLOCATABLE: &str = "/status/allocatable/memory";

/// Decode a pod listing, sorted by microservice then pod name.
///
/// The sort is stable, so pods sharing both keys keep listing order.
pub fn decode_pods(payload: &Value) -> Vec<PodRecord> {
    let mut pods: Vec<PodRecord> = items(payload)
        .iter()
        .map(|item| PodRecord {
            microservice: text_at(item, POD_APP_LABEL),
            service_id: text_at(item, POD_SERVICE_ID_LABEL),
            pod_name: text_at(item, METADATA_NAME),
            node: text_at(item, POD_NODE_NAME),
            phase: PodPhase::from_raw(&text_at(item, POD_PHASE)),
        })
        .collect();

    pods.sort_by(|a, b| {
        a.microservice
            .cmp(&b.microservice)
            .then_with(|| a.pod_name.cmp(&b.pod_name))
    });

    debug!(pods = pods.len(), "Decoded pod listing");
    pods
}

/// Decode a pod listing from raw JSON text
pub fn decode_pods_json(raw: &str) -> Vec<PodRecord> {
    parse_payload(raw, "pod")
        .map(|payload| decode_pods(&payload))
        .unwrap_or_default()
}

/// Decode a node listing into capacity rows, in listing order.
pub fn decode_nodes(payload: &Value) -> Vec<NodeCapacity> {
    let nodes: Vec<NodeCapacity> = items(payload)
        .iter()
        .map(|item| {
            let node = text_at(item, METADATA_NAME);
            NodeCapacity {
                cpu_capacity_cores: resource_at(item, &node, NODE_CPU_CAPACITY),
                mem_capacity_bytes: resource_at(item, &node, NODE_MEMORY_CAPACITY),
                cpu_allocatable_cores: resource_at(item, &node, NODE_CPU_ALLOCATABLE),
                mem_allocatable_bytes: resource_at(item, &node, NODE_MEMORY_ALLOCATABLE),
                node,
            }
        })
        .collect();

    debug!(nodes = nodes.len(), "Decoded node listing");
    nodes
}

/// Decode a node listing from raw JSON text
pub fn decode_nodes_json(raw: &str) -> Vec<NodeCapacity> {
    parse_payload(raw, "node")
        .map(|payload| decode_nodes(&payload))
        .unwrap_or_default()
}

fn parse_payload(raw: &str, kind: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(payload = kind, error = %e, "Discarding malformed listing payload");
            None
        }
    }
}

fn items(payload: &Value) -> &[Value] {
    payload
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Read a string (or number, rendered as text) at a JSON pointer
fn text_at(item: &Value, pointer: &str) -> String {
    match item.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Read a resource quantity, logging values that had to be coerced to zero
fn resource_at(item: &Value, node: &str, pointer: &str) -> f64 {
    let raw = text_at(item, pointer);
    if raw.is_empty() {
        return 0.0;
    }

    match parse_quantity(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                event = "value_coerced",
                node = %node,
                field = %pointer,
                error = %e,
                "Unparseable resource quantity treated as zero"
            );
            0.0
        }
    }
}
