//! Node overview command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{
    format_cores, format_gib, print_info, print_json, print_warning, render_table, OutputFormat,
};
use tally_lib::{ClusterExecutor, Inventory, NodeUtilization, NodeView};

const MISSING: &str = "-";

/// Row for the node overview table
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "CPU Cap")]
    cpu_capacity: String,
    #[tabled(rename = "CPU Alloc")]
    cpu_allocatable: String,
    #[tabled(rename = "Mem Cap (GiB)")]
    mem_capacity: String,
    #[tabled(rename = "Mem Alloc (GiB)")]
    mem_allocatable: String,
    #[tabled(rename = "CPU Used")]
    cpu_used: String,
    #[tabled(rename = "CPU %")]
    cpu_pct: String,
    #[tabled(rename = "Mem Used (GiB)")]
    mem_used: String,
    #[tabled(rename = "Mem %")]
    mem_pct: String,
}

impl From<&NodeView> for NodeRow {
    fn from(view: &NodeView) -> Self {
        let usage = view.utilization.as_ref();
        let or_missing = |f: fn(&NodeUtilization) -> String| {
            usage.map(f).unwrap_or_else(|| MISSING.to_string())
        };

        Self {
            node: view.capacity.node.clone(),
            cpu_capacity: format_cores(view.capacity.cpu_capacity_cores),
            cpu_allocatable: format_cores(view.capacity.cpu_allocatable_cores),
            mem_capacity: format_gib(view.capacity.mem_capacity_bytes),
            mem_allocatable: format_gib(view.capacity.mem_allocatable_bytes),
            cpu_used: or_missing(|u| u.cpu_used_cores_raw.clone()),
            cpu_pct: or_missing(|u| u.cpu_used_pct.clone()),
            mem_used: or_missing(|u| format_gib(u.mem_used_bytes)),
            mem_pct: or_missing(|u| u.mem_used_pct.clone()),
        }
    }
}

/// JSON shape of the node overview
#[derive(Serialize)]
struct NodeOverview<'a> {
    nodes: Vec<NodeOverviewEntry<'a>>,
    utilizations: &'a [NodeUtilization],
}

#[derive(Serialize)]
struct NodeOverviewEntry<'a> {
    #[serde(flatten)]
    view: &'a NodeView,
    mem_capacity_gib: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mem_used_gib: Option<f64>,
}

pub fn render_nodes(nodes: &[NodeView]) -> String {
    let rows: Vec<NodeRow> = nodes.iter().map(NodeRow::from).collect();
    render_table(&rows)
}

/// Show node capacity joined with live utilization
pub async fn show_nodes<E: ClusterExecutor>(
    inventory: &Inventory<E>,
    format: OutputFormat,
) -> Result<()> {
    let (nodes, utilizations) = inventory.fetch_node_inventory().await;

    match format {
        OutputFormat::Json => {
            let overview = NodeOverview {
                nodes: nodes
                    .iter()
                    .map(|view| NodeOverviewEntry {
                        view,
                        mem_capacity_gib: view.mem_capacity_gib(),
                        mem_used_gib: view.mem_used_gib(),
                    })
                    .collect(),
                utilizations: &utilizations,
            };
            print_json(&overview);
        }
        OutputFormat::Table => {
            if nodes.is_empty() {
                print_warning("Could not load node info. Check kubectl access.");
                return Ok(());
            }
            println!("{}", render_nodes(&nodes));
            if utilizations.is_empty() {
                print_info("Node metrics unavailable. Is metrics-server installed?");
            }
        }
    }

    Ok(())
}
