//! Pod inventory command

use anyhow::Result;
use tabled::Tabled;

use crate::output::{
    color_phase, display_node, print_json, print_warning, render_table, OutputFormat,
};
use tally_lib::{ClusterExecutor, Inventory, PodRecord};

/// Row for the pod table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Microservice")]
    microservice: String,
    #[tabled(rename = "Service ID")]
    service_id: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Phase")]
    phase: String,
}

impl From<&PodRecord> for PodRow {
    fn from(pod: &PodRecord) -> Self {
        Self {
            microservice: pod.microservice.clone(),
            service_id: pod.service_id.clone(),
            pod: pod.pod_name.clone(),
            node: display_node(&pod.node),
            phase: color_phase(pod.phase),
        }
    }
}

/// Warning shown when a namespace has no pods, or none could be read
pub fn no_pods_message(namespace: &str) -> String {
    format!(
        "No pods found in namespace '{}'. Is the cluster up and are workloads deployed?",
        namespace
    )
}

pub fn render_pods(pods: &[PodRecord]) -> String {
    let rows: Vec<PodRow> = pods.iter().map(PodRow::from).collect();
    render_table(&rows)
}

/// Show the pod-level inventory of a namespace
pub async fn show_pods<E: ClusterExecutor>(
    inventory: &Inventory<E>,
    namespace: &str,
    format: OutputFormat,
) -> Result<()> {
    let pods = inventory.fetch_pod_inventory(namespace).await;

    match format {
        OutputFormat::Json => print_json(&pods),
        OutputFormat::Table => {
            if pods.is_empty() {
                print_warning(&no_pods_message(namespace));
                return Ok(());
            }
            println!("{}", render_pods(&pods));
            println!("\nTotal: {} pods", pods.len());
        }
    }

    Ok(())
}
