//! Cluster summary command

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::commands::pods::no_pods_message;
use crate::output::{
    print_heading, print_info, print_json, print_warning, render_bars, render_pivot, OutputFormat,
};
use tally_lib::{ClusterExecutor, ClusterSnapshot, ClusterSummary, Inventory, PivotTable};

/// JSON shape of the summary
#[derive(Serialize)]
struct SummaryReport {
    polled_at: DateTime<Utc>,
    namespace: String,
    summary: ClusterSummary,
    metrics_available: bool,
    pods_per_node: BTreeMap<String, usize>,
    distribution: PivotTable,
}

impl From<&ClusterSnapshot> for SummaryReport {
    fn from(snapshot: &ClusterSnapshot) -> Self {
        Self {
            polled_at: snapshot.polled_at,
            namespace: snapshot.namespace.clone(),
            summary: snapshot.summary(),
            metrics_available: snapshot.metrics_available(),
            pods_per_node: snapshot.pods_per_node(),
            distribution: snapshot.distribution(),
        }
    }
}

/// Show headline counts, the distribution and pods per node
pub async fn show_summary<E: ClusterExecutor>(
    inventory: &Inventory<E>,
    namespace: &str,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = inventory.snapshot(namespace).await;
    let report = SummaryReport::from(&snapshot);

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            if snapshot.pods.is_empty() {
                print_warning(&no_pods_message(namespace));
                return Ok(());
            }

            print_heading("Cluster Summary");
            println!("Namespace:              {}", report.namespace.cyan());
            println!("Microservices:          {}", report.summary.microservices);
            println!("Pods:                   {}", report.summary.pods);
            println!("Nodes:                  {}", report.summary.nodes);
            println!();

            println!("{}", "Microservices by Node".bold());
            println!("{}", "-".repeat(50));
            println!("{}", render_pivot(&report.distribution));
            println!();

            println!("{}", "Pods per Node".bold());
            println!("{}", "-".repeat(50));
            println!(
                "{}",
                render_bars(report.pods_per_node.iter().map(|(n, c)| (n.as_str(), *c)))
            );
            println!();

            if snapshot.nodes.is_empty() {
                print_warning("Could not load node info. Check kubectl access.");
            } else if !report.metrics_available {
                print_info("Node metrics unavailable. Is metrics-server installed?");
            }
            println!(
                "Last refresh: {}",
                format_timestamp(&report.polled_at).dimmed()
            );
        }
    }

    Ok(())
}

/// Format timestamp for display in local time
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_lib::PodRecord;

    #[test]
    fn test_report_from_snapshot() {
        let pod = |svc: &str, node: &str| PodRecord {
            microservice: svc.to_string(),
            node: node.to_string(),
            ..Default::default()
        };
        let snapshot = ClusterSnapshot {
            polled_at: Utc::now(),
            namespace: "default".to_string(),
            pods: vec![pod("svcA", "n1"), pod("svcA", "n1"), pod("svcB", "n2")],
            nodes: Vec::new(),
            utilizations: Vec::new(),
        };

        let report = SummaryReport::from(&snapshot);

        assert_eq!(report.summary.pods, 3);
        assert_eq!(report.summary.microservices, 2);
        assert_eq!(report.summary.nodes, 0);
        assert!(!report.metrics_available);
        assert_eq!(report.pods_per_node["n1"], 2);
        assert_eq!(report.distribution.get("n2", "svcB"), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["distribution"]["n1"]["svcB"], 0);
        assert_eq!(json["summary"]["microservices"], 2);
    }
}
