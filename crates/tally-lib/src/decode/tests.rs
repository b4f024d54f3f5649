//! Decoder tests against captured listing and top output

use super::*;
use crate::models::PodPhase;
use serde_json::json;

fn pod(app: &str, name: &str, node: &str, phase: &str) -> serde_json::Value {
    json!({
        "metadata": {
            "name": name,
            "labels": { "app": app, "svc-id": format!("{}-id", app) }
        },
        "spec": { "nodeName": node },
        "status": { "phase": phase }
    })
}

mod pod_listing_tests {
    use super::*;

    #[test]
    fn test_decode_pods_maps_fields() {
        let payload = json!({ "items": [pod("svcA", "svcA-1", "n1", "Running")] });

        let pods = decode_pods(&payload);

        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].microservice, "svcA");
        assert_eq!(pods[0].service_id, "svcA-id");
        assert_eq!(pods[0].pod_name, "svcA-1");
        assert_eq!(pods[0].node, "n1");
        assert_eq!(pods[0].phase, PodPhase::Running);
    }

    #[test]
    fn test_decode_pods_sorts_by_microservice_then_name() {
        let payload = json!({
            "items": [
                pod("svcB", "b-1", "n2", "Running"),
                pod("svcA", "a-2", "n1", "Running"),
                pod("svcA", "a-1", "n1", "Pending"),
            ]
        });

        let names: Vec<String> = decode_pods(&payload)
            .into_iter()
            .map(|p| p.pod_name)
            .collect();

        assert_eq!(names, vec!["a-1", "a-2", "b-1"]);
    }

    #[test]
    fn test_decode_pods_ties_keep_listing_order() {
        // Same microservice and name, told apart by node
        let payload = json!({
            "items": [
                pod("svcA", "dup", "second", "Running"),
                pod("svcA", "dup", "first", "Running"),
            ]
        });

        let nodes: Vec<String> = decode_pods(&payload).into_iter().map(|p| p.node).collect();

        assert_eq!(nodes, vec!["second", "first"]);
    }

    #[test]
    fn test_decode_pods_missing_fields_default_to_empty() {
        let payload = json!({ "items": [ { "metadata": { "name": "bare" } }, {} ] });

        let pods = decode_pods(&payload);

        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0].pod_name, "");
        assert_eq!(pods[1].pod_name, "bare");
        assert!(pods.iter().all(|p| p.microservice.is_empty()));
        assert!(pods.iter().all(|p| p.node.is_empty()));
        assert!(pods.iter().all(|p| p.phase == PodPhase::Unset));
    }

    #[test]
    fn test_decode_pods_wrong_typed_labels_are_ignored() {
        let payload = json!({
            "items": [ { "metadata": { "name": "p", "labels": ["app"] } } ]
        });

        let pods = decode_pods(&payload);

        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].pod_name, "p");
        assert_eq!(pods[0].microservice, "");
    }

    #[test]
    fn test_decode_pods_empty_and_malformed_payloads() {
        assert!(decode_pods(&json!({})).is_empty());
        assert!(decode_pods(&json!({ "items": [] })).is_empty());
        assert!(decode_pods(&json!({ "items": "nope" })).is_empty());
        assert!(decode_pods_json("").is_empty());
        assert!(decode_pods_json("   \n").is_empty());
        assert!(decode_pods_json("{ not json").is_empty());
    }

    #[test]
    fn test_decode_pods_json_text() {
        let raw = json!({ "items": [pod("svcA", "a-1", "n1", "Succeeded")] }).to_string();

        let pods = decode_pods_json(&raw);

        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].phase, PodPhase::Succeeded);
    }
}

mod node_listing_tests {
    use super::*;

    fn node(
        name: &str,
        cpu: &str,
        memory: &str,
        alloc_cpu: &str,
        alloc_memory: &str,
    ) -> serde_json::Value {
        json!({
            "metadata": { "name": name },
            "status": {
                "capacity": { "cpu": cpu, "memory": memory },
                "allocatable": { "cpu": alloc_cpu, "memory": alloc_memory }
            }
        })
    }

    #[test]
    fn test_decode_nodes_parses_resources() {
        let payload = json!({
            "items": [node("n1", "4", "8Gi", "3800m", "7Gi")]
        });

        let nodes = decode_nodes(&payload);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node, "n1");
        assert_eq!(nodes[0].cpu_capacity_cores, 4.0);
        assert_eq!(nodes[0].mem_capacity_bytes, 8_589_934_592.0);
        assert_eq!(nodes[0].cpu_allocatable_cores, 3.8);
        assert_eq!(nodes[0].mem_allocatable_bytes, 7_516_192_768.0);
    }

    #[test]
    fn test_decode_nodes_keeps_listing_order() {
        let payload = json!({
            "items": [
                node("zeta", "1", "1Gi", "1", "1Gi"),
                node("alpha", "1", "1Gi", "1", "1Gi"),
            ]
        });

        let names: Vec<String> = decode_nodes(&payload).into_iter().map(|n| n.node).collect();

        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_decode_nodes_missing_status_is_zero() {
        let payload = json!({ "items": [ { "metadata": { "name": "bare" } } ] });

        let nodes = decode_nodes(&payload);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].cpu_capacity_cores, 0.0);
        assert_eq!(nodes[0].mem_capacity_bytes, 0.0);
        assert_eq!(nodes[0].cpu_allocatable_cores, 0.0);
        assert_eq!(nodes[0].mem_allocatable_bytes, 0.0);
    }

    #[test]
    fn test_decode_nodes_garbage_quantity_is_zero() {
        let payload = json!({ "items": [node("n1", "lots", "8Pi", "2", "1Gi")] });

        let nodes = decode_nodes(&payload);

        assert_eq!(nodes[0].cpu_capacity_cores, 0.0);
        assert_eq!(nodes[0].mem_capacity_bytes, 0.0);
        assert_eq!(nodes[0].cpu_allocatable_cores, 2.0);
    }

    #[test]
    fn test_decode_nodes_numeric_quantities() {
        let payload = json!({
            "items": [ {
                "metadata": { "name": "n1" },
                "status": { "capacity": { "cpu": 2, "memory": "1024Ki" } }
            } ]
        });

        let nodes = decode_nodes(&payload);

        assert_eq!(nodes[0].cpu_capacity_cores, 2.0);
        assert_eq!(nodes[0].mem_capacity_bytes, 1_048_576.0);
    }

    #[test]
    fn test_decode_nodes_empty_payloads() {
        assert!(decode_nodes(&json!({})).is_empty());
        assert!(decode_nodes_json("").is_empty());
        assert!(decode_nodes_json("[]").is_empty());
        assert!(decode_nodes_json("garbage").is_empty());
    }
}

mod utilization_tests {
    use super::*;

    const TOP_OUTPUT: &str = "\
k3d-myk3s-server-0   182m   4%    1024Mi   12%
k3d-myk3s-agent-0    45m    1%    512Mi    6%
";

    #[test]
    fn test_decode_top_output() {
        let rows = decode_utilization_text(TOP_OUTPUT);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].node, "k3d-myk3s-server-0");
        assert_eq!(rows[0].cpu_used_cores_raw, "182m");
        assert_eq!(rows[0].cpu_used_cores, 0.182);
        assert_eq!(rows[0].cpu_used_pct, "4%");
        assert_eq!(rows[0].mem_used_bytes_raw, "1024Mi");
        assert_eq!(rows[0].mem_used_bytes, 1_073_741_824.0);
        assert_eq!(rows[0].mem_used_pct, "12%");
        assert_eq!(rows[1].mem_used_bytes, 536_870_912.0);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let lines = vec![
            "",
            "error: metrics unavailable",
            "n1 100m 2% 256Mi",
            "n2 100m 2% 256Mi 3%",
        ];

        let rows = decode_utilization_lines(lines);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node, "n2");
    }

    #[test]
    fn test_five_token_line_is_a_row() {
        let rows = decode_utilization_lines(["error: Metrics API not available"]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node, "error:");
        assert_eq!(rows[0].cpu_used_cores, 0.0);
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        let rows = decode_utilization_lines(["n1 1 50% 2Gi 25% trailing column"]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cpu_used_cores, 1.0);
        assert_eq!(rows[0].mem_used_pct, "25%");
    }

    #[test]
    fn test_unknown_values_keep_raw_text() {
        let rows = decode_utilization_lines(["n1 <unknown> <unknown> <unknown> <unknown>"]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cpu_used_cores_raw, "<unknown>");
        assert_eq!(rows[0].cpu_used_cores, 0.0);
        assert_eq!(rows[0].mem_used_bytes, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(decode_utilization_lines(Vec::<String>::new()).is_empty());
        assert!(decode_utilization_text("").is_empty());
    }

    #[test]
    fn test_custom_column_layout() {
        // A layout with memory columns first
        let columns = TopNodesColumns {
            node: 0,
            mem_bytes: 1,
            mem_pct: 2,
            cpu_cores: 3,
            cpu_pct: 4,
        };

        let rows = columns.decode("n1 2Gi 25% 500m 12%\nshort line");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mem_used_bytes, 2_147_483_648.0);
        assert_eq!(rows[0].cpu_used_cores, 0.5);
        assert_eq!(rows[0].cpu_used_pct, "12%");
    }

    #[test]
    fn test_min_tokens_follows_layout() {
        assert_eq!(TopNodesColumns::default().min_tokens(), 5);

        let wide = TopNodesColumns {
            mem_pct: 6,
            ..Default::default()
        };
        assert_eq!(wide.min_tokens(), 7);
    }
}
