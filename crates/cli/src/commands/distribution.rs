//! Microservices-by-node command

use anyhow::Result;

use crate::commands::pods::no_pods_message;
use crate::output::{print_json, print_warning, render_pivot, OutputFormat};
use tally_lib::{ClusterExecutor, Inventory};

/// Show how many pods of each microservice run on each node
pub async fn show_distribution<E: ClusterExecutor>(
    inventory: &Inventory<E>,
    namespace: &str,
    format: OutputFormat,
) -> Result<()> {
    let pivot = inventory.fetch_distribution(namespace).await;

    match format {
        OutputFormat::Json => print_json(&pivot),
        OutputFormat::Table => {
            if pivot.is_empty() {
                print_warning(&no_pods_message(namespace));
                return Ok(());
            }
            println!("{}", render_pivot(&pivot));
        }
    }

    Ok(())
}
