//! kubetally CLI
//!
//! Polls a cluster through `kubectl` and prints pod inventories, node
//! capacity and utilization, and pod distribution tables.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{distribution, nodes, pods, summary};
use std::path::PathBuf;
use tally_lib::{ExecutorConfig, Inventory, KubectlExecutor};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// kubetally CLI
#[derive(Parser)]
#[command(name = "kubetally")]
#[command(
    author,
    version,
    about = "Cluster pod and node inventory for kubetally",
    long_about = None
)]
pub struct Cli {
    /// kubectl binary to run (can also be set via KUBETALLY_KUBECTL)
    #[arg(long, global = true)]
    pub kubectl: Option<PathBuf>,

    /// Path to kubeconfig file (uses kubectl's default if not specified)
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context of the cluster to poll
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Timeout for each kubectl call, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List pods with their microservice, node and phase
    Pods {
        /// Namespace to list (defaults to config, then "default")
        #[arg(long, short)]
        namespace: Option<String>,
    },

    /// Show node capacity, allocatable resources and live usage
    Nodes,

    /// Show pod counts per node and microservice
    Distribution {
        /// Namespace to count (defaults to config, then "default")
        #[arg(long, short)]
        namespace: Option<String>,
    },

    /// Show cluster summary with pods per node
    Summary {
        /// Namespace to summarise (defaults to config, then "default")
        #[arg(long, short)]
        namespace: Option<String>,
    },
}

impl Cli {
    /// Layer command-line flags over the configured executor settings
    fn executor_config(&self, base: ExecutorConfig) -> ExecutorConfig {
        let mut config = base;
        if let Some(kubectl) = &self.kubectl {
            config.kubectl = kubectl.clone();
        }
        if self.kubeconfig.is_some() {
            config.kubeconfig = self.kubeconfig.clone();
        }
        if self.context.is_some() {
            config.context = self.context.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let file_config = config::Config::load()?;
    let env_config = ExecutorConfig::load().context("Failed to read KUBETALLY_* settings")?;
    let executor_config = cli.executor_config(file_config.apply_to(env_config));
    let format = file_config.format(cli.format)?;

    tracing::debug!(
        kubectl = %executor_config.kubectl.display(),
        context = ?executor_config.context,
        timeout_secs = executor_config.timeout_secs,
        "Executor configured"
    );

    let inventory = Inventory::new(KubectlExecutor::new(executor_config));

    match cli.command {
        Commands::Pods { namespace } => {
            pods::show_pods(&inventory, &file_config.namespace(namespace), format).await?;
        }
        Commands::Nodes => {
            nodes::show_nodes(&inventory, format).await?;
        }
        Commands::Distribution { namespace } => {
            distribution::show_distribution(&inventory, &file_config.namespace(namespace), format)
                .await?;
        }
        Commands::Summary { namespace } => {
            summary::show_summary(&inventory, &file_config.namespace(namespace), format).await?;
        }
    }

    Ok(())
}
