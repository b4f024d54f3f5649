//! Cluster command execution
//!
//! The aggregation core never talks to the control plane itself. It asks a
//! [`ClusterExecutor`] for raw listing text and decodes whatever comes back.
//! [`KubectlExecutor`] is the stock implementation, shelling out to
//! `kubectl` with an explicit [`ExecutorConfig`].

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Failures while fetching raw output from the cluster
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("`{command}` printed non UTF-8 output")]
    Utf8 {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Source of raw cluster snapshots
#[async_trait]
pub trait ClusterExecutor: Send + Sync {
    /// JSON pod listing for a namespace
    async fn pod_listing(&self, namespace: &str) -> Result<String, ExecutorError>;

    /// JSON node listing
    async fn node_listing(&self) -> Result<String, ExecutorError>;

    /// Per-node utilization table, one row per node and no header
    async fn node_utilization(&self) -> Result<String, ExecutorError>;
}

/// How to reach the cluster through `kubectl`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutorConfig {
    /// `kubectl` binary, resolved through `PATH` when not absolute
    #[serde(default = "default_kubectl")]
    pub kubectl: PathBuf,

    /// Kubeconfig file, `kubectl`'s own default when unset
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context naming the cluster, e.g. `k3d-myk3s`
    #[serde(default)]
    pub context: Option<String>,

    /// Per-command timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_kubectl() -> PathBuf {
    PathBuf::from("kubectl")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kubectl: default_kubectl(),
            kubeconfig: None,
            context: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from `KUBETALLY_*` environment variables
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("KUBETALLY"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Arguments selecting the kubeconfig and context, placed before the verb
    fn connection_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        args
    }
}

/// Executor running `kubectl` as a child process
#[derive(Debug, Clone)]
pub struct KubectlExecutor {
    config: ExecutorConfig,
}

impl KubectlExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Full argument list for a `kubectl` invocation
    pub fn args_for(&self, verb_args: &[&str]) -> Vec<String> {
        let mut args = self.config.connection_args();
        args.extend(verb_args.iter().map(|a| a.to_string()));
        args
    }

    /// Run `kubectl` and return its trimmed stdout
    async fn run(&self, verb_args: &[&str]) -> Result<String, ExecutorError> {
        let args = self.args_for(verb_args);
        let program = self.config.kubectl.display().to_string();
        let command = format!("{} {}", program, args.join(" "));
        let timeout = self.config.timeout();

        debug!(command = %command, "Running cluster command");

        let child = Command::new(&self.config.kubectl)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                program: program.clone(),
                source,
            })?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ExecutorError::Timeout {
                command: command.clone(),
                timeout,
            })?
            .map_err(|source| ExecutorError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutorError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|source| ExecutorError::Utf8 { command, source })?;

        Ok(stdout.trim().to_string())
    }
}

#[async_trait]
impl ClusterExecutor for KubectlExecutor {
    async fn pod_listing(&self, namespace: &str) -> Result<String, ExecutorError> {
        self.run(&["get", "pods", "-n", namespace, "-o", "json"]).await
    }

    async fn node_listing(&self) -> Result<String, ExecutorError> {
        self.run(&["get", "nodes", "-o", "json"]).await
    }

    async fn node_utilization(&self) -> Result<String, ExecutorError> {
        self.run(&["top", "nodes", "--no-headers"]).await
    }
}
