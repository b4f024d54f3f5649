//! Configuration management for the CLI

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;
use tally_lib::ExecutorConfig;

const DEFAULT_NAMESPACE: &str = "default";

/// CLI configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Namespace used when `--namespace` is not given
    pub default_namespace: Option<String>,
    /// Output format used when `--format` is not given
    pub default_format: Option<String>,
    /// `kubectl` binary
    pub kubectl: Option<PathBuf>,
    /// Kubeconfig file
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context naming the cluster
    pub context: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file, defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("kubetally").join("config.json"))
    }

    /// Namespace from the flag, then the file, then `default`
    pub fn namespace(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.default_namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
    }

    /// Output format from the flag, then the file, then table
    pub fn format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        if let Some(format) = flag {
            return Ok(format);
        }

        match &self.default_format {
            Some(name) => OutputFormat::from_str(name, true)
                .map_err(|e| anyhow::anyhow!("Invalid default_format in config: {}", e)),
            None => Ok(OutputFormat::default()),
        }
    }

    /// Layer file settings over an environment-derived executor config
    pub fn apply_to(&self, mut executor: ExecutorConfig) -> ExecutorConfig {
        if let Some(kubectl) = &self.kubectl {
            executor.kubectl = kubectl.clone();
        }
        if self.kubeconfig.is_some() {
            executor.kubeconfig = self.kubeconfig.clone();
        }
        if self.context.is_some() {
            executor.context = self.context.clone();
        }
        executor
    }
}
