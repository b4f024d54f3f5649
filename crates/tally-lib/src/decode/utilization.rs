//! Node utilization text decoding
//!
//! The metrics source prints one row per node:
//! `NAME CPU(cores) CPU% MEMORY(bytes) MEMORY%`. Columns are positional, so
//! the layout lives in [`TopNodesColumns`] and callers go through the
//! [`UtilizationDecoder`] trait.

use crate::models::NodeUtilization;
use crate::quantity::parse_resource_value;
use tracing::debug;

/// Turns raw utilization output into per-node rows
pub trait UtilizationDecoder: Send + Sync {
    /// Decode a single line, `None` when the line carries no row
    fn decode_line(&self, line: &str) -> Option<NodeUtilization>;

    /// Decode newline-separated output, skipping lines without a row
    fn decode(&self, raw: &str) -> Vec<NodeUtilization> {
        raw.lines()
            .filter_map(|line| self.decode_line(line))
            .collect()
    }
}

/// Column positions of `kubectl top nodes --no-headers` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNodesColumns {
    pub node: usize,
    pub cpu_cores: usize,
    pub cpu_pct: usize,
    pub mem_bytes: usize,
    pub mem_pct: usize,
}

impl Default for TopNodesColumns {
    fn default() -> Self {
        Self {
            node: 0,
            cpu_cores: 1,
            cpu_pct: 2,
            mem_bytes: 3,
            mem_pct: 4,
        }
    }
}

impl TopNodesColumns {
    /// Fewest tokens a line needs before it is read as a row
    pub fn min_tokens(&self) -> usize {
        [
            self.node,
            self.cpu_cores,
            self.cpu_pct,
            self.mem_bytes,
            self.mem_pct,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

impl UtilizationDecoder for TopNodesColumns {
    fn decode_line(&self, line: &str) -> Option<NodeUtilization> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < self.min_tokens() {
            return None;
        }

        let cpu_raw = tokens[self.cpu_cores];
        let mem_raw = tokens[self.mem_bytes];

        Some(NodeUtilization {
            node: tokens[self.node].to_string(),
            cpu_used_cores_raw: cpu_raw.to_string(),
            cpu_used_cores: parse_resource_value(Some(cpu_raw)),
            cpu_used_pct: tokens[self.cpu_pct].to_string(),
            mem_used_bytes_raw: mem_raw.to_string(),
            mem_used_bytes: parse_resource_value(Some(mem_raw)),
            mem_used_pct: tokens[self.mem_pct].to_string(),
        })
    }
}

/// Decode utilization lines using the default `kubectl top nodes` layout.
///
/// An empty input is the normal result when no metrics backend is
/// installed and yields no rows.
pub fn decode_utilization_lines<I, S>(lines: I) -> Vec<NodeUtilization>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let columns = TopNodesColumns::default();
    let rows: Vec<NodeUtilization> = lines
        .into_iter()
        .filter_map(|line| columns.decode_line(line.as_ref()))
        .collect();

    debug!(nodes = rows.len(), "Decoded node utilization");
    rows
}

/// Decode newline-separated utilization output
pub fn decode_utilization_text(raw: &str) -> Vec<NodeUtilization> {
    decode_utilization_lines(raw.lines())
}
