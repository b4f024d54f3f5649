//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use tally_lib::quantity::to_gib;
use tally_lib::{PivotTable, PodPhase};

const BAR_WIDTH: usize = 40;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Render a list of rows as a rounded table
pub fn render_table<T: Tabled>(items: &[T]) -> String {
    Table::new(items).with(Style::rounded()).to_string()
}

/// Render a pivot table with one column per microservice
pub fn render_pivot(pivot: &PivotTable) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Node".to_string()];
    header.extend(pivot.columns().iter().cloned());
    builder.push_record(header);

    for (node, counts) in pivot.rows() {
        let mut record = vec![display_node(node)];
        record.extend(counts.iter().map(|c| c.to_string()));
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Render `label count ████` lines scaled to the largest count
pub fn render_bars<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> String {
    let counts: Vec<(&str, usize)> = counts.into_iter().collect();
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let label_width = counts
        .iter()
        .map(|(label, _)| display_node(label).len())
        .max()
        .unwrap_or(0);

    counts
        .iter()
        .map(|(label, count)| {
            let width = if max == 0 { 0 } else { count * BAR_WIDTH / max };
            format!(
                "{:<label_width$}  {:>4}  {}",
                display_node(label),
                count,
                "█".repeat(width.max(usize::from(*count > 0)))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize output: {}", e)),
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a section heading with an underline
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Format bytes as GiB with two decimals
pub fn format_gib(bytes: f64) -> String {
    format!("{:.2}", to_gib(bytes))
}

/// Format cores, using millicores below one core
pub fn format_cores(cores: f64) -> String {
    if cores >= 1.0 || cores == 0.0 {
        let formatted = format!("{:.2}", cores);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        format!("{}m", (cores * 1000.0).round() as u64)
    }
}

/// Color a pod phase
pub fn color_phase(phase: PodPhase) -> String {
    let label = phase.as_str();
    match phase {
        PodPhase::Running | PodPhase::Succeeded => label.green().to_string(),
        PodPhase::Pending => label.yellow().to_string(),
        PodPhase::Failed => label.red().to_string(),
        PodPhase::Unknown => label.magenta().to_string(),
        PodPhase::Unset => "-".dimmed().to_string(),
    }
}

/// Show unscheduled pods' empty node name as a placeholder
pub fn display_node(node: &str) -> String {
    if node.is_empty() {
        "<unscheduled>".to_string()
    } else {
        node.to_string()
    }
}
