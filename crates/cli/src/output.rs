//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One row of a probability breakdown.
#[derive(Tabled, Serialize)]
pub struct ProbabilityRow {
    #[tabled(rename = "Class")]
    pub class: String,
    #[tabled(rename = "Probability")]
    pub probability: String,
}

/// Print a probability table, highest first.
pub fn print_probabilities(mut rows: Vec<(String, f32)>, format: OutputFormat) {
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let table_rows: Vec<ProbabilityRow> = rows
        .into_iter()
        .map(|(class, pct)| ProbabilityRow {
            class,
            probability: format!("{:.1}%", pct),
        })
        .collect();

    match format {
        OutputFormat::Table => {
            let table = Table::new(&table_rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&table_rows) {
                println!("{}", json);
            }
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
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

/// Format a percent confidence for display
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.0}%", confidence)
}
