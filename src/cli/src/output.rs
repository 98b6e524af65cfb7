//! Output formatting utilities for the taskgate CLI.
//!
//! Supports table, JSON, and YAML output formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Output format selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Render as a formatted table
    #[default]
    Table,
    /// Render as JSON
    Json,
    /// Render as YAML
    Yaml,
}

/// Print an allow verdict to stdout.
pub fn print_allow(msg: &str) {
    println!("{} {}", "[ALLOW]".green().bold(), msg);
}

/// Print a deny verdict to stdout.
pub fn print_deny(msg: &str) {
    println!("{} {}", "[DENY]".red().bold(), msg);
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

/// Print a list of items in the requested format.
///
/// For table output, items must implement `Tabled`. For JSON/YAML, items must
/// implement `Serialize`.
pub fn print_list<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No results found.".dimmed());
                return Ok(());
            }
            println!("{}", render_table(items));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(items)?),
    }
    Ok(())
}

/// Print a single item as JSON or YAML. Table output falls back to JSON.
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item)?)
        }
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(item)?),
    }
    Ok(())
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

fn render_table<T: Tabled>(items: &[T]) -> String {
    Table::new(items)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "Permission")]
        permission: &'static str,
    }

    #[test]
    fn test_render_table_contains_rows() {
        let rows = [Row { permission: "task.view" }, Row { permission: "task.delete" }];
        let table = render_table(&rows);
        assert!(table.contains("Permission"));
        assert!(table.contains("task.view"));
        assert!(table.contains("task.delete"));
    }

    #[test]
    fn test_print_list_json_and_yaml() {
        let rows = [Row { permission: "task.view" }];
        assert!(print_list(&rows, OutputFormat::Json).is_ok());
        assert!(print_list(&rows, OutputFormat::Yaml).is_ok());
    }
}
