//! Common display utilities for CLI commands.

use std::path::Path;

use colored::Colorize;
use strata::tree_sitter::Node;

/// Print an error and its cause chain to stderr.
pub fn print_error(error: &strata::Error) {
    eprintln!("{}: {error}", "error".red().bold());
    // Show cause chain for nested errors
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  {}: {cause}", "caused by".dimmed());
        source = std::error::Error::source(cause);
    }
}

/// Print an error that belongs to one file of a batch.
pub fn print_file_error(path: &Path, error: &strata::Error) {
    eprintln!(
        "{}: {}: {error}",
        "error".red().bold(),
        path.display().to_string().white().bold()
    );
}

/// `row:column-row:column`, one-based as editors show them.
pub fn format_span(node: &Node<'_>) -> String {
    let start = node.start_position();
    let end = node.end_position();
    format!(
        "{}:{}-{}:{}",
        start.row + 1,
        start.column + 1,
        end.row + 1,
        end.column + 1
    )
}

/// First line of a node's text, shortened for a table cell.
pub fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > max_chars || first_line.len() < text.trim_end().len() {
        let short: String = first_line.chars().take(max_chars).collect();
        format!("{short}…")
    } else {
        first_line.to_string()
    }
}
