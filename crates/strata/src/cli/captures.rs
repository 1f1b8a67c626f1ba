//! `strata captures` command implementation.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use strata::Language;

use super::Context;
use super::display::{format_span, preview};

const PREVIEW_CHARS: usize = 60;

/// Arguments of the captures command.
pub struct Request<'a> {
    pub file: &'a Path,
    pub language: &'a str,
    pub query: Option<&'a str>,
    pub query_file: Option<&'a Path>,
    pub captures: &'a [String],
    pub root_language: Option<&'a str>,
    pub json: bool,
}

/// One capture as printed by `--json`.
#[derive(Serialize)]
struct CaptureRow<'a> {
    name: &'a str,
    kind: &'a str,
    start_byte: usize,
    end_byte: usize,
    start: [usize; 2],
    end: [usize; 2],
    text: Option<&'a str>,
}

/// Run the captures command.
pub fn run(ctx: &Context, request: &Request<'_>) -> Result<(), strata::Error> {
    let language: Language = request.language.parse()?;
    let pattern = match (request.query, request.query_file) {
        (Some(query), _) => query.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            return Err(strata::Error::Config(
                "either --query or --query-file is required".to_string(),
            ));
        }
    };

    let (source, forest) = ctx.parse_file(request.file, request.root_language)?;
    let names: Vec<&str> = request.captures.iter().map(String::as_str).collect();
    let captures = forest.find_captures(language, &pattern, &source, &names)?;

    if request.json {
        let rows: Vec<CaptureRow<'_>> = captures
            .iter()
            .map(|capture| {
                let start = capture.node.start_position();
                let end = capture.node.end_position();
                CaptureRow {
                    name: &capture.name,
                    kind: capture.node.kind(),
                    start_byte: capture.node.start_byte(),
                    end_byte: capture.node.end_byte(),
                    start: [start.row, start.column],
                    end: [end.row, end.column],
                    text: capture.node.utf8_text(&source).ok(),
                }
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| strata::Error::Config(format!("JSON error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    if captures.is_empty() {
        println!(
            "No {} captures in {}",
            language.to_string().cyan(),
            request.file.display()
        );
        let trees = forest.language_trees(language).len();
        if trees == 0 {
            println!(
                "\n{}: {} contains no {language} regions.",
                "hint".dimmed(),
                request.file.display()
            );
        }
        return Ok(());
    }

    println!(
        "Found {} captures in {}:",
        captures.len().to_string().green().bold(),
        request.file.display()
    );
    println!();

    for capture in &captures {
        let text = capture.node.utf8_text(&source).unwrap_or("<invalid UTF-8>");
        println!(
            "  {} {} {} {}",
            format!("@{}", capture.name).white().bold(),
            capture.node.kind().dimmed(),
            format_span(&capture.node).dimmed(),
            preview(text, PREVIEW_CHARS)
        );
    }

    Ok(())
}
