//! Strata CLI - Inspect language forests from the command line.
//!
//! Parses templates into their nested language trees and runs capture
//! queries over any embedded language. Mostly a debugging aid for injection
//! queries and capture patterns.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

/// Strata: incremental multi-grammar parse forest.
#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./strata.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files and print their language forests
    Tree {
        /// Files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Root language (detected from the file extension by default)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Run a capture query against every tree of one language
    Captures {
        /// File to parse
        file: PathBuf,

        /// Language the pattern is written for
        #[arg(short, long)]
        language: String,

        /// Query pattern
        #[arg(short, long, required_unless_present = "query_file", conflicts_with = "query_file")]
        query: Option<String>,

        /// Read the query pattern from a file
        #[arg(long)]
        query_file: Option<PathBuf>,

        /// Capture names to report (repeatable)
        #[arg(short = 'c', long = "capture", required = true)]
        captures: Vec<String>,

        /// Root language of the file (detected from the extension by default)
        #[arg(long)]
        root_language: Option<String>,

        /// Print captures as JSON
        #[arg(long)]
        json: bool,
    },

    /// List linked grammars and their injection queries
    Languages,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cli::Context::load(cli.config.as_deref()).and_then(|ctx| match cli.command {
        Commands::Tree { files, language } => cli::tree::run(&ctx, &files, language.as_deref()),
        Commands::Captures {
            file,
            language,
            query,
            query_file,
            captures,
            root_language,
            json,
        } => cli::captures::run(
            &ctx,
            &cli::captures::Request {
                file: &file,
                language: &language,
                query: query.as_deref(),
                query_file: query_file.as_deref(),
                captures: &captures,
                root_language: root_language.as_deref(),
                json,
            },
        ),
        Commands::Languages => {
            cli::languages::run(&ctx);
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
