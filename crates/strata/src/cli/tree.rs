//! `strata tree` command implementation.

use std::path::{Path, PathBuf};

use colored::Colorize;
use rayon::prelude::*;

use super::Context;
use super::display::print_file_error;

/// Run the tree command.
///
/// Files are parsed in parallel, one forest per file, and printed in
/// argument order.
pub fn run(ctx: &Context, files: &[PathBuf], language: Option<&str>) -> Result<(), strata::Error> {
    let rendered: Vec<(&Path, strata::Result<String>)> = files
        .par_iter()
        .map(|path| {
            let result = ctx
                .parse_file(path, language)
                .map(|(_, forest)| strata::visualize(&forest));
            (path.as_path(), result)
        })
        .collect();

    let mut failed = 0;
    for (path, result) in &rendered {
        match result {
            Ok(text) => {
                if files.len() > 1 {
                    println!("{}", format!("==> {} <==", path.display()).cyan());
                }
                print!("{text}");
            }
            Err(e) => {
                failed += 1;
                print_file_error(path, e);
            }
        }
    }

    if failed > 0 {
        return Err(strata::Error::Config(format!(
            "{failed} of {} files could not be parsed",
            files.len()
        )));
    }
    Ok(())
}
