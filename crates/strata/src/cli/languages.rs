//! `strata languages` command implementation.

use colored::Colorize;
use strata::Language;

use super::Context;

/// Run the languages command.
pub fn run(ctx: &Context) {
    println!("{}", "Linked grammars:".bold());
    println!();

    for language in Language::ALL {
        let mut extensions: Vec<String> = language
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        extensions.extend(
            ctx.config
                .extensions
                .iter()
                .filter(|(_, name)| name.parse::<Language>().ok() == Some(language))
                .map(|(ext, _)| format!(".{ext}")),
        );

        let injections = if ctx.registry.injection_query(language).trim().is_empty() {
            "no injections".dimmed()
        } else if ctx.registry.is_overridden(language) {
            "injections (configured)".yellow()
        } else {
            "injections".green()
        };

        println!(
            "  {:<12} {:<28} {}",
            language.to_string().white().bold(),
            extensions.join(" "),
            injections
        );
    }
}
