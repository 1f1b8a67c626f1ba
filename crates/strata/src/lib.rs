//! # Strata: Incremental Multi-Grammar Parse Forest
//!
//! Strata keeps one tree-sitter tree per language region of a document. A PHP
//! template parses as PHP; its literal text is HTML; the HTML's `<script>` and
//! `<style>` bodies are JavaScript and CSS. Each of those regions gets its own
//! [`LanguageTree`], nested the way the languages nest, and the whole forest
//! follows the document through edits without reparsing from scratch.
//!
//! ## Design Philosophy
//!
//! - **Syntax, not semantics** - Strata builds and queries trees; analysis
//!   features decide what the captures mean
//! - **Rebuild, don't patch** - Injected trees are rediscovered on every parse,
//!   so the forest always mirrors the current content
//! - **Owned all the way down** - Each tree owns its parser and children; no
//!   shared state between trees
//! - **Configuration is read-only** - Grammars and injection queries live in an
//!   immutable [`Registry`] shared by the whole forest
//!
//! ## Quick Start
//!
//! ```no_run
//! use strata::{Language, LanguageTree};
//!
//! let source = b"<div><?php $var = 2; ?></div>";
//!
//! let mut forest = LanguageTree::new(Language::Php, Vec::new(), Vec::new())?;
//! forest.parse(source)?;
//!
//! // The template text is one combined HTML document.
//! assert_eq!(forest.children().len(), 1);
//!
//! // Query any language, wherever it is embedded.
//! let names = forest.find_captures(
//!     Language::Php,
//!     "(assignment_expression left: (variable_name (name) @name))",
//!     source,
//!     &["name"],
//! )?;
//! println!("{} assignments", names.len());
//!
//! println!("{}", strata::visualize(&forest));
//! # Ok::<(), strata::Error>(())
//! ```

mod config;
mod document;
mod error;
mod injections;
mod languages;
mod tree;
mod types;
mod visualize;

pub use config::{CONFIG_FILE_NAME, StrataConfig};
pub use document::{Document, byte_offset, input_edit, point_at};
pub use error::{Error, Result};
pub use injections::{Injection, query_injections};
pub use languages::{LanguageSupport, Registry, get_language_support};
pub use tree::LanguageTree;
pub use types::{Capture, Language, ParseOptions};
pub use visualize::{Visualizer, visualize};

/// Re-export of the tree-sitter version strata is built against.
pub use tree_sitter;
