//! Grammar registry and injection query catalog.
//!
//! Each linked grammar implements the `LanguageSupport` trait, which supplies
//! the tree-sitter grammar and the query that discovers embedded languages.
//!
//! ## Adding a New Language
//!
//! 1. Add the variant to `Language` enum in `types.rs`
//! 2. Create a new module (e.g., `markdown.rs`)
//! 3. Implement `LanguageSupport` trait
//! 4. Register in `get_language_support()`
//!
//! ## Injection Queries
//!
//! Injection queries use the usual tree-sitter conventions:
//!
//! - `@injection.content` marks the node holding embedded text
//! - `@injection.language` (capture) or `#set! injection.language "name"`
//!   names the embedded language
//! - `#set! injection.combined` parses every match of the pattern as one
//!   document
//!
//! The built-in queries are static. A [`Registry`] snapshots them and can
//! override individual queries from configuration; it never changes after
//! construction and is shared by every node of a forest.

pub mod css;
pub mod html;
pub mod javascript;
pub mod php;
pub(crate) mod tree_sitter_utils;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::types::Language;

/// Get the language support implementation for a language.
#[must_use]
pub fn get_language_support(lang: Language) -> &'static dyn LanguageSupport {
    match lang {
        Language::Php => &php::PhpLanguage,
        Language::Html => &html::HtmlLanguage,
        Language::JavaScript => &javascript::JavaScriptLanguage,
        Language::Css => &css::CssLanguage,
    }
}

/// Trait for a linked grammar.
pub trait LanguageSupport: Send + Sync {
    /// The language this implementation serves.
    fn language(&self) -> Language;

    /// Get the tree-sitter language for parsing.
    fn tree_sitter_language(&self) -> tree_sitter::Language;

    /// Built-in injection query.
    ///
    /// Empty when the language never embeds other languages.
    fn injection_query(&self) -> &'static str {
        ""
    }
}

/// Read-only lookup of grammars and injection queries for a forest.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    injection_overrides: HashMap<Language, String>,
}

impl Registry {
    /// The process-wide registry with only the built-in queries.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        static BUILTIN: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(Self::default())))
    }

    /// Replace the injection query used for `language`.
    ///
    /// An empty query disables injections for that language.
    #[must_use]
    pub fn with_injection_query(mut self, language: Language, query: impl Into<String>) -> Self {
        self.injection_overrides.insert(language, query.into());
        self
    }

    /// Grammar used to parse `language`.
    #[must_use]
    pub fn grammar(&self, language: Language) -> tree_sitter::Language {
        get_language_support(language).tree_sitter_language()
    }

    /// Injection query for `language`, empty if it has none.
    #[must_use]
    pub fn injection_query(&self, language: Language) -> &str {
        match self.injection_overrides.get(&language) {
            Some(query) => query,
            None => get_language_support(language).injection_query(),
        }
    }

    /// Returns `true` if the query for `language` comes from configuration.
    #[must_use]
    pub fn is_overridden(&self, language: Language) -> bool {
        self.injection_overrides.contains_key(&language)
    }
}
