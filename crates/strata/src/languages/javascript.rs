//! JavaScript support. Leaf grammar, no injections.

use super::LanguageSupport;
use crate::types::Language;

/// JavaScript language support implementation.
pub struct JavaScriptLanguage;

impl LanguageSupport for JavaScriptLanguage {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
    }
}
