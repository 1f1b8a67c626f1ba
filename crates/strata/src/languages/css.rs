//! CSS support. Leaf grammar, no injections.

use super::LanguageSupport;
use crate::types::Language;

/// CSS language support implementation.
pub struct CssLanguage;

impl LanguageSupport for CssLanguage {
    fn language(&self) -> Language {
        Language::Css
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_css::LANGUAGE.into()
    }
}
