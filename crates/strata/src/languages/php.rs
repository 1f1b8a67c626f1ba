//! PHP template support.
//!
//! The PHP grammar parses a whole template: everything outside `<?php ... ?>`
//! becomes `text` nodes. All of those nodes together form one HTML document,
//! so they are injected as a single combined HTML tree.

use super::LanguageSupport;
use crate::types::Language;

const INJECTIONS: &str = r#"
((text) @injection.content
  (#set! injection.language "html")
  (#set! injection.combined))
"#;

/// PHP language support implementation.
pub struct PhpLanguage;

impl LanguageSupport for PhpLanguage {
    fn language(&self) -> Language {
        Language::Php
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_php::LANGUAGE_PHP.into()
    }

    fn injection_query(&self) -> &'static str {
        INJECTIONS
    }
}
