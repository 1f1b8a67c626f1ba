//! HTML support.
//!
//! Script and style bodies are injected as JavaScript and CSS. Each element
//! is its own document; separate `<script>` blocks are not combined.

use super::LanguageSupport;
use crate::types::Language;

const INJECTIONS: &str = r#"
((script_element
  (raw_text) @injection.content)
  (#set! injection.language "javascript"))

((style_element
  (raw_text) @injection.content)
  (#set! injection.language "css"))
"#;

/// HTML language support implementation.
pub struct HtmlLanguage;

impl LanguageSupport for HtmlLanguage {
    fn language(&self) -> Language {
        Language::Html
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_html::LANGUAGE.into()
    }

    fn injection_query(&self) -> &'static str {
        INJECTIONS
    }
}
