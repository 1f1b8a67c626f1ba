//! Domain types shared across the forest.
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Language | Enum not String | Only grammars we link can be named |
//! | Capture name | Owned `String` | Outlives the caller's name slice |
//! | Tree reuse | Option, default on | Reuse is a speed-up, never a requirement |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Grammars linked into strata.
///
/// Adding a language requires a `LanguageSupport` implementation in
/// `crate::languages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// PHP templates (`.php`); literal template text is parsed as `text` nodes
    Php,
    /// HTML, usually injected into PHP template text
    Html,
    /// JavaScript, injected from `<script>` elements
    #[serde(rename = "javascript")]
    JavaScript,
    /// CSS, injected from `<style>` elements
    Css,
}

impl Language {
    /// Every linked language, in registry order.
    pub const ALL: [Self; 4] = [Self::Php, Self::Html, Self::JavaScript, Self::Css];

    /// File extensions handled by this language.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Php => &["php", "phtml"],
            Self::Html => &["html", "htm"],
            Self::JavaScript => &["js", "mjs", "cjs"],
            Self::Css => &["css"],
        }
    }

    /// Detect language from file extension.
    ///
    /// # Returns
    ///
    /// `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Identifier used in injection queries, configuration and LSP
    /// `languageId` fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::Html => "html",
            Self::JavaScript => "javascript",
            Self::Css => "css",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "php" => Ok(Self::Php),
            "html" => Ok(Self::Html),
            "javascript" | "js" => Ok(Self::JavaScript),
            "css" => Ok(Self::Css),
            _ => Err(Error::GrammarUnavailable(format!(
                "no grammar registered for language '{s}'"
            ))),
        }
    }
}

/// Knobs that apply to every node of a forest.
///
/// Children inherit the options of the node that discovered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Feed the previous (edited) tree back into the parser.
    ///
    /// Results are identical either way; disabling it forces a parse from
    /// scratch on every call.
    pub reuse_previous_tree: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reuse_previous_tree: true,
        }
    }
}

/// A named node returned by [`LanguageTree::find_captures`](crate::LanguageTree::find_captures).
#[derive(Debug, Clone)]
pub struct Capture<'tree> {
    /// Capture name as requested by the caller
    pub name: String,
    /// Captured node, in root buffer coordinates
    pub node: tree_sitter::Node<'tree>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::php("php", Language::Php)]
    #[case::uppercase("HTML", Language::Html)]
    #[case::js_alias("js", Language::JavaScript)]
    #[case::javascript("javascript", Language::JavaScript)]
    #[case::css("css", Language::Css)]
    fn parses_language_identifiers(#[case] input: &str, #[case] expected: Language) {
        assert_eq!(input.parse::<Language>().expect("known language"), expected);
    }

    #[test]
    fn unknown_language_is_grammar_unavailable() {
        let err = "cobol".parse::<Language>().unwrap_err();

        assert!(matches!(err, Error::GrammarUnavailable(ref msg) if msg.contains("cobol")));
    }

    #[rstest]
    #[case::php("php", Some(Language::Php))]
    #[case::phtml("PHTML", Some(Language::Php))]
    #[case::htm("htm", Some(Language::Html))]
    #[case::mjs("mjs", Some(Language::JavaScript))]
    #[case::css("css", Some(Language::Css))]
    #[case::unknown("rs", None)]
    fn detects_language_from_extension(#[case] ext: &str, #[case] expected: Option<Language>) {
        assert_eq!(Language::from_extension(ext), expected);
    }

    #[test]
    fn display_matches_identifier() {
        for lang in Language::ALL {
            assert_eq!(lang.to_string(), lang.as_str());
            assert_eq!(lang.as_str().parse::<Language>().expect("round trip"), lang);
        }
    }

    #[test]
    fn serializes_as_identifier() {
        let json = serde_json::to_string(&Language::JavaScript).expect("serialize");

        assert_eq!(json, "\"javascript\"");
    }

    #[test]
    fn tree_reuse_is_on_by_default() {
        assert!(ParseOptions::default().reuse_previous_tree);
    }
}
