//! Error types for strata operations.
//!
//! Errors fall into two groups:
//!
//! - **Forest errors**: raised while building, parsing or querying a
//!   [`LanguageTree`](crate::LanguageTree) (`GrammarUnavailable`,
//!   `QueryCompilation`, `UnknownCapture`, `ParseEngine`)
//! - **Session errors**: raised by the layers around the forest (document
//!   positions, configuration, I/O)
//!
//! ## Error Philosophy
//!
//! Nothing is recovered internally. A failure while parsing a subtree is
//! returned to the caller immediately; the parts of the forest that were
//! already updated stay in place, so callers can keep working with a partial
//! forest and retry on the next edit.

use thiserror::Error;

use crate::types::Language;

/// Result type for strata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for strata operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No grammar is registered for the requested language, or the grammar
    /// cannot be loaded by the linked tree-sitter runtime
    #[error("grammar unavailable: {0}")]
    GrammarUnavailable(String),

    /// An injection or capture query failed to compile
    #[error("failed to compile {language} query: {source}")]
    QueryCompilation {
        /// Grammar the query was compiled against
        language: Language,
        /// Underlying tree-sitter error
        #[source]
        source: tree_sitter::QueryError,
    },

    /// A requested capture name does not appear in the compiled query
    #[error("capture '{0}' is not present in query")]
    UnknownCapture(String),

    /// Tree-sitter could not produce a tree
    #[error("parser error for {language}: {message}")]
    ParseEngine {
        /// Grammar that was being parsed
        language: Language,
        /// Human-readable error message
        message: String,
    },

    /// A document position lies outside the document text
    #[error("position {line}:{character} is outside the document")]
    InvalidPosition {
        /// Zero-based line
        line: u32,
        /// Zero-based UTF-16 column
        character: u32,
    },

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse_engine(language: Language, message: impl Into<String>) -> Self {
        Self::ParseEngine {
            language,
            message: message.into(),
        }
    }

    /// Returns `true` if the error came out of the forest itself rather than
    /// the session or configuration layers around it.
    #[must_use]
    pub fn is_forest_error(&self) -> bool {
        matches!(
            self,
            Self::GrammarUnavailable(_)
                | Self::QueryCompilation { .. }
                | Self::UnknownCapture(_)
                | Self::ParseEngine { .. }
        )
    }
}
