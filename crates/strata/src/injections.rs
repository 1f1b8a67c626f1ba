//! Injection discovery.
//!
//! Runs a language's injection query over a freshly parsed tree and reports
//! every embedded-language region it finds, in document order. Grouping the
//! regions into child trees is the caller's job (see
//! [`LanguageTree::parse`](crate::LanguageTree::parse)).

use streaming_iterator::StreamingIterator;
use tracing::{debug, trace};
use tree_sitter::{Node, Query, QueryCursor, Range};

use crate::languages::tree_sitter_utils::node_text;
use crate::types::Language;

const CONTENT_CAPTURE: &str = "injection.content";
const LANGUAGE_CAPTURE: &str = "injection.language";
const LANGUAGE_PROPERTY: &str = "injection.language";
const COMBINED_PROPERTY: &str = "injection.combined";

/// One embedded-language region reported by an injection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Injection {
    /// Language of the embedded region
    pub language: Language,
    /// Span of the `@injection.content` node
    pub range: Range,
    /// Whether every match of the pattern belongs to one shared document
    pub combined: bool,
}

/// Run `query` over the tree under `root` and collect its injections.
///
/// Matches without an `@injection.content` capture, or naming a language
/// strata has no grammar for, are skipped. The result is sorted by start
/// byte; matches starting at the same byte keep engine order.
pub fn query_injections(query: &Query, root: Node<'_>, source: &[u8]) -> Vec<Injection> {
    let Some(content_index) = query.capture_index_for_name(CONTENT_CAPTURE) else {
        debug!("Injection query has no @{CONTENT_CAPTURE} capture");
        return Vec::new();
    };
    let language_index = query.capture_index_for_name(LANGUAGE_CAPTURE);

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source);
    let mut injections = Vec::new();

    while let Some(m) = matches.next() {
        let mut content = None;
        let mut language_name = None;

        for capture in m.captures {
            if capture.index == content_index {
                content = Some(capture.node);
            } else if Some(capture.index) == language_index {
                language_name = node_text(&capture.node, source);
            }
        }

        let mut combined = false;
        for property in query.property_settings(m.pattern_index) {
            match &*property.key {
                LANGUAGE_PROPERTY if language_name.is_none() => {
                    language_name = property.value.as_deref();
                }
                COMBINED_PROPERTY => combined = true,
                _ => {}
            }
        }

        let Some(content) = content else {
            continue;
        };
        let Some(name) = language_name else {
            debug!(
                pattern = m.pattern_index,
                node_kind = %content.kind(),
                "Injection match does not name a language"
            );
            continue;
        };
        let Ok(language) = name.trim().parse::<Language>() else {
            debug!(language = %name, "Skipping injection of unregistered language");
            continue;
        };

        trace!(
            %language,
            combined,
            start_byte = content.start_byte(),
            end_byte = content.end_byte(),
            "Found injection"
        );
        injections.push(Injection {
            language,
            range: content.range(),
            combined,
        });
    }

    injections.sort_by_key(|injection| injection.range.start_byte);
    injections
}
