//! The language tree forest.
//!
//! A [`LanguageTree`] is one grammar's view of a document: a parser, the tree
//! it produced, the byte ranges it is restricted to, and the trees of the
//! languages embedded in it. The root covers the whole buffer; every child
//! covers the regions its parent's injection query reported.
//!
//! ## Edit cycle
//!
//! ```text
//! edit ──► update(edit)      shift every tree in the forest, no parsing
//! edit ──► update(edit)
//!          parse(source)     reparse root, rediscover and reparse children
//! ```
//!
//! Children are rebuilt on every parse. A region whose markers disappear
//! simply isn't rediscovered and its subtree is dropped.

use std::sync::Arc;

use streaming_iterator::StreamingIterator;
use tracing::{debug, trace};
use tree_sitter::{InputEdit, Node, Parser, Query, QueryCursor, Range, Tree};

use crate::error::{Error, Result};
use crate::injections::query_injections;
use crate::languages::Registry;
use crate::languages::tree_sitter_utils::{clip_to_ranges, edit_range, ranges_intersect};
use crate::types::{Capture, Language, ParseOptions};

/// One grammar's parse of a document, plus the trees embedded in it.
pub struct LanguageTree {
    parser: Parser,
    tree: Option<Tree>,
    language: Language,
    ranges: Vec<Range>,
    children: Vec<LanguageTree>,
    registry: Arc<Registry>,
    options: ParseOptions,
}

impl std::fmt::Debug for LanguageTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageTree")
            .field("language", &self.language)
            .field("ranges", &self.ranges)
            .field("parsed", &self.tree.is_some())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl LanguageTree {
    /// Create an unparsed tree using the built-in registry.
    ///
    /// An empty `ranges` slice means the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GrammarUnavailable`] if the grammar cannot be loaded
    /// into a parser.
    pub fn new(language: Language, ranges: Vec<Range>, children: Vec<Self>) -> Result<Self> {
        Self::with_registry(
            Registry::builtin(),
            ParseOptions::default(),
            language,
            ranges,
            children,
        )
    }

    /// Create an unparsed tree with an explicit registry and options.
    ///
    /// Children discovered later inherit both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GrammarUnavailable`] if the grammar cannot be loaded
    /// into a parser.
    pub fn with_registry(
        registry: Arc<Registry>,
        options: ParseOptions,
        language: Language,
        ranges: Vec<Range>,
        children: Vec<Self>,
    ) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&registry.grammar(language))
            .map_err(|e| Error::GrammarUnavailable(format!("{language}: {e}")))?;

        Ok(Self {
            parser,
            tree: None,
            language,
            ranges,
            children,
            registry,
            options,
        })
    }

    /// Language this tree was parsed with.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Included ranges; empty for a root covering the whole buffer.
    #[must_use]
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Trees of the languages embedded in this one, in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// The current syntax tree, `None` before the first successful parse.
    #[must_use]
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Root node of the current syntax tree.
    #[must_use]
    pub fn root_node(&self) -> Option<Node<'_>> {
        self.tree.as_ref().map(Tree::root_node)
    }

    /// Returns `true` if `range` intersects any of this tree's included
    /// ranges.
    ///
    /// A root tree has no included ranges and never matches.
    #[must_use]
    pub fn in_range(&self, range: &Range) -> bool {
        self.ranges.iter().any(|own| ranges_intersect(own, range))
    }

    /// Shift the whole forest for an edit that already happened to the
    /// buffer.
    ///
    /// Every child receives the same edit, whether or not it overlaps the
    /// child's ranges: edits before a region move it. Included ranges move
    /// with the text, so [`in_range`](Self::in_range) stays valid between
    /// edits. Nothing is reparsed; call [`parse`](Self::parse) after the last
    /// edit of a batch.
    pub fn update(&mut self, edit: &InputEdit) {
        if let Some(tree) = self.tree.as_mut() {
            tree.edit(edit);
        }
        for range in &mut self.ranges {
            edit_range(range, edit);
        }

        for child in &mut self.children {
            child.update(edit);
        }
    }

    /// Reparse this tree against `source`, then rediscover and parse every
    /// embedded language.
    ///
    /// # Errors
    ///
    /// - [`Error::ParseEngine`] if tree-sitter rejects the included ranges or
    ///   produces no tree
    /// - [`Error::QueryCompilation`] if an injection query is malformed
    ///
    /// A failing child is reported immediately. This tree keeps its new
    /// syntax tree and the children rebuilt so far.
    pub fn parse(&mut self, source: &[u8]) -> Result<()> {
        self.parser
            .set_included_ranges(&self.ranges)
            .map_err(|e| {
                Error::parse_engine(
                    self.language,
                    format!("invalid included range at index {}", e.0),
                )
            })?;

        let previous = if self.options.reuse_previous_tree {
            self.tree.as_ref()
        } else {
            None
        };
        let tree = self
            .parser
            .parse(source, previous)
            .ok_or_else(|| Error::parse_engine(self.language, "parser produced no tree"))?;

        debug!(
            language = %self.language,
            ranges = self.ranges.len(),
            has_error = tree.root_node().has_error(),
            "Parsed language tree"
        );
        self.tree = Some(tree);

        self.parse_injections(source)
    }

    fn parse_injections(&mut self, source: &[u8]) -> Result<()> {
        let query_source = self.registry.injection_query(self.language);
        if query_source.trim().is_empty() {
            self.children.clear();
            return Ok(());
        }

        let query = Query::new(&self.registry.grammar(self.language), query_source).map_err(
            |source| Error::QueryCompilation {
                language: self.language,
                source,
            },
        )?;

        let Some(root) = self.root_node() else {
            self.children.clear();
            return Ok(());
        };
        let injections = query_injections(&query, root, source);

        let mut children: Vec<Self> = Vec::new();
        for injection in injections {
            let pieces = clip_to_ranges(injection.range, &self.ranges);
            if pieces.is_empty() {
                trace!(
                    language = %injection.language,
                    start_byte = injection.range.start_byte,
                    "Injection lies outside included ranges"
                );
                continue;
            }

            if injection.combined {
                if let Some(child) = children
                    .iter_mut()
                    .find(|child| child.language == injection.language)
                {
                    child.ranges.extend(pieces);
                    continue;
                }
            }

            children.push(Self::with_registry(
                Arc::clone(&self.registry),
                self.options,
                injection.language,
                pieces,
                Vec::new(),
            )?);
        }

        trace!(
            language = %self.language,
            children = children.len(),
            "Rebuilt injected trees"
        );
        self.children = children;

        for child in &mut self.children {
            child.parse(source)?;
        }

        Ok(())
    }

    /// Every tree of `language` in the forest, depth first, this tree before
    /// its children.
    #[must_use]
    pub fn language_trees(&self, language: Language) -> Vec<&Self> {
        let mut results = Vec::new();
        self.collect(&mut results, &|tree| tree.language == language);
        results
    }

    /// Every tree of `language` whose parsed root intersects `range`, in the
    /// same order as [`language_trees`](Self::language_trees).
    ///
    /// Compares against the parsed root span rather than the included ranges,
    /// so a combined tree matches anything in the gaps between its regions.
    /// Used to find, for a node located in one grammar, the trees of another
    /// grammar lying over it.
    #[must_use]
    pub fn language_trees_with_range(&self, language: Language, range: &Range) -> Vec<&Self> {
        let mut results = Vec::new();
        self.collect(&mut results, &|tree| {
            tree.language == language
                && tree
                    .root_node()
                    .is_some_and(|root| ranges_intersect(&root.range(), range))
        });
        results
    }

    fn collect<'a, F>(&'a self, results: &mut Vec<&'a Self>, keep: &F)
    where
        F: Fn(&Self) -> bool,
    {
        if keep(self) {
            results.push(self);
        }
        for child in &self.children {
            child.collect(results, keep);
        }
    }

    /// Run `pattern` over every tree of `language` in the forest.
    ///
    /// Returns one [`Capture`] per requested capture per match. Trees are
    /// visited in [`language_trees`](Self::language_trees) order and matches
    /// in engine order; nothing is deduplicated.
    ///
    /// # Errors
    ///
    /// - [`Error::QueryCompilation`] if `pattern` does not compile
    /// - [`Error::UnknownCapture`] if a name in `capture_names` is not
    ///   defined by `pattern`; no matching is attempted
    pub fn find_captures(
        &self,
        language: Language,
        pattern: &str,
        source: &[u8],
        capture_names: &[&str],
    ) -> Result<Vec<Capture<'_>>> {
        let query = Query::new(&self.registry.grammar(language), pattern)
            .map_err(|source| Error::QueryCompilation { language, source })?;

        let mut wanted: Vec<(u32, &str)> = Vec::with_capacity(capture_names.len());
        for &name in capture_names {
            let index = query
                .capture_index_for_name(name)
                .ok_or_else(|| Error::UnknownCapture(name.to_string()))?;
            wanted.push((index, name));
        }

        let mut cursor = QueryCursor::new();
        let mut results = Vec::new();

        for tree in self.language_trees(language) {
            let Some(root) = tree.root_node() else {
                continue;
            };

            let mut matches = cursor.matches(&query, root, source);
            while let Some(m) = matches.next() {
                for capture in m.captures {
                    if let Some((_, name)) = wanted.iter().find(|(index, _)| *index == capture.index)
                    {
                        results.push(Capture {
                            name: (*name).to_string(),
                            node: capture.node,
                        });
                    }
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Point;

    fn parsed(language: Language, source: &str) -> LanguageTree {
        let mut tree = LanguageTree::new(language, Vec::new(), Vec::new()).expect("grammar loads");
        tree.parse(source.as_bytes()).expect("parse succeeds");
        tree
    }

    #[test]
    fn new_tree_is_unparsed() {
        let tree = LanguageTree::new(Language::Php, Vec::new(), Vec::new()).expect("grammar loads");

        assert!(tree.tree().is_none());
        assert!(tree.root_node().is_none());
        assert!(tree.children().is_empty());
        assert_eq!(tree.language(), Language::Php);
    }

    #[test]
    fn update_before_first_parse_is_harmless() {
        let mut tree = LanguageTree::new(Language::Html, Vec::new(), Vec::new()).expect("grammar loads");

        tree.update(&InputEdit {
            start_byte: 0,
            old_end_byte: 1,
            new_end_byte: 0,
            start_position: Point::new(0, 0),
            old_end_position: Point::new(0, 1),
            new_end_position: Point::new(0, 0),
        });

        assert!(tree.tree().is_none());
    }

    #[test]
    fn update_shifts_included_ranges() {
        let source = "<p>one</p>garbage<p>two</p>";
        let range = |start: usize, end: usize| Range {
            start_byte: start,
            end_byte: end,
            start_point: Point::new(0, start),
            end_point: Point::new(0, end),
        };
        let mut tree = LanguageTree::new(Language::Html, vec![range(0, 10), range(17, 27)], Vec::new())
            .expect("grammar loads");
        tree.parse(source.as_bytes()).expect("parse succeeds");

        tree.update(&InputEdit {
            start_byte: 0,
            old_end_byte: 0,
            new_end_byte: 4,
            start_position: Point::new(0, 0),
            old_end_position: Point::new(0, 0),
            new_end_position: Point::new(0, 4),
        });

        assert_eq!(tree.ranges(), [range(4, 14), range(21, 31)]);
        assert!(!tree.in_range(&range(0, 4)), "inserted text lies outside");
        assert!(tree.in_range(&range(12, 13)));
    }

    #[test]
    fn leaf_language_has_no_children() {
        let tree = parsed(Language::JavaScript, "let a = 1;");

        assert!(tree.children().is_empty());
        assert_eq!(tree.root_node().map(|n| n.kind()), Some("program"));
    }

    #[test]
    fn root_is_never_in_range() {
        let tree = parsed(Language::Php, "<p>x</p>");
        let root_range = tree.root_node().expect("parsed").range();

        assert!(!tree.in_range(&root_range));
        assert!(tree.children()[0].in_range(&root_range));
    }

    #[test]
    fn language_trees_includes_self_first() {
        let tree = parsed(Language::Html, "<script>a()</script><script>b()</script>");

        let html = tree.language_trees(Language::Html);
        let js = tree.language_trees(Language::JavaScript);

        assert_eq!(html.len(), 1);
        assert!(std::ptr::eq(html[0], &tree));
        assert_eq!(js.len(), 2);
        assert!(js[0].ranges()[0].start_byte < js[1].ranges()[0].start_byte);
    }

    #[test]
    fn debug_output_names_language() {
        let tree = parsed(Language::Css, "p { color: red; }");

        let debug = format!("{tree:?}");
        assert!(debug.contains("Css"));
        assert!(debug.contains("parsed: true"));
    }
}
