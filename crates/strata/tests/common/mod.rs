//! Shared helpers for forest integration tests.

#![allow(dead_code)]

use strata::tree_sitter::{InputEdit, Point, Range};
use strata::{Language, LanguageTree, ParseOptions, Registry};

/// Parse `source` into a fresh forest rooted at `language`.
pub fn parse(language: Language, source: &str) -> LanguageTree {
    parse_with(ParseOptions::default(), language, source)
}

/// Parse `source` into a fresh forest with explicit options.
pub fn parse_with(options: ParseOptions, language: Language, source: &str) -> LanguageTree {
    let mut forest =
        LanguageTree::with_registry(Registry::builtin(), options, language, Vec::new(), Vec::new())
            .expect("grammar should load");
    forest
        .parse(source.as_bytes())
        .expect("parse should succeed");
    forest
}

/// S-expression of a tree's root node.
pub fn sexp(tree: &LanguageTree) -> String {
    tree.root_node()
        .expect("tree should be parsed")
        .to_sexp()
}

/// Text covered by `range`.
pub fn slice<'a>(source: &'a str, range: &Range) -> &'a str {
    &source[range.start_byte..range.end_byte]
}

/// Tree-sitter point of `byte` in `text`.
pub fn point(text: &str, byte: usize) -> Point {
    strata::point_at(text, byte)
}

/// Edit descriptor deleting `text[start..end]`.
pub fn deletion(text: &str, start: usize, end: usize) -> InputEdit {
    strata::input_edit(text, start, end, "")
}

/// Returns `true` if `inner` lies inside `outer`.
pub fn contains(outer: &Range, inner: &Range) -> bool {
    outer.start_byte <= inner.start_byte && inner.end_byte <= outer.end_byte
}

/// Returns `true` if two ranges share a byte.
pub fn overlaps(a: &Range, b: &Range) -> bool {
    a.start_byte < b.end_byte && b.start_byte < a.end_byte
}

/// Check containment (every child range inside a parent range) and sibling
/// non-overlap for the whole forest.
pub fn assert_forest_invariants(tree: &LanguageTree, source_len: usize) {
    for range in tree.ranges() {
        assert!(range.start_byte < range.end_byte, "empty included range {range:?}");
        assert!(range.end_byte <= source_len, "range {range:?} past end of buffer");
    }
    for pair in tree.ranges().windows(2) {
        assert!(
            pair[0].end_byte <= pair[1].start_byte,
            "{} ranges out of order: {pair:?}",
            tree.language()
        );
    }

    for child in tree.children() {
        for range in child.ranges() {
            let contained = tree.ranges().is_empty()
                || tree.ranges().iter().any(|parent| contains(parent, range));
            assert!(
                contained,
                "{} range {range:?} escapes parent {} ranges {:?}",
                child.language(),
                tree.language(),
                tree.ranges()
            );
        }
    }

    for (i, a) in tree.children().iter().enumerate() {
        for b in &tree.children()[i + 1..] {
            for ra in a.ranges() {
                for rb in b.ranges() {
                    assert!(
                        !overlaps(ra, rb),
                        "sibling {} {ra:?} overlaps {} {rb:?}",
                        a.language(),
                        b.language()
                    );
                }
            }
        }
    }

    for child in tree.children() {
        assert_forest_invariants(child, source_len);
    }
}

/// Assert two forests have the same shape, ranges and trees.
pub fn assert_same_forest(actual: &LanguageTree, expected: &LanguageTree) {
    assert_eq!(actual.language(), expected.language());
    assert_eq!(actual.ranges(), expected.ranges(), "{} ranges differ", actual.language());
    assert_eq!(sexp(actual), sexp(expected), "{} trees differ", actual.language());
    assert_eq!(
        actual.root_node().map(|n| n.byte_range()),
        expected.root_node().map(|n| n.byte_range()),
        "{} root spans differ",
        actual.language()
    );
    assert_eq!(
        actual.children().len(),
        expected.children().len(),
        "{} child counts differ",
        actual.language()
    );
    for (a, e) in actual.children().iter().zip(expected.children()) {
        assert_same_forest(a, e);
    }
}
