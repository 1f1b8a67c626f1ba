//! Shared tree-sitter utilities.
//!
//! Range arithmetic and node helpers used by injection discovery, forest
//! traversal and the visualizer. All ranges are in root buffer coordinates.

use tree_sitter::{InputEdit, Node, Point, Range};

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8 or lies
/// outside `content`.
pub fn node_text<'a>(node: &Node<'_>, content: &'a [u8]) -> Option<&'a str> {
    let bytes = content.get(node.byte_range())?;
    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}

/// Returns `true` if `offset` falls inside the half-open byte span of `range`.
pub fn contains_offset(range: &Range, offset: usize) -> bool {
    range.start_byte <= offset && offset < range.end_byte
}

/// Returns `true` if two ranges share at least one byte.
///
/// An empty range intersects a range that contains its offset, so
/// zero-width nodes (missing tokens) still locate their surroundings.
pub fn ranges_intersect(a: &Range, b: &Range) -> bool {
    if a.start_byte == a.end_byte {
        return contains_offset(b, a.start_byte);
    }
    if b.start_byte == b.end_byte {
        return contains_offset(a, b.start_byte);
    }
    a.start_byte < b.end_byte && b.start_byte < a.end_byte
}

/// Intersect `range` with each of `bounds`, dropping empty pieces.
///
/// An empty `bounds` slice means "whole buffer" and leaves `range` untouched.
/// The pieces keep the order of `bounds`.
pub fn clip_to_ranges(range: Range, bounds: &[Range]) -> Vec<Range> {
    if bounds.is_empty() {
        return if range.start_byte < range.end_byte {
            vec![range]
        } else {
            Vec::new()
        };
    }

    bounds
        .iter()
        .filter_map(|bound| {
            let (start_byte, start_point) = if bound.start_byte > range.start_byte {
                (bound.start_byte, bound.start_point)
            } else {
                (range.start_byte, range.start_point)
            };
            let (end_byte, end_point) = if bound.end_byte < range.end_byte {
                (bound.end_byte, bound.end_point)
            } else {
                (range.end_byte, range.end_point)
            };

            (start_byte < end_byte).then_some(Range {
                start_byte,
                end_byte,
                start_point,
                end_point,
            })
        })
        .collect()
}

/// Shift `range` for an edit, the way tree-sitter shifts a tree's included
/// ranges.
///
/// Ends at or past the edit move with the text after it; ends inside the
/// deleted span collapse onto the edit start. Starts follow the same rule.
pub fn edit_range(range: &mut Range, edit: &InputEdit) {
    if range.end_byte >= edit.old_end_byte {
        range.end_byte = edit.new_end_byte + (range.end_byte - edit.old_end_byte);
        range.end_point = shift_point(range.end_point, edit);
    } else if range.end_byte > edit.start_byte {
        range.end_byte = edit.start_byte;
        range.end_point = edit.start_position;
    }

    if range.start_byte >= edit.old_end_byte {
        range.start_byte = edit.new_end_byte + (range.start_byte - edit.old_end_byte);
        range.start_point = shift_point(range.start_point, edit);
    } else if range.start_byte > edit.start_byte {
        range.start_byte = edit.start_byte;
        range.start_point = edit.start_position;
    }
}

/// Move a point at or after `edit.old_end_position` to the same offset from
/// `edit.new_end_position`.
fn shift_point(point: Point, edit: &InputEdit) -> Point {
    let old_end = edit.old_end_position;
    let new_end = edit.new_end_position;
    if point.row > old_end.row {
        Point::new(point.row - old_end.row + new_end.row, point.column)
    } else {
        Point::new(
            new_end.row,
            new_end.column + point.column.saturating_sub(old_end.column),
        )
    }
}

/// One-line description of a node: kind and point span.
pub fn format_node(node: &Node<'_>) -> String {
    let start = node.start_position();
    let end = node.end_position();
    format!(
        "{} [{}, {}] - [{}, {}]",
        node.kind(),
        start.row,
        start.column,
        end.row,
        end.column
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn range(start: usize, end: usize) -> Range {
        Range {
            start_byte: start,
            end_byte: end,
            start_point: Point::new(0, start),
            end_point: Point::new(0, end),
        }
    }

    #[rstest]
    #[case::overlap(range(0, 5), range(3, 8), true)]
    #[case::nested(range(0, 10), range(3, 4), true)]
    #[case::adjacent(range(0, 5), range(5, 8), false)]
    #[case::disjoint(range(0, 2), range(6, 8), false)]
    #[case::empty_inside(range(4, 4), range(3, 8), true)]
    #[case::empty_at_end(range(8, 8), range(3, 8), false)]
    #[case::empty_at_start(range(3, 3), range(3, 8), true)]
    fn intersection_is_half_open(#[case] a: Range, #[case] b: Range, #[case] expected: bool) {
        assert_eq!(ranges_intersect(&a, &b), expected);
        assert_eq!(ranges_intersect(&b, &a), expected);
    }

    #[test]
    fn clip_without_bounds_keeps_range() {
        assert_eq!(clip_to_ranges(range(2, 9), &[]), vec![range(2, 9)]);
    }

    #[test]
    fn clip_without_bounds_drops_empty_range() {
        assert!(clip_to_ranges(range(4, 4), &[]).is_empty());
    }

    #[test]
    fn clip_splits_across_gaps() {
        let bounds = [range(0, 5), range(10, 15), range(20, 25)];

        let pieces = clip_to_ranges(range(3, 12), &bounds);

        assert_eq!(pieces, vec![range(3, 5), range(10, 12)]);
    }

    #[test]
    fn clip_outside_bounds_is_empty() {
        let bounds = [range(0, 5), range(10, 15)];

        assert!(clip_to_ranges(range(5, 10), &bounds).is_empty());
    }

    #[test]
    fn clip_takes_points_from_the_limiting_side() {
        let bound = Range {
            start_byte: 6,
            end_byte: 20,
            start_point: Point::new(1, 0),
            end_point: Point::new(2, 3),
        };
        let inner = Range {
            start_byte: 2,
            end_byte: 9,
            start_point: Point::new(0, 2),
            end_point: Point::new(1, 3),
        };

        let pieces = clip_to_ranges(inner, &[bound]);

        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].start_point, Point::new(1, 0));
        assert_eq!(pieces[0].end_point, Point::new(1, 3));
    }

    /// Single-line edit replacing `start..old_end` with `new_len` bytes.
    fn edit(start: usize, old_end: usize, new_len: usize) -> InputEdit {
        InputEdit {
            start_byte: start,
            old_end_byte: old_end,
            new_end_byte: start + new_len,
            start_position: Point::new(0, start),
            old_end_position: Point::new(0, old_end),
            new_end_position: Point::new(0, start + new_len),
        }
    }

    #[rstest]
    #[case::before_range(edit(0, 0, 4), range(4, 14))]
    #[case::after_range(edit(20, 22, 0), range(0, 10))]
    #[case::at_range_end(edit(10, 10, 3), range(0, 13))]
    #[case::inside_range(edit(2, 5, 1), range(0, 8))]
    #[case::covers_range_start(edit(0, 5, 0), range(0, 5))]
    #[case::covers_range_end(edit(8, 12, 0), range(0, 8))]
    fn edit_range_follows_the_text(#[case] change: InputEdit, #[case] expected: Range) {
        let mut shifted = range(0, 10);

        edit_range(&mut shifted, &change);

        assert_eq!(shifted, expected);
    }

    #[test]
    fn edit_range_shifts_rows_after_multiline_insert() {
        let mut shifted = Range {
            start_byte: 10,
            end_byte: 20,
            start_point: Point::new(1, 2),
            end_point: Point::new(2, 4),
        };
        // Insert "a\nbc" at byte 3 of line 0.
        let change = InputEdit {
            start_byte: 3,
            old_end_byte: 3,
            new_end_byte: 7,
            start_position: Point::new(0, 3),
            old_end_position: Point::new(0, 3),
            new_end_position: Point::new(1, 2),
        };

        edit_range(&mut shifted, &change);

        assert_eq!(shifted.start_byte, 14);
        assert_eq!(shifted.end_byte, 24);
        assert_eq!(shifted.start_point, Point::new(2, 2));
        assert_eq!(shifted.end_point, Point::new(3, 4));
    }
}
