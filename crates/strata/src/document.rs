//! Editor session for one open document.
//!
//! The forest never owns text; a [`Document`] does. It keeps the current
//! text and version, turns LSP content changes into tree-sitter edits, and
//! reparses once per batch of changes.
//!
//! LSP positions count UTF-16 code units; tree-sitter points count bytes.
//! The helpers in this module convert between the two.

use lsp_types::{Position, TextDocumentContentChangeEvent, TextDocumentItem, Uri};
use tracing::{debug, warn};
use tree_sitter::{InputEdit, Point};

use crate::error::{Error, Result};
use crate::tree::LanguageTree;
use crate::types::{Capture, Language};
use crate::visualize::visualize;

/// One open document and its language forest.
#[derive(Debug)]
pub struct Document {
    uri: Option<Uri>,
    version: i32,
    text: String,
    forest: LanguageTree,
}

impl Document {
    /// Open a document and parse it with the built-in registry.
    ///
    /// # Errors
    ///
    /// Returns any error from building or parsing the forest.
    pub fn open(language: Language, text: impl Into<String>, version: i32) -> Result<Self> {
        let forest = LanguageTree::new(language, Vec::new(), Vec::new())?;
        Self::with_forest(forest, text, version)
    }

    /// Open a document around an existing (usually unparsed) root tree.
    ///
    /// Lets callers choose the registry and options of the forest.
    ///
    /// # Errors
    ///
    /// Returns any error from parsing the forest.
    pub fn with_forest(forest: LanguageTree, text: impl Into<String>, version: i32) -> Result<Self> {
        let mut document = Self {
            uri: None,
            version,
            text: text.into(),
            forest,
        };
        document.reparse()?;
        Ok(document)
    }

    /// Open a document from an LSP `textDocument/didOpen` item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GrammarUnavailable`] if `language_id` names no linked
    /// grammar, or any error from parsing the forest.
    pub fn from_item(item: TextDocumentItem) -> Result<Self> {
        let language = item.language_id.parse::<Language>()?;
        let mut document = Self::open(language, item.text, item.version)?;
        document.uri = Some(item.uri);
        Ok(document)
    }

    /// Document URI, when opened from an LSP item.
    #[must_use]
    pub fn uri(&self) -> Option<&Uri> {
        self.uri.as_ref()
    }

    /// Version of the last applied change.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Root of the language forest.
    #[must_use]
    pub fn forest(&self) -> &LanguageTree {
        &self.forest
    }

    /// Apply an LSP `textDocument/didChange` batch, then reparse once.
    ///
    /// Changes apply in order; each change's range refers to the text left by
    /// the previous one. A change without a range replaces the whole text.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPosition`] if a change range lies outside the text.
    ///   Changes before it stay applied and the document is reparsed.
    /// - Any error from reparsing the forest.
    pub fn apply_changes(
        &mut self,
        version: i32,
        changes: &[TextDocumentContentChangeEvent],
    ) -> Result<()> {
        if version <= self.version {
            debug!(current = self.version, incoming = version, "Applying out-of-order version");
        }
        self.version = version;

        for change in changes {
            if let Err(e) = self.apply_change(change) {
                // Keep the trees consistent with whatever text we have.
                if let Err(parse_error) = self.reparse() {
                    debug!(error = %parse_error, "Reparse after rejected change failed");
                }
                return Err(e);
            }
        }

        self.reparse()
    }

    fn apply_change(&mut self, change: &TextDocumentContentChangeEvent) -> Result<()> {
        let (start, old_end) = match change.range {
            Some(range) => (
                byte_offset(&self.text, range.start)?,
                byte_offset(&self.text, range.end)?,
            ),
            None => (0, self.text.len()),
        };
        if old_end < start {
            return Err(Error::InvalidPosition {
                line: change.range.map_or(0, |r| r.end.line),
                character: change.range.map_or(0, |r| r.end.character),
            });
        }

        let edit = input_edit(&self.text, start, old_end, &change.text);
        self.text.replace_range(start..old_end, &change.text);
        self.forest.update(&edit);
        Ok(())
    }

    /// Reparse the forest against the current text.
    ///
    /// # Errors
    ///
    /// Returns the forest's parse error. Subtrees parsed before the failure
    /// are kept.
    pub fn reparse(&mut self) -> Result<()> {
        self.forest.parse(self.text.as_bytes()).inspect_err(|e| {
            warn!(
                uri = ?self.uri,
                version = self.version,
                error = %e,
                "Failed to parse document; keeping partial forest"
            );
        })
    }

    /// [`LanguageTree::find_captures`] over this document's text.
    ///
    /// # Errors
    ///
    /// See [`LanguageTree::find_captures`].
    pub fn find_captures(
        &self,
        language: Language,
        pattern: &str,
        capture_names: &[&str],
    ) -> Result<Vec<Capture<'_>>> {
        self.forest
            .find_captures(language, pattern, self.text.as_bytes(), capture_names)
    }

    /// Render the forest.
    #[must_use]
    pub fn visualize(&self) -> String {
        visualize(&self.forest)
    }
}

/// Byte offset of an LSP position in `text`.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. A column past the end of its
/// line clamps to the end of the line, as the LSP specification requires.
///
/// # Errors
///
/// Returns [`Error::InvalidPosition`] if the line does not exist.
pub fn byte_offset(text: &str, position: Position) -> Result<usize> {
    let invalid = || Error::InvalidPosition {
        line: position.line,
        character: position.character,
    };
    let bytes = text.as_bytes();
    let line_break = |from: usize| {
        bytes[from..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .map(|i| from + i)
    };

    let mut line_start = 0;
    for _ in 0..position.line {
        let at = line_break(line_start).ok_or_else(invalid)?;
        line_start = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
            at + 2
        } else {
            at + 1
        };
    }

    let line_end = line_break(line_start).unwrap_or(text.len());
    let line = &text[line_start..line_end];

    let mut units = 0;
    for (offset, ch) in line.char_indices() {
        if units >= position.character as usize {
            return Ok(line_start + offset);
        }
        units += ch.len_utf16();
    }
    Ok(line_end)
}

/// Tree-sitter point (row, byte column) of `byte` in `text`.
#[must_use]
pub fn point_at(text: &str, byte: usize) -> Point {
    let before = &text.as_bytes()[..byte.min(text.len())];
    let row = before.iter().filter(|&&b| b == b'\n').count();
    let column = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(before.len(), |newline| before.len() - newline - 1);
    Point::new(row, column)
}

/// Edit descriptor for replacing `text[start..old_end]` with `new_text`.
#[must_use]
pub fn input_edit(text: &str, start: usize, old_end: usize, new_text: &str) -> InputEdit {
    let start_position = point_at(text, start);
    let new_end_position = match new_text.rfind('\n') {
        Some(newline) => Point::new(
            start_position.row + new_text.matches('\n').count(),
            new_text.len() - newline - 1,
        ),
        None => Point::new(start_position.row, start_position.column + new_text.len()),
    };

    InputEdit {
        start_byte: start,
        old_end_byte: old_end,
        new_end_byte: start + new_text.len(),
        start_position,
        old_end_position: point_at(text, old_end),
        new_end_position,
    }
}
