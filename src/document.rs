//! Document representation - full text plus a line index for position mapping

use std::path::{Path, PathBuf};

/// A zero-based (line, character) position in a document
///
/// `character` counts Unicode scalar values from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a new range
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Check if this range contains a position
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if the range is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// An open text document
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// Associated file path (None for untitled documents)
    path: Option<PathBuf>,
    /// Language identifier (e.g. "rust", "python")
    language_id: String,
    /// Full document text
    text: String,
    /// Byte offset where each line starts
    line_starts: Vec<usize>,
}

impl TextDocument {
    /// Create an untitled document
    pub fn new(language_id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            path: None,
            language_id: language_id.into(),
            text,
            line_starts,
        }
    }

    /// Create a document from file contents
    pub fn from_file(path: &Path, language_id: impl Into<String>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut doc = Self::new(language_id, content);
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Get the file path if set
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the language identifier
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Get the full text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the full text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.line_starts = compute_line_starts(&self.text);
    }

    /// Number of lines (an empty document has one line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the text of a line without its line terminator
    pub fn line(&self, idx: usize) -> Option<&str> {
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.text.len());
        let line = &self.text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Map a byte offset to a position
    ///
    /// Offsets past the end clamp to the end of the document. Offsets inside
    /// a multi-byte character map to that character.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = floor_char_boundary(&self.text, offset.min(self.text.len()));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let character = self.text[self.line_starts[line]..offset].chars().count();
        Position::new(line, character)
    }

    /// Map a pair of byte offsets to a range
    pub fn range_at(&self, start: usize, end: usize) -> Range {
        Range::new(self.position_at(start), self.position_at(end))
    }
}

/// Byte offsets of every line start; always contains at least 0
fn compute_line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
        .collect()
}

/// Find the nearest valid UTF-8 char boundary at or before `pos`
fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut p = pos;
    while p > 0 && !text.is_char_boundary(p) {
        p -= 1;
    }
    p
}
