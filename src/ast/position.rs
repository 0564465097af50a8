//! Source coordinates attached to every AST node.

use std::{fmt, sync::Arc};

use pest::iterators::Pair;
use serde::{Deserialize, Serialize};

use crate::syntax::Rule;

/// Where a construct begins in the source text.
///
/// `line` is 1-based, `column` is 0-based and counted in characters, and
/// `offset` is the byte offset of the first token. `source_name` is `None`
/// for in-memory snippets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub source_name: Option<Arc<str>>,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// Position of the first token consumed by a rule match.
    pub fn from_pair(
        pair: &Pair<'_, Rule>,
        lines: &LineIndex,
        source_name: Option<&Arc<str>>,
    ) -> Self {
        let span = pair.as_span();
        Self::locate(span.get_input(), lines, span.start(), source_name)
    }

    /// Position of a byte offset within `source`.
    ///
    /// Builds a throwaway [`LineIndex`]; callers resolving many offsets in
    /// the same text should keep one and use [`Position::locate`].
    pub fn at_offset(source: &str, offset: usize, source_name: Option<&Arc<str>>) -> Self {
        Self::locate(source, &LineIndex::new(source), offset, source_name)
    }

    /// Position of a byte offset, resolved through a prebuilt index.
    ///
    /// Offsets past the end clamp to the end of input, which is where the
    /// parser reports an unexpected end of file.
    pub fn locate(
        source: &str,
        lines: &LineIndex,
        offset: usize,
        source_name: Option<&Arc<str>>,
    ) -> Self {
        let offset = floor_char_boundary(source, offset);
        let (line, column) = lines.line_col(source, offset);
        Self {
            source_name: source_name.cloned(),
            line,
            column,
            offset,
        }
    }

    /// The name shown in reports; unnamed sources print as `<unknown>`.
    pub fn display_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or("<unknown>")
    }
}

/// Byte offsets where each line of a source text begins.
///
/// Built once per text so every lookup is a binary search plus a scan of
/// the current line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(at, _)| at + 1));
        Self { starts }
    }

    /// 1-based line and 0-based character column of a byte offset.
    pub fn line_col(&self, source: &str, offset: usize) -> (usize, usize) {
        let offset = floor_char_boundary(source, offset);
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line - 1];
        (line, source[start..offset].chars().count())
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut clamped = offset.min(source.len());
    while !source.is_char_boundary(clamped) {
        clamped -= 1;
    }
    clamped
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.display_name(), self.line, self.column)
    }
}
