//! Line number ↔ byte offset table for one file version.

use crate::Span;

/// Pre-computed cumulative line offsets.
///
/// `offsets[i]` is the offset at which line `i + 1` begins. The last entry is
/// the total length as counted line by line. Every line contributes its
/// length plus one terminator byte, so a file without a trailing newline ends
/// one past its text, and CRLF files drift by one byte per line. Trees coming
/// from the same parser pipeline share that convention.
///
/// # Example
///
/// ```
/// use tether_ir::LineIndex;
///
/// let index = LineIndex::build("a = 1\nb = 2\n");
/// assert_eq!(index.total_lines(), 2);
/// assert_eq!(index.line_start(2), 6);
/// assert_eq!(index.line_end(2), 12);
/// assert_eq!(index.line_of_offset(7), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    offsets: Vec<u32>,
}

impl LineIndex {
    /// Build the table from file text. O(n) construction.
    pub fn build(text: &str) -> Self {
        let mut offsets = vec![0u32];
        let mut total = 0u32;
        for line in text.lines() {
            let len = u32::try_from(line.len()).unwrap_or(u32::MAX);
            total = total.saturating_add(len).saturating_add(1);
            offsets.push(total);
        }
        LineIndex { offsets }
    }

    /// Number of lines.
    #[inline]
    pub fn total_lines(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Offset at which 1-based `line` starts.
    ///
    /// Lines at or below zero map to 0; lines past the end clamp to the
    /// final offset.
    pub fn line_start(&self, line: i64) -> u32 {
        if line <= 0 {
            return 0;
        }
        self.clamped(line - 1)
    }

    /// Offset one past the end of 1-based `line`, terminator included.
    ///
    /// This is the start of the next line; lines past the end clamp to the
    /// final offset.
    pub fn line_end(&self, line: i64) -> u32 {
        self.clamped(line.max(0))
    }

    fn clamped(&self, index: i64) -> u32 {
        let Some(&last) = self.offsets.last() else {
            return 0;
        };
        usize::try_from(index)
            .ok()
            .and_then(|i| self.offsets.get(i))
            .copied()
            .unwrap_or(last)
    }

    /// 1-based line containing `offset`, by binary search.
    ///
    /// Offsets past the end belong to the last line.
    pub fn line_of_offset(&self, offset: u32) -> usize {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (line_idx + 1).min(self.total_lines().max(1))
    }

    /// Number of lines `span` touches; 0 for an empty span.
    pub fn lines_spanned(&self, span: Span) -> usize {
        if span.is_empty() {
            return 0;
        }
        self.line_of_offset(span.end - 1) - self.line_of_offset(span.start) + 1
    }
}
