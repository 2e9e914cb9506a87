//! Range Resolver: target line → offset window → covering nodes.
//!
//! The extended window spans `before + after` lines starting `before` lines
//! above the target, clamped to the file. The covering sequence is the
//! minimal ordered set of old-tree nodes touching the window:
//!
//! - a node fully inside the window is taken whole;
//! - a node straddling an edge is split into its children, and only taken
//!   itself when none of its children touch the window;
//! - a node disjoint from the window is skipped.
//!
//! Overlap is half-open, so a node starting exactly at the window end is
//! outside. The result is ordered, non-overlapping, and never holds both a
//! node and one of its descendants.

use tether_ir::{LineIndex, NodeId, Span, SyntaxTree};
use tracing::{debug, warn};

use crate::stack::ensure_sufficient_stack;
use crate::Tolerance;

/// Covering nodes of a window and the bounds they span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub nodes: Vec<NodeId>,
    /// `[first.start, last.end)`, or the raw window when no node touches it.
    pub bounds: Span,
}

impl Coverage {
    /// Minimal covering sequence for `window`.
    pub fn compute(tree: &SyntaxTree, window: Span) -> Self {
        let mut nodes = Vec::new();
        cover(tree, tree.root(), window, &mut nodes);
        let bounds = match (nodes.first(), nodes.last()) {
            (Some(&first), Some(&last)) => Span::new(tree.span(first).start, tree.span(last).end),
            _ => window,
        };
        Coverage { nodes, bounds }
    }

    /// `span` lies within the bounds (both ends inclusive).
    #[inline]
    pub fn holds(&self, span: Span) -> bool {
        self.bounds.start <= span.start && span.end <= self.bounds.end
    }

    /// `span` ends at or before the start, or starts at or after the end.
    #[inline]
    pub fn excludes(&self, span: Span) -> bool {
        span.end <= self.bounds.start || span.start >= self.bounds.end
    }

    /// `offset` lies within the bounds (both ends inclusive).
    #[inline]
    pub fn accepts_offset(&self, offset: u32) -> bool {
        self.bounds.start <= offset && offset <= self.bounds.end
    }
}

/// Returns whether anything under `id` was selected.
fn cover(tree: &SyntaxTree, id: NodeId, window: Span, out: &mut Vec<NodeId>) -> bool {
    let span = tree.span(id);
    if window.contains_span(span) && span.start < window.end {
        out.push(id);
        return true;
    }
    if !span.overlaps(window) {
        return false;
    }
    ensure_sufficient_stack(|| {
        let mut selected = false;
        for &child in tree.children(id) {
            selected |= cover(tree, child, window, out);
        }
        if !selected {
            out.push(id);
        }
        true
    })
}

/// Record of a target line that could not be resolved normally.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RangeDegradation {
    pub requested_line: i64,
    pub total_lines: usize,
}

/// The extended window around the target line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeWindow {
    pub start_line: i64,
    pub end_line: i64,
    /// `[start_offset, end_offset)` of the extended window.
    pub offsets: Span,
    pub coverage: Coverage,
    /// Set when the target line was outside `[1, total_lines]` and the
    /// window fell back to the whole file.
    pub degradation: Option<RangeDegradation>,
}

impl RangeWindow {
    /// Resolve the window for `target_line` in the old tree.
    #[tracing::instrument(level = "debug", skip(tree, index))]
    pub fn resolve(
        tree: &SyntaxTree,
        index: &LineIndex,
        target_line: i64,
        tolerance: Tolerance,
    ) -> Self {
        let total = i64::try_from(index.total_lines()).unwrap_or(i64::MAX);

        let (start_line, end_line, degradation) = if (1..=total).contains(&target_line) {
            let start = (target_line - i64::from(tolerance.before)).max(0);
            let span = i64::from(tolerance.before) + i64::from(tolerance.after);
            (start, (start + span).min(total), None)
        } else {
            warn!(
                target_line,
                total_lines = total,
                "target line outside the file; using a file-wide window"
            );
            let degradation = RangeDegradation {
                requested_line: target_line,
                total_lines: index.total_lines(),
            };
            (0, total, Some(degradation))
        };

        let offsets = Span::new(index.line_start(start_line), index.line_end(end_line));
        let coverage = Coverage::compute(tree, offsets);
        debug!(
            start_line,
            end_line,
            %offsets,
            nodes = coverage.nodes.len(),
            bounds = %coverage.bounds,
            "resolved extended window"
        );

        RangeWindow {
            start_line,
            end_line,
            offsets,
            coverage,
            degradation,
        }
    }
}

/// The target line's own window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSpan {
    pub line: i64,
    /// `[line_start, line_end)`; empty for lines outside the file.
    pub offsets: Span,
    pub coverage: Coverage,
}

impl LineSpan {
    pub fn resolve(tree: &SyntaxTree, index: &LineIndex, line: i64) -> Self {
        let offsets = Span::new(index.line_start(line), index.line_end(line));
        let coverage = Coverage::compute(tree, offsets);
        LineSpan {
            line,
            offsets,
            coverage,
        }
    }

    /// `span` lies inside the line's character range.
    #[inline]
    pub fn encloses(&self, span: Span) -> bool {
        self.offsets.contains_span(span)
    }
}
