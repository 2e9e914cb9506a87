//! Line counts of the target statement and of the whole change.

use tether_attrib::AnalysisContext;
use tether_ir::Span;

use crate::classifier::saturating_i64;
use crate::{Classifier, MetricSink};

/// `srclocs`: lines spanned by the in-scope nodes of the target line.
/// `locDelta`: inserted minus deleted lines, each changed subtree counted
/// once at its topmost node.
pub struct LinesOfCode;

impl Classifier for LinesOfCode {
    fn name(&self) -> &'static str {
        "lines-of-code"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["srclocs", "locDelta"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let (old, new) = (cx.old_tree(), cx.new_tree());
        let changes = cx.changes();

        let statement = cx
            .line
            .coverage
            .nodes
            .iter()
            .copied()
            .filter(|&n| cx.old_in_scope(n))
            .map(|n| old.span(n))
            .reduce(Span::merge);
        sink.set_count(
            "srclocs",
            statement.map_or(0, |span| cx.old_index.lines_spanned(span)),
        );

        let deleted: usize = changes
            .deleted_old()
            .filter(|&n| !old.parent(n).is_some_and(|p| changes.is_deleted(p)))
            .filter(|&n| cx.old_in_scope(n))
            .map(|n| cx.old_index.lines_spanned(old.span(n)))
            .sum();
        let inserted: usize = changes
            .inserted_new()
            .filter(|&n| !new.parent(n).is_some_and(|p| changes.is_inserted(p)))
            .filter(|&n| cx.new_in_scope(n))
            .map(|n| cx.new_index.lines_spanned(new.span(n)))
            .sum();
        sink.set("locDelta", saturating_i64(inserted) - saturating_i64(deleted));
    }
}
