//! What happened to the target line itself.

use tether_attrib::AnalysisContext;
use tether_ir::NodeId;

use crate::{Classifier, MetricSink};

/// Changes to nodes lying entirely on the target line, plus insertions
/// landing on it.
///
/// `AnythingMovedIntoLine` counts every moved old node inside the line's
/// offsets, without the coverage walk `AnythingInLineMoved` goes through.
pub struct LineLevel;

impl Classifier for LineLevel {
    fn name(&self) -> &'static str {
        "line-level"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &[
            "AnythingInLineDeleted",
            "AnythingInLineUpdated",
            "AnythingInLineMoved",
            "AnythingInsertedIntoLine",
            "AnythingMovedIntoLine",
            "EntireLineDeleted",
            "EntireLineMoved",
        ]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let line = &cx.line;
        let old = cx.old_tree();
        let changes = cx.changes();

        // Nodes wholly inside the line sit in the subtrees of its covering
        // nodes.
        let in_line: Vec<NodeId> = line
            .coverage
            .nodes
            .iter()
            .flat_map(|&n| old.subtree(n))
            .filter(|&n| line.encloses(old.span(n)))
            .collect();

        let deleted = in_line.iter().filter(|&&n| changes.is_deleted(n)).count();
        sink.set_count("AnythingInLineDeleted", deleted);
        sink.count(
            "AnythingInLineUpdated",
            in_line.iter().copied().filter(|&n| changes.is_updated_old(n)),
        );
        sink.count(
            "AnythingInLineMoved",
            in_line.iter().copied().filter(|&n| changes.is_moved_old(n)),
        );

        sink.count(
            "AnythingInsertedIntoLine",
            changes.inserted_new().filter(|&n| {
                cx.attributions
                    .get(n)
                    .is_some_and(|a| line.offsets.contains(a.offset))
            }),
        );

        sink.count(
            "AnythingMovedIntoLine",
            changes
                .moved_old()
                .filter(|&n| line.offsets.contains_span(old.span(n))),
        );

        let survivor = in_line.iter().any(|&n| !changes.is_deleted(n));
        sink.flag("EntireLineDeleted", deleted > 0 && !survivor);
        sink.flag(
            "EntireLineMoved",
            !line.offsets.is_empty()
                && changes
                    .moved_old()
                    .any(|n| old.span(n).contains_span(line.offsets)),
        );
    }
}
