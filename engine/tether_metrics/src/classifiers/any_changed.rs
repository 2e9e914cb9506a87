//! Whether anything at all changed around the target line.

use tether_attrib::AnalysisContext;

use crate::{Classifier, MetricSink};

/// Totals of every change set after range and scope filtering.
///
/// Column names match existing result tables, hence the mixed casing.
pub struct AnyChanged;

impl Classifier for AnyChanged {
    fn name(&self) -> &'static str {
        "any-changed"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["anyInserted", "anyDeleted", "getMovedSrcs", "UpdatedSrcs"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let changes = cx.changes();
        sink.count(
            "anyInserted",
            changes.inserted_new().filter(|&n| cx.new_in_range(n)),
        );
        sink.count(
            "anyDeleted",
            changes.deleted_old().filter(|&n| cx.old_selected(n)),
        );
        sink.count(
            "getMovedSrcs",
            changes.moved_old().filter(|&n| cx.old_selected(n)),
        );
        sink.count(
            "UpdatedSrcs",
            changes.updated_old().filter(|&n| cx.old_selected(n)),
        );
    }
}
