//! Exception handling added or removed.

use tether_attrib::AnalysisContext;

use super::{in_range_new, selected_old};
use crate::{Classifier, MetricSink};

pub struct TryCatch;

impl Classifier for TryCatch {
    fn name(&self) -> &'static str {
        "try-catch"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["InsertedTryCatch", "RemovedTryCatch"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let kinds = cx.kinds();
        let changes = cx.changes();
        let handlers = [kinds.try_stmt.as_str(), kinds.except_clause.as_str()];

        let inserted: usize = handlers
            .iter()
            .map(|kind| in_range_new(cx, changes.inserted_new(), kind).count())
            .sum();
        let removed: usize = handlers
            .iter()
            .map(|kind| selected_old(cx, changes.deleted_old(), kind).count())
            .sum();

        sink.set_count("InsertedTryCatch", inserted);
        sink.set_count("RemovedTryCatch", removed);
    }
}
