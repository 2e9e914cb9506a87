use tether_attrib::AnalysisContext;

use super::in_range_new;
use crate::{Classifier, MetricSink};

/// Literal values whose text changed.
pub struct ValueAssignment;

impl Classifier for ValueAssignment {
    fn name(&self) -> &'static str {
        "value-assignment"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["UpdatedValueAssignments"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let kinds = cx.kinds();
        let changes = cx.changes();
        let total: usize = [kinds.string.as_str(), kinds.number.as_str()]
            .iter()
            .map(|kind| in_range_new(cx, changes.updated_new(), kind).count())
            .sum();
        sink.set_count("UpdatedValueAssignments", total);
    }
}
