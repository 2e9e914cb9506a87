use tether_attrib::AnalysisContext;

use super::in_range_new;
use crate::{Classifier, MetricSink};

/// Newly added `assert` statements.
pub struct AssertInsertion;

impl Classifier for AssertInsertion {
    fn name(&self) -> &'static str {
        "assert-insertion"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["InsertedAssertConditions"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let assert_stmt = cx.kinds().assert_stmt.as_str();
        sink.count(
            "InsertedAssertConditions",
            in_range_new(cx, cx.changes().inserted_new(), assert_stmt),
        );
    }
}
