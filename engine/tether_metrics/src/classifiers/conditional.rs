//! Inserted and deleted `if` statements.

use tether_attrib::AnalysisContext;

use super::selected_old;
use crate::{Classifier, MetricSink};

pub struct Conditional;

impl Classifier for Conditional {
    fn name(&self) -> &'static str {
        "conditional"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["insertedIfConditions", "deletedIfStmts"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let if_stmt = cx.kinds().if_stmt.as_str();
        let new = cx.new_tree();
        sink.count(
            "insertedIfConditions",
            cx.changes()
                .inserted_new()
                .filter(|&n| new.is_kind(n, if_stmt) && cx.attributed(n).is_some()),
        );
        sink.count(
            "deletedIfStmts",
            selected_old(cx, cx.changes().deleted_old(), if_stmt),
        );
    }
}
