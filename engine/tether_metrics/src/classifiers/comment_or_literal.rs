//! Edited string literals, docstrings included.

use tether_attrib::AnalysisContext;

use super::{in_range_new, selected_old};
use crate::{Classifier, MetricSink};

pub struct CommentOrLiteral;

impl Classifier for CommentOrLiteral {
    fn name(&self) -> &'static str {
        "comment-or-literal"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["AddedOrUpdatedComments"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let string = cx.kinds().string.as_str();
        let changes = cx.changes();
        let updated = selected_old(cx, changes.updated_old(), string).count();
        let inserted = in_range_new(cx, changes.inserted_new(), string).count();
        sink.set_count("AddedOrUpdatedComments", updated + inserted);
    }
}
