//! Function parameters added or removed.

use tether_attrib::AnalysisContext;

use super::{in_range_new, selected_old};
use crate::{Classifier, MetricSink};

pub struct ArgumentChange;

impl Classifier for ArgumentChange {
    fn name(&self) -> &'static str {
        "argument-change"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["UpdatedFuncArguments"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let param = cx.kinds().param.as_str();
        let changes = cx.changes();
        let removed = selected_old(cx, changes.deleted_old(), param).count();
        let added = in_range_new(cx, changes.inserted_new(), param).count();
        sink.set_count("UpdatedFuncArguments", removed + added);
    }
}
