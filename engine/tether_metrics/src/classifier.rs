//! The classifier interface.

use std::fmt;

use tether_attrib::AnalysisContext;
use tether_ir::{NodeId, Side};
use tracing::warn;

use crate::Metrics;

/// An independent unit turning an analysis context into named counts.
///
/// Classifiers hold no state; everything they need is on the context.
pub trait Classifier: Send + Sync {
    /// Name used in logs and fault records.
    fn name(&self) -> &'static str;

    /// Metrics this classifier writes, in output column order.
    fn metrics(&self) -> &'static [&'static str];

    /// Compute every declared metric for one target line.
    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>);
}

/// A node a classifier could not interpret and skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierFault {
    pub classifier: &'static str,
    pub side: Side,
    pub node: NodeId,
    pub message: String,
}

impl fmt::Display for ClassifierFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} node {}: {}",
            self.classifier, self.side, self.node, self.message
        )
    }
}

/// Where one classifier writes its results.
pub struct MetricSink<'r> {
    classifier: &'static str,
    metrics: &'r mut Metrics,
    faults: &'r mut Vec<ClassifierFault>,
}

impl<'r> MetricSink<'r> {
    pub fn new(
        classifier: &'static str,
        metrics: &'r mut Metrics,
        faults: &'r mut Vec<ClassifierFault>,
    ) -> Self {
        MetricSink {
            classifier,
            metrics,
            faults,
        }
    }

    /// Overwrite `metric`.
    pub fn set(&mut self, metric: &'static str, value: i64) {
        if !self.metrics.set(metric, value) {
            warn!(classifier = self.classifier, metric, "write to undeclared metric ignored");
        }
    }

    /// Set `metric` to the number of items in `nodes`.
    pub fn count(&mut self, metric: &'static str, nodes: impl Iterator<Item = NodeId>) {
        self.set_count(metric, nodes.count());
    }

    pub fn set_count(&mut self, metric: &'static str, n: usize) {
        self.set(metric, saturating_i64(n));
    }

    /// Set a 0/1 flag metric.
    pub fn flag(&mut self, metric: &'static str, on: bool) {
        self.set(metric, i64::from(on));
    }

    /// Log and record a skipped node.
    pub fn fault(&mut self, side: Side, node: NodeId, message: impl Into<String>) {
        let message = message.into();
        warn!(classifier = self.classifier, %side, %node, "{message}");
        self.faults.push(ClassifierFault {
            classifier: self.classifier,
            side,
            node,
            message,
        });
    }
}

/// Clamp a count into the metric value range.
pub(crate) fn saturating_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
