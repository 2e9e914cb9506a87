//! Running a registry against one target line.

use tether_attrib::{
    AnalysisConfig, AnalysisContext, AnalysisError, AnalysisInput, LineSpan, RangeDegradation,
    RangeWindow, ScopeContext,
};
use tracing::debug;

use crate::{ClassifierFault, MetricSink, Metrics, Registry};

/// Metrics and diagnostics for one target line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisReport {
    pub target_line: i64,
    pub metrics: Metrics,
    pub window: RangeWindow,
    pub line: LineSpan,
    pub scope: ScopeContext,
    pub faults: Vec<ClassifierFault>,
}

impl AnalysisReport {
    /// Set when the target line fell outside the file.
    pub fn degradation(&self) -> Option<RangeDegradation> {
        self.window.degradation
    }
}

/// Validate `input`, resolve the context for `target_line` and run every
/// classifier in `registry`.
#[tracing::instrument(level = "debug", skip(registry, input, config))]
pub fn analyze(
    registry: &Registry,
    input: AnalysisInput<'_>,
    target_line: i64,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let cx = AnalysisContext::build(input, target_line, config)?;
    Ok(run(registry, &cx))
}

/// Run every classifier against an already built context.
pub fn run(registry: &Registry, cx: &AnalysisContext<'_>) -> AnalysisReport {
    let mut metrics = Metrics::zeroed(registry.columns());
    let mut faults = Vec::new();

    for classifier in registry.classifiers() {
        let _span = tracing::debug_span!("classifier", name = classifier.name()).entered();
        let mut sink = MetricSink::new(classifier.name(), &mut metrics, &mut faults);
        classifier.compute(cx, &mut sink);
    }
    debug!(faults = faults.len(), "classifiers done");

    AnalysisReport {
        target_line: cx.target_line,
        metrics,
        window: cx.window.clone(),
        line: cx.line.clone(),
        scope: cx.scope,
        faults,
    }
}
