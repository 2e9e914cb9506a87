//! Per-analysis configuration.

use tether_ir::KindTable;

/// Lines of context around the target line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tolerance {
    pub before: u32,
    pub after: u32,
}

impl Tolerance {
    /// Same number of lines on both sides.
    pub const fn symmetric(lines: u32) -> Self {
        Tolerance {
            before: lines,
            after: lines,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::symmetric(10)
    }
}

/// How a candidate span is tested against the anchor's enclosing scope.
///
/// Metric tables produced by earlier tooling used the `Legacy` check.
/// Reproducing them requires selecting it explicitly (`--legacy-scope` in
/// the CLI); results under the default differ wherever a candidate sits
/// strictly inside its function.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScopeContainment {
    /// Candidate lies fully inside the scope.
    #[default]
    Contained,
    /// Candidate starts at or after the scope start and ends at or after the
    /// scope end. Required to reproduce historical metric tables.
    Legacy,
}

/// Knobs for one analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub tolerance: Tolerance,
    /// Restrict metrics to the scope enclosing the target line.
    pub scope_filter: bool,
    /// Treat every node as in range.
    pub ignore_range: bool,
    pub containment: ScopeContainment,
    pub kinds: KindTable,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            tolerance: Tolerance::default(),
            scope_filter: true,
            ignore_range: false,
            containment: ScopeContainment::default(),
            kinds: KindTable::default(),
        }
    }
}
