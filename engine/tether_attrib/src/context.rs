//! Per-analysis state shared by every classifier.

use tether_ir::{
    ChangeSets, Correspondence, EditScript, KindTable, LineIndex, NodeId, Span, SyntaxTree,
};
use tracing::debug;

use crate::insertion::{locate, Attribution, AttributionTable, LocatorInput};
use crate::range::{Coverage, LineSpan, RangeWindow};
use crate::scope::ScopeContext;
use crate::{AnalysisConfig, AnalysisError};

/// One file version: its tree and the text the spans index into.
#[derive(Copy, Clone)]
pub struct Version<'a> {
    pub tree: &'a SyntaxTree,
    pub text: &'a str,
}

/// Everything the diff engine produced for one file pair.
#[derive(Copy, Clone)]
pub struct AnalysisInput<'a> {
    pub old: Version<'a>,
    pub new: Version<'a>,
    pub mapping: &'a Correspondence,
    pub changes: &'a ChangeSets,
    pub script: &'a EditScript,
}

impl AnalysisInput<'_> {
    /// Check that every id in the mapping, change sets and script belongs
    /// to the tree it claims.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let (old, new) = (self.old.tree, self.new.tree);
        self.mapping.validate(old, new)?;
        if !self.changes.fits(old, new) {
            return Err(AnalysisError::ChangeSetsMismatch {
                old_nodes: old.len(),
                new_nodes: new.len(),
            });
        }
        self.script.validate(old, new)?;
        Ok(())
    }
}

/// Resolved windows, scope and attributions for one target line.
///
/// Built once, then only read.
pub struct AnalysisContext<'a> {
    pub input: AnalysisInput<'a>,
    pub config: &'a AnalysisConfig,
    pub target_line: i64,
    pub old_index: LineIndex,
    pub new_index: LineIndex,
    pub window: RangeWindow,
    pub line: LineSpan,
    pub scope: ScopeContext,
    pub attributions: AttributionTable,
}

impl<'a> AnalysisContext<'a> {
    #[tracing::instrument(level = "debug", skip(input, config))]
    pub fn build(
        input: AnalysisInput<'a>,
        target_line: i64,
        config: &'a AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        input.validate()?;

        let old = input.old.tree;
        let old_index = LineIndex::build(input.old.text);
        let new_index = LineIndex::build(input.new.text);
        let window = RangeWindow::resolve(old, &old_index, target_line, config.tolerance);
        let line = LineSpan::resolve(old, &old_index, target_line);
        let scope = ScopeContext::resolve(old, &line, &window, &config.kinds);
        let attributions = locate(&LocatorInput {
            old,
            new: input.new.tree,
            mapping: input.mapping,
            changes: input.changes,
            script: input.script,
            coverage: &window.coverage,
            ignore_range: config.ignore_range,
        });
        debug!(attributed = attributions.len(), "analysis context ready");

        Ok(AnalysisContext {
            input,
            config,
            target_line,
            old_index,
            new_index,
            window,
            line,
            scope,
            attributions,
        })
    }

    #[inline]
    pub fn old_tree(&self) -> &'a SyntaxTree {
        self.input.old.tree
    }

    #[inline]
    pub fn new_tree(&self) -> &'a SyntaxTree {
        self.input.new.tree
    }

    #[inline]
    pub fn changes(&self) -> &'a ChangeSets {
        self.input.changes
    }

    #[inline]
    pub fn mapping(&self) -> &'a Correspondence {
        self.input.mapping
    }

    #[inline]
    pub fn script(&self) -> &'a EditScript {
        self.input.script
    }

    #[inline]
    pub fn kinds(&self) -> &'a KindTable {
        &self.config.kinds
    }

    // Range predicates

    /// Old node lies within the extended window's node bounds.
    pub fn old_in_range(&self, node: NodeId) -> bool {
        self.config.ignore_range || self.window.coverage.holds(self.old_tree().span(node))
    }

    /// Old node lies entirely before or after the extended window.
    pub fn old_outside_range(&self, node: NodeId) -> bool {
        !self.config.ignore_range && self.window.coverage.excludes(self.old_tree().span(node))
    }

    /// The first mapped node at or above `node` in the new tree has its
    /// counterpart inside the extended window.
    pub fn new_in_range(&self, node: NodeId) -> bool {
        self.config.ignore_range || self.mapped_ancestor_held_by(node, &self.window.coverage)
    }

    /// Old node lies within the target line's node bounds.
    pub fn old_in_line(&self, node: NodeId) -> bool {
        self.config.ignore_range || self.line.coverage.holds(self.old_tree().span(node))
    }

    pub fn old_outside_line(&self, node: NodeId) -> bool {
        !self.config.ignore_range && self.line.coverage.excludes(self.old_tree().span(node))
    }

    pub fn new_in_line(&self, node: NodeId) -> bool {
        self.config.ignore_range || self.mapped_ancestor_held_by(node, &self.line.coverage)
    }

    fn mapped_ancestor_held_by(&self, node: NodeId, coverage: &Coverage) -> bool {
        let mapping = self.mapping();
        self.new_tree()
            .ancestors(node)
            .find_map(|n| mapping.old_for_new(n))
            .is_some_and(|old| coverage.holds(self.old_tree().span(old)))
    }

    // Scope predicates

    fn admits(&self, span: Span) -> bool {
        !self.config.scope_filter || self.scope.admits(self.old_tree(), span, self.config.containment)
    }

    /// Old node falls in the target line's scope.
    pub fn old_in_scope(&self, node: NodeId) -> bool {
        self.admits(self.old_tree().span(node))
    }

    /// New node falls in the target line's scope, judged by the old-tree
    /// parent it was attributed to. Untraced nodes are only in scope when
    /// there is no scope to leave.
    pub fn new_in_scope(&self, node: NodeId) -> bool {
        if !self.config.scope_filter || self.scope.scope.is_none() {
            return true;
        }
        self.attributions
            .reconstructed(node)
            .is_some_and(|a| self.admits(self.old_tree().span(a.parent)))
    }

    /// Old node passes both the range and the scope filter.
    pub fn old_selected(&self, node: NodeId) -> bool {
        self.old_in_range(node) && self.old_in_scope(node)
    }

    /// In-range attribution of an inserted node whose parent is in scope.
    pub fn attributed(&self, node: NodeId) -> Option<Attribution> {
        self.attributions
            .get(node)
            .filter(|a| self.admits(self.old_tree().span(a.parent)))
    }
}
