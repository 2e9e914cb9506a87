//! Scope Resolver: the function-like construct enclosing the target line.

use tether_ir::{KindTable, NodeId, Span, SyntaxTree};
use tracing::debug;

use crate::range::{LineSpan, RangeWindow};
use crate::ScopeContainment;

/// Nearest node at or above `node` whose kind is a scope kind.
pub fn enclosing_scope(tree: &SyntaxTree, node: NodeId, kinds: &KindTable) -> Option<NodeId> {
    tree.ancestors(node).find(|&id| kinds.is_scope(tree.kind(id)))
}

/// Scope of the target line in the old tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeContext {
    /// Node the scope was resolved from.
    pub anchor: Option<NodeId>,
    /// Enclosing scope of the anchor, if any.
    pub scope: Option<NodeId>,
}

impl ScopeContext {
    /// Anchor on the first node of the target line. When the line has no
    /// nodes, fall back to the first window node containing the window
    /// start.
    pub fn resolve(
        tree: &SyntaxTree,
        line: &LineSpan,
        window: &RangeWindow,
        kinds: &KindTable,
    ) -> Self {
        let anchor = line.coverage.nodes.first().copied().or_else(|| {
            let start = window.offsets.start;
            window.coverage.nodes.iter().copied().find(|&id| {
                let span = tree.span(id);
                span.start <= start && start < span.end
            })
        });
        let scope = anchor.and_then(|a| enclosing_scope(tree, a, kinds));
        debug!(?anchor, ?scope, "resolved scope");
        ScopeContext { anchor, scope }
    }

    /// Whether an old-coordinate `span` falls in the scope. Everything is in
    /// scope when no enclosing scope was found.
    pub fn admits(&self, tree: &SyntaxTree, span: Span, containment: ScopeContainment) -> bool {
        let Some(scope) = self.scope else {
            return true;
        };
        let bounds = tree.span(scope);
        match containment {
            ScopeContainment::Contained => bounds.contains_span(span),
            ScopeContainment::Legacy => bounds.start <= span.start && bounds.end <= span.end,
        }
    }
}

#[cfg(test)]
mod tests;
