//! Repeated string literals pulled into named assignments.

use rustc_hash::FxHashSet;
use tether_attrib::AnalysisContext;
use tether_ir::{KindTable, NodeId, SyntaxTree};

use crate::{Classifier, MetricSink};

/// Counts inserted `name = "literal"` statements whose literal already
/// appears somewhere in the old file.
pub struct LiteralAssignmentRefactor;

/// The assigned string of a plain `name = "literal"` statement.
fn assigned_literal<'t>(
    tree: &'t SyntaxTree,
    node: NodeId,
    kinds: &KindTable,
) -> Option<&'t str> {
    if !tree.is_kind(node, &kinds.expr_stmt) {
        return None;
    }
    let &[target, op, value] = tree.children(node) else {
        return None;
    };
    let is_assign =
        tree.is_kind(op, &kinds.operator) && tree.label(op) == Some(kinds.assign.as_str());
    if tree.is_kind(target, &kinds.name) && is_assign && tree.is_kind(value, &kinds.string) {
        tree.label(value)
    } else {
        None
    }
}

impl Classifier for LiteralAssignmentRefactor {
    fn name(&self) -> &'static str {
        "literal-assignment"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["magicStringsReplaced"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let kinds = cx.kinds();
        let (old, new) = (cx.old_tree(), cx.new_tree());

        let known: FxHashSet<&str> = old
            .pre_order()
            .filter(|&n| old.is_kind(n, &kinds.string))
            .filter_map(|n| old.label(n))
            .collect();
        sink.count(
            "magicStringsReplaced",
            cx.changes().inserted_new().filter(|&n| {
                assigned_literal(new, n, kinds).is_some_and(|s| known.contains(s))
                    && cx.new_in_scope(n)
            }),
        );
    }
}
