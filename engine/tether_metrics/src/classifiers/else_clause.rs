//! Branch blocks of `if` statements.
//!
//! A block counts on its own: when an `else` branch changes, the enclosing
//! `if` is usually flagged too, and counting it would count the change
//! twice.

use tether_attrib::AnalysisContext;
use tether_ir::{NodeId, SyntaxTree};

use super::selected_old;
use crate::{Classifier, MetricSink};

pub struct ElseClause;

/// `node` is a suite directly under an `if` statement.
fn is_branch(tree: &SyntaxTree, node: NodeId, suite: &str, if_stmt: &str) -> bool {
    tree.is_kind(node, suite)
        && tree
            .parent(node)
            .is_some_and(|parent| tree.is_kind(parent, if_stmt))
}

impl Classifier for ElseClause {
    fn name(&self) -> &'static str {
        "else-clause"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["elseInserted", "elseDeleted", "elseUpdated"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let kinds = cx.kinds();
        let (suite, if_stmt) = (kinds.suite.as_str(), kinds.if_stmt.as_str());
        let (old, new) = (cx.old_tree(), cx.new_tree());
        let changes = cx.changes();

        sink.count(
            "elseInserted",
            changes.inserted_new().filter(|&n| {
                is_branch(new, n, suite, if_stmt) && cx.attributed(n).is_some()
            }),
        );
        sink.count(
            "elseDeleted",
            selected_old(cx, changes.deleted_old(), suite)
                .filter(|&n| is_branch(old, n, suite, if_stmt)),
        );
        sink.count(
            "elseUpdated",
            selected_old(cx, changes.updated_old(), suite)
                .filter(|&n| is_branch(old, n, suite, if_stmt)),
        );
    }
}
