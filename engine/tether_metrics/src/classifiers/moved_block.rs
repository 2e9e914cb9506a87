//! Conditions moved between branches of the same `if` statement.

use tether_attrib::AnalysisContext;
use tether_ir::{NodeId, Side, SyntaxTree};

use crate::{Classifier, MetricSink};

/// Counts, for every old `if` statement whose counterpart is also an `if`,
/// the counterpart's condition children that were moved there.
///
/// Looks at the whole file; an `if` is the unit of comparison, not the
/// target line.
pub struct MovedBlockInCondition;

/// Every condition must be followed by its block.
fn check_branches(tree: &SyntaxTree, node: NodeId, suite: &str) -> Result<(), String> {
    let mut awaiting_block = None;
    for &child in tree.children(node) {
        if tree.is_kind(child, suite) {
            awaiting_block = None;
        } else if let Some(condition) = awaiting_block {
            return Err(format!("condition {condition} is not followed by a block"));
        } else {
            awaiting_block = Some(child);
        }
    }
    match awaiting_block {
        Some(condition) => Err(format!("trailing condition {condition} has no block")),
        None => Ok(()),
    }
}

impl Classifier for MovedBlockInCondition {
    fn name(&self) -> &'static str {
        "moved-block-in-condition"
    }

    fn metrics(&self) -> &'static [&'static str] {
        &["MovedBlocksInIfConditions"]
    }

    fn compute(&self, cx: &AnalysisContext<'_>, sink: &mut MetricSink<'_>) {
        let kinds = cx.kinds();
        let (if_stmt, suite) = (kinds.if_stmt.as_str(), kinds.suite.as_str());
        let (old, new) = (cx.old_tree(), cx.new_tree());
        let changes = cx.changes();

        let mut moved = 0;
        for node in old.pre_order().filter(|&n| old.is_kind(n, if_stmt)) {
            if let Err(message) = check_branches(old, node, suite) {
                sink.fault(Side::Old, node, message);
                continue;
            }
            let Some(counterpart) = cx.mapping().new_for_old(node) else {
                continue;
            };
            if !new.is_kind(counterpart, if_stmt) {
                let message = format!("`{if_stmt}` mapped to `{}`", new.kind(counterpart));
                sink.fault(Side::New, counterpart, message);
                continue;
            }
            moved += new
                .children(counterpart)
                .iter()
                .filter(|&&c| !new.is_kind(c, suite) && changes.is_moved_new(c))
                .count();
        }
        sink.set_count("MovedBlocksInIfConditions", moved);
    }
}
