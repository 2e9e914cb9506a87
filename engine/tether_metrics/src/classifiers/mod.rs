//! Built-in classifiers.
//!
//! Filters used throughout:
//!
//! - old-tree nodes count when they are in range and in scope
//!   ([`AnalysisContext::old_selected`])
//! - inserted nodes count when their nearest mapped ancestor is in range
//!   ([`AnalysisContext::new_in_range`]), or, for block-level insertions,
//!   when they have an in-range, in-scope attribution
//!   ([`AnalysisContext::attributed`])

use tether_attrib::AnalysisContext;
use tether_ir::NodeId;

mod any_changed;
mod argument_change;
mod assert_insertion;
mod comment_or_literal;
mod conditional;
mod else_clause;
mod line_level;
mod lines_of_code;
mod literal_assignment;
mod moved_block;
mod try_catch;
mod value_assignment;

pub use any_changed::AnyChanged;
pub use argument_change::ArgumentChange;
pub use assert_insertion::AssertInsertion;
pub use comment_or_literal::CommentOrLiteral;
pub use conditional::Conditional;
pub use else_clause::ElseClause;
pub use line_level::LineLevel;
pub use lines_of_code::LinesOfCode;
pub use literal_assignment::LiteralAssignmentRefactor;
pub use moved_block::MovedBlockInCondition;
pub use try_catch::TryCatch;
pub use value_assignment::ValueAssignment;

/// Old-tree nodes of `kind` that pass the range and scope filters.
fn selected_old<'a>(
    cx: &'a AnalysisContext<'a>,
    nodes: impl Iterator<Item = NodeId> + 'a,
    kind: &'a str,
) -> impl Iterator<Item = NodeId> + 'a {
    let tree = cx.old_tree();
    nodes.filter(move |&n| tree.is_kind(n, kind) && cx.old_selected(n))
}

/// New-tree nodes of `kind` whose nearest mapped ancestor is in range.
fn in_range_new<'a>(
    cx: &'a AnalysisContext<'a>,
    nodes: impl Iterator<Item = NodeId> + 'a,
    kind: &'a str,
) -> impl Iterator<Item = NodeId> + 'a {
    let tree = cx.new_tree();
    nodes.filter(move |&n| tree.is_kind(n, kind) && cx.new_in_range(n))
}

#[cfg(test)]
mod tests;
