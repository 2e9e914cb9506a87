//! Edit script produced by the diff engine.

use thiserror::Error;

use crate::{NodeId, Side, SyntaxTree};

/// Where an inserted or moved node lands in the new tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InsertionPoint {
    /// Target parent, a new-tree node.
    pub parent: NodeId,
    /// Position among the parent's children.
    pub index: usize,
}

/// One edit action.
///
/// Node ids name the tree noted on each field. `Insert` and `TreeInsert`
/// differ only in whether the diff engine inserted a leaf or a whole subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// `node` (new tree) inserted under `at`.
    Insert { node: NodeId, at: InsertionPoint },
    /// Subtree rooted at `node` (new tree) inserted under `at`.
    TreeInsert { node: NodeId, at: InsertionPoint },
    /// `node` (old tree) moved under `at`.
    Move { node: NodeId, at: InsertionPoint },
    /// `node` (old tree) relabelled.
    Update { node: NodeId, label: Box<str> },
    /// `node` (old tree) removed.
    Delete { node: NodeId },
}

impl EditAction {
    /// Short action name, as used in case files and logs.
    pub fn name(&self) -> &'static str {
        match self {
            EditAction::Insert { .. } => "insert",
            EditAction::TreeInsert { .. } => "tree-insert",
            EditAction::Move { .. } => "move",
            EditAction::Update { .. } => "update",
            EditAction::Delete { .. } => "delete",
        }
    }

    /// The inserted new-tree node and its insertion point, for
    /// `Insert`/`TreeInsert` only.
    pub fn insertion(&self) -> Option<(NodeId, InsertionPoint)> {
        match *self {
            EditAction::Insert { node, at } | EditAction::TreeInsert { node, at } => Some((node, at)),
            _ => None,
        }
    }

    fn check(&self, old: &SyntaxTree, new: &SyntaxTree) -> Result<(), (Side, NodeId)> {
        let need = |side: Side, id: NodeId| {
            let tree = match side {
                Side::Old => old,
                Side::New => new,
            };
            if tree.contains(id) {
                Ok(())
            } else {
                Err((side, id))
            }
        };
        match self {
            EditAction::Insert { node, at } | EditAction::TreeInsert { node, at } => {
                need(Side::New, *node)?;
                need(Side::New, at.parent)
            }
            EditAction::Move { node, at } => {
                need(Side::Old, *node)?;
                need(Side::New, at.parent)
            }
            EditAction::Update { node, .. } | EditAction::Delete { node } => need(Side::Old, *node),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("edit action {index} ({action}) references {side} node {node} which is not in the {side} tree")]
pub struct ScriptError {
    pub index: usize,
    pub action: &'static str,
    pub side: Side,
    pub node: NodeId,
}

/// Ordered list of edit actions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditScript {
    actions: Vec<EditAction>,
}

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: EditAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[EditAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// `(inserted node, insertion point)` for every `Insert`/`TreeInsert`,
    /// in script order.
    pub fn insertions(&self) -> impl Iterator<Item = (NodeId, InsertionPoint)> + '_ {
        self.actions.iter().filter_map(EditAction::insertion)
    }

    /// `(moved old node, insertion point)` for every `Move`, in script order.
    pub fn moves(&self) -> impl Iterator<Item = (NodeId, InsertionPoint)> + '_ {
        self.actions.iter().filter_map(|action| match *action {
            EditAction::Move { node, at } => Some((node, at)),
            _ => None,
        })
    }

    /// Check that every referenced id belongs to the tree it names.
    pub fn validate(&self, old: &SyntaxTree, new: &SyntaxTree) -> Result<(), ScriptError> {
        for (index, action) in self.actions.iter().enumerate() {
            action.check(old, new).map_err(|(side, node)| ScriptError {
                index,
                action: action.name(),
                side,
                node,
            })?;
        }
        Ok(())
    }
}

impl FromIterator<EditAction> for EditScript {
    fn from_iter<I: IntoIterator<Item = EditAction>>(iter: I) -> Self {
        EditScript {
            actions: iter.into_iter().collect(),
        }
    }
}
