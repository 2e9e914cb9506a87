//! Node correspondence between the old and the new tree.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{NodeId, SyntaxTree};

/// Errors raised while recording or validating a correspondence.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("old node {old} is already mapped to {existing}, cannot also map it to {new}")]
    OldAlreadyMapped {
        old: NodeId,
        new: NodeId,
        existing: NodeId,
    },
    #[error("new node {new} is already mapped from {existing}, cannot also map it from {old}")]
    NewAlreadyMapped {
        old: NodeId,
        new: NodeId,
        existing: NodeId,
    },
    #[error("mapping references old node {0} which is not in the old tree")]
    UnknownOld(NodeId),
    #[error("mapping references new node {0} which is not in the new tree")]
    UnknownNew(NodeId),
}

/// Partial one-to-one relation between old-tree and new-tree nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Correspondence {
    old_to_new: FxHashMap<NodeId, NodeId>,
    new_to_old: FxHashMap<NodeId, NodeId>,
}

impl Correspondence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old` and `new` are the same node.
    ///
    /// Re-inserting an existing pair is a no-op. Any pair that would make
    /// the relation many-to-one is rejected.
    pub fn insert(&mut self, old: NodeId, new: NodeId) -> Result<(), MappingError> {
        if let Some(&existing) = self.old_to_new.get(&old) {
            if existing == new {
                return Ok(());
            }
            return Err(MappingError::OldAlreadyMapped { old, new, existing });
        }
        if let Some(&existing) = self.new_to_old.get(&new) {
            return Err(MappingError::NewAlreadyMapped { old, new, existing });
        }
        self.old_to_new.insert(old, new);
        self.new_to_old.insert(new, old);
        Ok(())
    }

    /// Counterpart of an old-tree node.
    #[inline]
    pub fn new_for_old(&self, old: NodeId) -> Option<NodeId> {
        self.old_to_new.get(&old).copied()
    }

    /// Counterpart of a new-tree node.
    #[inline]
    pub fn old_for_new(&self, new: NodeId) -> Option<NodeId> {
        self.new_to_old.get(&new).copied()
    }

    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    /// All `(old, new)` pairs ordered by old id.
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self.old_to_new.iter().map(|(&o, &n)| (o, n)).collect();
        pairs.sort_unstable();
        pairs
    }

    /// Check that every mapped id belongs to its tree.
    pub fn validate(&self, old: &SyntaxTree, new: &SyntaxTree) -> Result<(), MappingError> {
        for (old_id, new_id) in self.pairs() {
            if !old.contains(old_id) {
                return Err(MappingError::UnknownOld(old_id));
            }
            if !new.contains(new_id) {
                return Err(MappingError::UnknownNew(new_id));
            }
        }
        Ok(())
    }
}
