//! Per-node change classification produced by the diff engine.

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

use crate::{NodeId, SyntaxTree};

bitflags! {
    /// Change categories a single node can belong to.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        /// Old-tree node with no counterpart.
        const DELETED = 1 << 0;
        /// New-tree node with no counterpart.
        const INSERTED = 1 << 1;
        /// Mapped node whose label changed.
        const UPDATED = 1 << 2;
        /// Mapped node whose parent or position changed.
        const MOVED = 1 << 3;
    }
}

/// Which file version a node id refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("{side} node {node} is not in the {side} tree")]
    UnknownNode { side: Side, node: NodeId },
    #[error("{flags:?} cannot be recorded on the {side} side (node {node})")]
    WrongSide {
        side: Side,
        node: NodeId,
        flags: ChangeFlags,
    },
}

/// Classification sets for both trees: DeletedOld, InsertedNew,
/// UpdatedOld/New and MovedOld/New.
///
/// One flag byte per node and side. Iterators yield ids in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeSets {
    old: Vec<ChangeFlags>,
    new: Vec<ChangeFlags>,
}

impl ChangeSets {
    /// Empty sets sized for the two trees.
    pub fn new(old: &SyntaxTree, new: &SyntaxTree) -> Self {
        ChangeSets {
            old: vec![ChangeFlags::empty(); old.len()],
            new: vec![ChangeFlags::empty(); new.len()],
        }
    }

    /// Add `flags` to a node.
    ///
    /// `DELETED` is only valid on the old side and `INSERTED` only on the
    /// new side.
    pub fn mark(&mut self, side: Side, node: NodeId, flags: ChangeFlags) -> Result<(), ChangeError> {
        let forbidden = match side {
            Side::Old => ChangeFlags::INSERTED,
            Side::New => ChangeFlags::DELETED,
        };
        if flags.intersects(forbidden) {
            return Err(ChangeError::WrongSide { side, node, flags });
        }
        let slot = match side {
            Side::Old => self.old.get_mut(node.index()),
            Side::New => self.new.get_mut(node.index()),
        }
        .ok_or(ChangeError::UnknownNode { side, node })?;
        *slot |= flags;
        Ok(())
    }

    /// Flags of an old-tree node (empty for unknown ids).
    #[inline]
    pub fn old_flags(&self, node: NodeId) -> ChangeFlags {
        self.old.get(node.index()).copied().unwrap_or_default()
    }

    /// Flags of a new-tree node (empty for unknown ids).
    #[inline]
    pub fn new_flags(&self, node: NodeId) -> ChangeFlags {
        self.new.get(node.index()).copied().unwrap_or_default()
    }

    pub fn is_deleted(&self, old: NodeId) -> bool {
        self.old_flags(old).contains(ChangeFlags::DELETED)
    }

    pub fn is_inserted(&self, new: NodeId) -> bool {
        self.new_flags(new).contains(ChangeFlags::INSERTED)
    }

    pub fn is_moved_old(&self, old: NodeId) -> bool {
        self.old_flags(old).contains(ChangeFlags::MOVED)
    }

    pub fn is_moved_new(&self, new: NodeId) -> bool {
        self.new_flags(new).contains(ChangeFlags::MOVED)
    }

    pub fn is_updated_old(&self, old: NodeId) -> bool {
        self.old_flags(old).contains(ChangeFlags::UPDATED)
    }

    pub fn is_updated_new(&self, new: NodeId) -> bool {
        self.new_flags(new).contains(ChangeFlags::UPDATED)
    }

    pub fn deleted_old(&self) -> impl Iterator<Item = NodeId> + '_ {
        with_flag(&self.old, ChangeFlags::DELETED)
    }

    pub fn inserted_new(&self) -> impl Iterator<Item = NodeId> + '_ {
        with_flag(&self.new, ChangeFlags::INSERTED)
    }

    pub fn updated_old(&self) -> impl Iterator<Item = NodeId> + '_ {
        with_flag(&self.old, ChangeFlags::UPDATED)
    }

    pub fn updated_new(&self) -> impl Iterator<Item = NodeId> + '_ {
        with_flag(&self.new, ChangeFlags::UPDATED)
    }

    pub fn moved_old(&self) -> impl Iterator<Item = NodeId> + '_ {
        with_flag(&self.old, ChangeFlags::MOVED)
    }

    pub fn moved_new(&self) -> impl Iterator<Item = NodeId> + '_ {
        with_flag(&self.new, ChangeFlags::MOVED)
    }

    /// Whether the sets were sized for these trees.
    pub fn fits(&self, old: &SyntaxTree, new: &SyntaxTree) -> bool {
        self.old.len() == old.len() && self.new.len() == new.len()
    }
}

fn with_flag(flags: &[ChangeFlags], flag: ChangeFlags) -> impl Iterator<Item = NodeId> + '_ {
    flags
        .iter()
        .enumerate()
        .filter(move |(_, f)| f.contains(flag))
        .filter_map(|(i, _)| NodeId::from_index(i))
}
