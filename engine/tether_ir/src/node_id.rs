//! Node identifiers for the syntax tree arena.

use std::fmt;

/// Index into a [`SyntaxTree`](crate::SyntaxTree) arena.
///
/// Ids are dense and assigned in pre-order, so ascending id order is document
/// order and a node's descendants occupy the ids directly after it.
/// An id is only meaningful for the tree that issued it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Create a `NodeId` from an arena position.
    ///
    /// Returns `None` if the index does not fit in 32 bits.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(NodeId)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::NodeId;
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(Option<NodeId>, 8);
}
