//! Tether IR - data model for diff-scoped change attribution
//!
//! This crate holds the read-only inputs of one analysis:
//! - Spans and node ids for syntax trees produced by an external parser
//! - `SyntaxTree` arena with pre-order ids and parent indices
//! - `Correspondence` between old-tree and new-tree nodes
//! - `ChangeSets` (deleted, inserted, updated, moved per side)
//! - `EditScript` with the ordered edit actions
//! - `LineIndex` for line/offset conversion
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: nodes refer to each other by `NodeId(u32)`,
//!   never by owning pointers
//! - **Immutable after build**: every type here is `Send + Sync` and is
//!   never mutated once an analysis starts
//! - **Two coordinate systems**: old-tree and new-tree spans are offsets into
//!   different texts and never mix

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod changes;
mod correspondence;
mod edit;
mod kinds;
mod line_index;
mod node_id;
mod span;
mod tree;

#[cfg(feature = "testing")]
pub mod testing;

pub use changes::{ChangeError, ChangeFlags, ChangeSets, Side};
pub use correspondence::{Correspondence, MappingError};
pub use edit::{EditAction, EditScript, InsertionPoint, ScriptError};
pub use kinds::KindTable;
pub use line_index::LineIndex;
pub use node_id::NodeId;
pub use span::Span;
pub use tree::{Ancestors, ChildList, Node, SyntaxTree, TreeBuilder, TreeError};
