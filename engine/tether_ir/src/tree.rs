//! Syntax tree arena.
//!
//! Trees are produced by an external parser and handed to the engine
//! read-only. Nodes live in one contiguous `Vec`, children are stored as
//! [`NodeId`] lists, and the parent link is a plain index, so there are no
//! ownership cycles between a node and its parent.
//!
//! Nodes are pushed in pre-order. This makes three queries cheap:
//!
//! - document order is id order;
//! - the subtree of `n` is the id range `n ..= last_descendant(n)`;
//! - "is `a` an ancestor of `b`" is a range check.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{NodeId, Span};

/// Child list; most syntax nodes have a handful of children.
pub type ChildList = SmallVec<[NodeId; 4]>;

/// One node of a [`SyntaxTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    kind: Box<str>,
    label: Option<Box<str>>,
    span: Span,
    parent: Option<NodeId>,
    children: ChildList,
    /// Last id of this node's subtree (itself when it is a leaf).
    last_descendant: NodeId,
}

impl Node {
    /// Grammar tag, e.g. `if_stmt`.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Literal text for leaves (identifiers, operators, literals).
    #[inline]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Errors raised while assembling a tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("tree is too large to index with 32-bit node ids")]
    TooLarge,
    #[error("node {node} has no parent but the tree already has a root")]
    SecondRoot { node: NodeId },
    #[error("node {node}: parent {parent} is not an open ancestor (nodes must arrive in pre-order)")]
    NotPreOrder { node: NodeId, parent: NodeId },
    #[error("node {node} has inverted span {span}")]
    InvertedSpan { node: NodeId, span: Span },
    #[error("node {node} span {span} escapes parent {parent} span {parent_span}")]
    ChildOutsideParent {
        node: NodeId,
        span: Span,
        parent: NodeId,
        parent_span: Span,
    },
    #[error("node {node} span {span} starts before previous sibling ends at {previous_end}")]
    SiblingOverlap {
        node: NodeId,
        span: Span,
        previous_end: u32,
    },
}

/// Read-only syntax tree for one version of a file.
///
/// The root is always `NodeId(0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// The root node.
    #[inline]
    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` was issued by this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Look up a node, returning `None` for ids issued by another tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node.
    ///
    /// Ids come from this tree, so a miss is a caller bug and panics like
    /// slice indexing does.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &str {
        self.node(id).kind()
    }

    #[inline]
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).label()
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Whether the node's kind equals `kind`.
    #[inline]
    pub fn is_kind(&self, id: NodeId, kind: &str) -> bool {
        self.kind(id) == kind
    }

    /// All node ids in document (pre-)order.
    pub fn pre_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter_map(NodeId::from_index)
    }

    /// `id` and all of its descendants, in document order.
    pub fn subtree(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let last = self.node(id).last_descendant;
        (id.raw()..=last.raw()).map(NodeId::new)
    }

    /// `id`, then its parent, and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Position of the child of `parent` whose span contains `span`.
    pub fn child_index_containing(&self, parent: NodeId, span: Span) -> Option<usize> {
        self.children(parent)
            .iter()
            .position(|&child| self.span(child).contains_span(span))
    }
}

/// Iterator returned by [`SyntaxTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Incremental tree construction from a pre-order node stream.
///
/// Each pushed node names its parent, which must be the most recently pushed
/// node still "open" on the current root-to-leaf path. Spans are validated as
/// they arrive: a child must lie inside its parent and after its previous
/// sibling.
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    /// Open root-to-current path.
    open: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TreeBuilder {
            nodes: Vec::with_capacity(capacity),
            open: Vec::new(),
        }
    }

    /// Append the next node in pre-order.
    pub fn push(
        &mut self,
        kind: &str,
        label: Option<&str>,
        span: Span,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let id = NodeId::from_index(self.nodes.len()).ok_or(TreeError::TooLarge)?;
        if span.start > span.end {
            return Err(TreeError::InvertedSpan { node: id, span });
        }

        match parent {
            None => {
                if !self.nodes.is_empty() {
                    return Err(TreeError::SecondRoot { node: id });
                }
            }
            Some(parent) => {
                while self.open.last().is_some_and(|&top| top != parent) {
                    self.open.pop();
                }
                if self.open.is_empty() {
                    return Err(TreeError::NotPreOrder { node: id, parent });
                }
                self.check_placement(id, span, parent)?;
                self.nodes[parent.index()].children.push(id);
            }
        }

        self.nodes.push(Node {
            kind: kind.into(),
            label: label.map(Into::into),
            span,
            parent,
            children: ChildList::new(),
            last_descendant: id,
        });
        self.open.push(id);
        Ok(id)
    }

    fn check_placement(&self, id: NodeId, span: Span, parent: NodeId) -> Result<(), TreeError> {
        let parent_node = &self.nodes[parent.index()];
        if !parent_node.span.contains_span(span) {
            return Err(TreeError::ChildOutsideParent {
                node: id,
                span,
                parent,
                parent_span: parent_node.span,
            });
        }
        if let Some(&previous) = parent_node.children.last() {
            let previous_end = self.nodes[previous.index()].span.end;
            if span.start < previous_end {
                return Err(TreeError::SiblingOverlap {
                    node: id,
                    span,
                    previous_end,
                });
            }
        }
        Ok(())
    }

    /// Finish the tree.
    pub fn build(mut self) -> Result<SyntaxTree, TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        // Children always have larger ids, so a reverse sweep sees every
        // child's subtree end before its parent's.
        for index in (0..self.nodes.len()).rev() {
            if let Some(&last_child) = self.nodes[index].children.last() {
                self.nodes[index].last_descendant = self.nodes[last_child.index()].last_descendant;
            }
        }
        Ok(SyntaxTree { nodes: self.nodes })
    }
}
