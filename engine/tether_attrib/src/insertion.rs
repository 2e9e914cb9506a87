//! Insertion Locator: where inserted nodes would sit in the old tree.
//!
//! Every `Insert`/`TreeInsert` names a target parent in the new tree. When
//! that parent has an old counterpart the attribution is direct. Otherwise
//! the locator climbs the new tree to the first mapped ancestor and, if that
//! ancestor's counterpart lies in the extended window, attributes the
//! insertion to it at the index of the child that contains the inserted node.
//!
//! Inserted nodes without their own action inherit the attribution of the
//! tightest primarily attributed node whose span contains theirs.

use rustc_hash::FxHashMap;
use tether_ir::{ChangeSets, Correspondence, EditScript, InsertionPoint, NodeId, SyntaxTree};
use tracing::{debug, trace};

use crate::range::Coverage;

/// Reconstructed old-tree position of an inserted node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribution {
    /// Old-tree node the insertion lands under.
    pub parent: NodeId,
    pub child_index: usize,
    /// Old-tree offset of the insertion point.
    pub offset: u32,
    /// New-tree node whose edit action produced this attribution.
    pub anchor: NodeId,
}

/// Lookup result for one new-tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttributionStatus {
    /// Reconstructed inside the window bounds.
    Attributed(Attribution),
    /// Reconstructed, but the offset falls outside the window bounds.
    OutOfRange(Attribution),
    /// Not an inserted node, or no mapped ancestor could be found.
    Untraced,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Entry {
    attribution: Attribution,
    in_range: bool,
}

/// Inserted new-tree node → reconstructed old-tree position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributionTable {
    entries: FxHashMap<NodeId, Entry>,
}

impl AttributionTable {
    /// In-range attribution of `node`; absent when untraced or out of range.
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<Attribution> {
        self.entries
            .get(&node)
            .filter(|e| e.in_range)
            .map(|e| e.attribution)
    }

    /// Attribution of `node` regardless of range.
    #[inline]
    pub fn reconstructed(&self, node: NodeId) -> Option<Attribution> {
        self.entries.get(&node).map(|e| e.attribution)
    }

    pub fn status(&self, node: NodeId) -> AttributionStatus {
        match self.entries.get(&node) {
            Some(e) if e.in_range => AttributionStatus::Attributed(e.attribution),
            Some(e) => AttributionStatus::OutOfRange(e.attribution),
            None => AttributionStatus::Untraced,
        }
    }

    /// Number of reconstructed nodes, in range or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Offset at which child `index` of `parent` starts.
///
/// `parent.start` for a childless parent, the end of the last child when
/// `index` is past the end.
pub fn child_insertion_offset(tree: &SyntaxTree, parent: NodeId, index: usize) -> u32 {
    let children = tree.children(parent);
    match children.get(index) {
        Some(&child) => tree.span(child).start,
        None => children
            .last()
            .map_or(tree.span(parent).start, |&last| tree.span(last).end),
    }
}

/// Inputs the locator reads.
pub struct LocatorInput<'a> {
    pub old: &'a SyntaxTree,
    pub new: &'a SyntaxTree,
    pub mapping: &'a Correspondence,
    pub changes: &'a ChangeSets,
    pub script: &'a EditScript,
    /// Extended-window coverage in the old tree.
    pub coverage: &'a Coverage,
    /// Accept every attribution regardless of offset.
    pub ignore_range: bool,
}

/// Build the attribution table for one analysis.
#[tracing::instrument(level = "debug", skip_all, fields(actions = input.script.len()))]
pub fn locate(input: &LocatorInput<'_>) -> AttributionTable {
    let mut entries = FxHashMap::default();

    for (node, at) in input.script.insertions() {
        match primary(input, node, at) {
            Some(attribution) => {
                let in_range =
                    input.ignore_range || input.coverage.accepts_offset(attribution.offset);
                trace!(%node, ?attribution, in_range, "attributed insertion");
                entries.insert(
                    node,
                    Entry {
                        attribution,
                        in_range,
                    },
                );
            }
            None => trace!(%node, parent = %at.parent, "attribution gap"),
        }
    }

    let primaries = entries.len();
    propagate(input, &mut entries);
    debug!(
        primaries,
        propagated = entries.len() - primaries,
        "built attribution table"
    );
    AttributionTable { entries }
}

fn primary(input: &LocatorInput<'_>, node: NodeId, at: InsertionPoint) -> Option<Attribution> {
    let (old, new) = (input.old, input.new);

    if let Some(parent) = input.mapping.old_for_new(at.parent) {
        return Some(Attribution {
            parent,
            child_index: at.index,
            offset: child_insertion_offset(old, parent, at.index),
            anchor: node,
        });
    }

    // The target parent is itself new; climb to the first mapped ancestor.
    let (ancestor, counterpart) = new
        .ancestors(at.parent)
        .skip(1)
        .find_map(|a| input.mapping.old_for_new(a).map(|o| (a, o)))?;
    if !input.ignore_range && !input.coverage.holds(old.span(counterpart)) {
        return None;
    }
    let child_index = new.child_index_containing(ancestor, new.span(node))?;
    Some(Attribution {
        parent: counterpart,
        child_index,
        offset: child_insertion_offset(old, counterpart, child_index),
        anchor: node,
    })
}

/// Give unattributed inserted nodes the attribution of the tightest
/// attributed node whose span contains theirs.
fn propagate(input: &LocatorInput<'_>, entries: &mut FxHashMap<NodeId, Entry>) {
    let new = input.new;
    let mut roots: Vec<(NodeId, Entry)> = entries.iter().map(|(&n, &e)| (n, e)).collect();
    roots.sort_unstable_by_key(|&(n, _)| n);

    for node in input.changes.inserted_new() {
        if entries.contains_key(&node) {
            continue;
        }
        let span = new.span(node);
        let tightest = roots
            .iter()
            .filter(|(root, _)| new.span(*root).contains_span(span))
            .min_by_key(|(root, _)| (new.span(*root).len(), std::cmp::Reverse(*root)));
        if let Some(&(_, entry)) = tightest {
            entries.insert(node, entry);
        }
    }
}
