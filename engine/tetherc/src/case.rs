//! JSON case files: one serialized diff result per file pair.
//!
//! Node lists are in pre-order, so a node's position is its id. Every id in
//! `mappings`, `changes` and `actions` refers to those positions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tether_attrib::{AnalysisInput, Version};
use tether_ir::{
    ChangeError, ChangeFlags, ChangeSets, Correspondence, EditAction, EditScript, InsertionPoint,
    MappingError, NodeId, Side, Span, SyntaxTree, TreeBuilder, TreeError,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("cannot read case {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed case file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {side} tree: {source}")]
    Tree { side: Side, source: TreeError },
    #[error("invalid mapping: {0}")]
    Mapping(#[from] MappingError),
    #[error("invalid change sets: {0}")]
    Change(#[from] ChangeError),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseFile {
    old: SideFile,
    new: SideFile,
    #[serde(default)]
    mappings: Vec<(u32, u32)>,
    #[serde(default)]
    changes: ChangeFile,
    #[serde(default)]
    actions: Vec<ActionFile>,
}

#[derive(Deserialize)]
struct SideFile {
    text: String,
    nodes: Vec<NodeFile>,
}

#[derive(Deserialize)]
struct NodeFile {
    kind: String,
    #[serde(default)]
    label: Option<String>,
    start: u32,
    end: u32,
    #[serde(default)]
    parent: Option<u32>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ChangeFile {
    deleted: Vec<u32>,
    inserted: Vec<u32>,
    updated_old: Vec<u32>,
    updated_new: Vec<u32>,
    moved_old: Vec<u32>,
    moved_new: Vec<u32>,
}

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
enum ActionFile {
    Insert { node: u32, parent: u32, index: usize },
    TreeInsert { node: u32, parent: u32, index: usize },
    Move { node: u32, parent: u32, index: usize },
    Update { node: u32, label: String },
    Delete { node: u32 },
}

impl From<ActionFile> for EditAction {
    fn from(action: ActionFile) -> Self {
        let at = |parent, index| InsertionPoint {
            parent: NodeId::new(parent),
            index,
        };
        match action {
            ActionFile::Insert {
                node,
                parent,
                index,
            } => EditAction::Insert {
                node: NodeId::new(node),
                at: at(parent, index),
            },
            ActionFile::TreeInsert {
                node,
                parent,
                index,
            } => EditAction::TreeInsert {
                node: NodeId::new(node),
                at: at(parent, index),
            },
            ActionFile::Move {
                node,
                parent,
                index,
            } => EditAction::Move {
                node: NodeId::new(node),
                at: at(parent, index),
            },
            ActionFile::Update { node, label } => EditAction::Update {
                node: NodeId::new(node),
                label: label.into_boxed_str(),
            },
            ActionFile::Delete { node } => EditAction::Delete {
                node: NodeId::new(node),
            },
        }
    }
}

/// One loaded file version.
pub struct CaseSide {
    pub text: String,
    pub tree: SyntaxTree,
}

impl CaseSide {
    fn build(side: Side, file: SideFile) -> Result<Self, CaseError> {
        let tree_error = |source| CaseError::Tree { side, source };
        let mut builder = TreeBuilder::with_capacity(file.nodes.len());
        for node in &file.nodes {
            builder
                .push(
                    &node.kind,
                    node.label.as_deref(),
                    Span::new(node.start, node.end),
                    node.parent.map(NodeId::new),
                )
                .map_err(tree_error)?;
        }
        let tree = builder.build().map_err(tree_error)?;
        Ok(CaseSide {
            text: file.text,
            tree,
        })
    }

    fn version(&self) -> Version<'_> {
        Version {
            tree: &self.tree,
            text: &self.text,
        }
    }
}

/// A fully built diff result, ready for analysis.
///
/// Loading checks tree shape, mapping uniqueness and change-set ids. Script
/// ids and cross-tree consistency are checked when an analysis starts.
pub struct Case {
    pub old: CaseSide,
    pub new: CaseSide,
    pub mapping: Correspondence,
    pub changes: ChangeSets,
    pub script: EditScript,
}

impl Case {
    pub fn load(path: &Path) -> Result<Self, CaseError> {
        let json = fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let case = Case::from_json(&json)?;
        debug!(
            path = %path.display(),
            old_nodes = case.old.tree.len(),
            new_nodes = case.new.tree.len(),
            actions = case.script.len(),
            "loaded case"
        );
        Ok(case)
    }

    pub fn from_json(json: &str) -> Result<Self, CaseError> {
        let file: CaseFile = serde_json::from_str(json)?;

        let old = CaseSide::build(Side::Old, file.old)?;
        let new = CaseSide::build(Side::New, file.new)?;

        let mut mapping = Correspondence::new();
        for (o, n) in file.mappings {
            mapping.insert(NodeId::new(o), NodeId::new(n))?;
        }

        let mut changes = ChangeSets::new(&old.tree, &new.tree);
        let c = file.changes;
        let marks = [
            (Side::Old, ChangeFlags::DELETED, c.deleted),
            (Side::New, ChangeFlags::INSERTED, c.inserted),
            (Side::Old, ChangeFlags::UPDATED, c.updated_old),
            (Side::New, ChangeFlags::UPDATED, c.updated_new),
            (Side::Old, ChangeFlags::MOVED, c.moved_old),
            (Side::New, ChangeFlags::MOVED, c.moved_new),
        ];
        for (side, flags, ids) in marks {
            for id in ids {
                changes.mark(side, NodeId::new(id), flags)?;
            }
        }

        let script = file.actions.into_iter().map(EditAction::from).collect();

        Ok(Case {
            old,
            new,
            mapping,
            changes,
            script,
        })
    }

    /// Borrow the case as analysis input.
    pub fn input(&self) -> AnalysisInput<'_> {
        AnalysisInput {
            old: self.old.version(),
            new: self.new.version(),
            mapping: &self.mapping,
            changes: &self.changes,
            script: &self.script,
        }
    }
}
