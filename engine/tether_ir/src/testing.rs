//! Fixture builders for tests in this and downstream crates.
//!
//! Trees are written as s-expressions over the file text they describe:
//!
//! ```text
//! (file_input
//!   (if_stmt#cond `if a:`
//!     (name `a`)
//!     (suite#body (expr_stmt `x=1` (name `x`) (operator `=`) (number `1`)))))
//! ```
//!
//! - `kind#tag` names a node so tests can look it up with [`TreeFixture::id`].
//! - A backtick snippet is located in the text, searching forward from the
//!   end of the previously placed node. Childless nodes take the snippet as
//!   their label.
//! - A node without a snippet spans its children. The outermost node always
//!   spans the whole text.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use rustc_hash::FxHashMap;

use crate::{
    ChangeFlags, ChangeSets, Correspondence, EditAction, EditScript, InsertionPoint, NodeId, Side,
    Span, SyntaxTree, TreeBuilder,
};

/// A parsed tree plus the text it was placed on.
pub struct TreeFixture {
    pub tree: SyntaxTree,
    pub text: String,
    pub tags: FxHashMap<String, NodeId>,
}

impl TreeFixture {
    /// Build a tree from `text` and an s-expression shape.
    ///
    /// Panics with a description of the problem on malformed input.
    pub fn new(text: &str, shape: &str) -> Self {
        let parsed = Parser::new(shape).parse_root();
        let mut cursor = 0;
        let placed = place(&parsed, text, &mut cursor, true);

        let mut builder = TreeBuilder::new();
        let mut tags = FxHashMap::default();
        push(&mut builder, &placed, None, &mut tags);
        let tree = builder
            .build()
            .unwrap_or_else(|e| panic!("fixture tree is invalid: {e}"));

        TreeFixture {
            tree,
            text: text.to_string(),
            tags,
        }
    }

    /// Node carrying `tag`.
    pub fn id(&self, tag: &str) -> NodeId {
        match self.tags.get(tag) {
            Some(&id) => id,
            None => panic!("no node tagged `{tag}`"),
        }
    }

    /// First node of `kind` in document order.
    pub fn first(&self, kind: &str) -> NodeId {
        self.tree
            .pre_order()
            .find(|&id| self.tree.is_kind(id, kind))
            .unwrap_or_else(|| panic!("no `{kind}` node"))
    }

    /// 1-based line on which the tagged node starts.
    pub fn line_of(&self, tag: &str) -> usize {
        let start = self.tree.span(self.id(tag)).start as usize;
        self.text[..start].matches('\n').count() + 1
    }
}

/// Old and new fixtures plus hand-written diff results.
///
/// Nodes tagged identically on both sides are mapped to each other.
pub struct DiffFixture {
    pub old: TreeFixture,
    pub new: TreeFixture,
    pub mapping: Correspondence,
    pub changes: ChangeSets,
    pub script: EditScript,
}

impl DiffFixture {
    pub fn new(old_text: &str, old_shape: &str, new_text: &str, new_shape: &str) -> Self {
        let old = TreeFixture::new(old_text, old_shape);
        let new = TreeFixture::new(new_text, new_shape);

        let mut shared: Vec<_> = old
            .tags
            .iter()
            .filter_map(|(tag, &o)| new.tags.get(tag).map(|&n| (o, n)))
            .collect();
        shared.sort_unstable();

        let mut mapping = Correspondence::new();
        for (o, n) in shared {
            mapping
                .insert(o, n)
                .unwrap_or_else(|e| panic!("shared tags: {e}"));
        }
        let changes = ChangeSets::new(&old.tree, &new.tree);

        DiffFixture {
            old,
            new,
            mapping,
            changes,
            script: EditScript::new(),
        }
    }

    /// Map two differently tagged nodes.
    #[must_use]
    pub fn map(mut self, old_tag: &str, new_tag: &str) -> Self {
        let (o, n) = (self.old.id(old_tag), self.new.id(new_tag));
        self.mapping
            .insert(o, n)
            .unwrap_or_else(|e| panic!("map `{old_tag}` -> `{new_tag}`: {e}"));
        self
    }

    /// Flag a new-tree node as inserted without recording an action.
    #[must_use]
    pub fn mark_inserted(mut self, tag: &str) -> Self {
        let id = self.new.id(tag);
        self.flag(Side::New, id, ChangeFlags::INSERTED);
        self
    }

    /// Inserted leaf at its actual position.
    #[must_use]
    pub fn insert(mut self, tag: &str) -> Self {
        let id = self.new.id(tag);
        let at = self.position_in_new(id);
        self.flag(Side::New, id, ChangeFlags::INSERTED);
        self.script.push(EditAction::Insert { node: id, at });
        self
    }

    /// Inserted node reported under an explicit parent and index.
    #[must_use]
    pub fn insert_at(mut self, tag: &str, parent_tag: &str, index: usize) -> Self {
        let id = self.new.id(tag);
        let at = InsertionPoint {
            parent: self.new.id(parent_tag),
            index,
        };
        self.flag(Side::New, id, ChangeFlags::INSERTED);
        self.script.push(EditAction::Insert { node: id, at });
        self
    }

    /// Inserted subtree: every node below `tag` is flagged, one action is
    /// recorded for the root.
    #[must_use]
    pub fn tree_insert(mut self, tag: &str) -> Self {
        let id = self.new.id(tag);
        let at = self.position_in_new(id);
        let subtree: Vec<_> = self.new.tree.subtree(id).collect();
        for node in subtree {
            self.flag(Side::New, node, ChangeFlags::INSERTED);
        }
        self.script.push(EditAction::TreeInsert { node: id, at });
        self
    }

    #[must_use]
    pub fn delete(mut self, tag: &str) -> Self {
        let id = self.old.id(tag);
        self.flag(Side::Old, id, ChangeFlags::DELETED);
        self.script.push(EditAction::Delete { node: id });
        self
    }

    /// Deleted subtree, one delete action per node.
    #[must_use]
    pub fn delete_tree(mut self, tag: &str) -> Self {
        let id = self.old.id(tag);
        let subtree: Vec<_> = self.old.tree.subtree(id).collect();
        for node in subtree {
            self.flag(Side::Old, node, ChangeFlags::DELETED);
            self.script.push(EditAction::Delete { node });
        }
        self
    }

    /// Mapped node whose label changed; `tag` must exist on both sides.
    #[must_use]
    pub fn update(mut self, tag: &str) -> Self {
        let (o, n) = (self.old.id(tag), self.new.id(tag));
        self.flag(Side::Old, o, ChangeFlags::UPDATED);
        self.flag(Side::New, n, ChangeFlags::UPDATED);
        let label = self.new.tree.label(n).unwrap_or_default().into();
        self.script.push(EditAction::Update { node: o, label });
        self
    }

    /// Mapped node that moved to its position in the new tree.
    #[must_use]
    pub fn move_to(mut self, tag: &str) -> Self {
        let (o, n) = (self.old.id(tag), self.new.id(tag));
        let at = self.position_in_new(n);
        self.flag(Side::Old, o, ChangeFlags::MOVED);
        self.flag(Side::New, n, ChangeFlags::MOVED);
        self.script.push(EditAction::Move { node: o, at });
        self
    }

    fn flag(&mut self, side: Side, id: NodeId, flags: ChangeFlags) {
        self.changes
            .mark(side, id, flags)
            .unwrap_or_else(|e| panic!("{e}"));
    }

    fn position_in_new(&self, id: NodeId) -> InsertionPoint {
        let tree = &self.new.tree;
        let parent = tree
            .parent(id)
            .unwrap_or_else(|| panic!("cannot insert or move the root"));
        let index = tree
            .children(parent)
            .iter()
            .position(|&c| c == id)
            .expect("child is listed under its parent");
        InsertionPoint { parent, index }
    }
}

struct Shape {
    kind: String,
    tag: Option<String>,
    snippet: Option<String>,
    children: Vec<Shape>,
}

struct Placed {
    kind: String,
    tag: Option<String>,
    label: Option<String>,
    span: Span,
    children: Vec<Placed>,
}

fn offset(n: usize) -> u32 {
    u32::try_from(n).expect("fixture text fits in u32")
}

fn place(shape: &Shape, text: &str, cursor: &mut usize, is_root: bool) -> Placed {
    let (span, children) = if let Some(snippet) = &shape.snippet {
        let start = text[*cursor..]
            .find(snippet.as_str())
            .map(|rel| *cursor + rel)
            .unwrap_or_else(|| panic!("snippet `{snippet}` not found after offset {cursor}"));
        let end = start + snippet.len();
        let mut inner = start;
        let children: Vec<_> = shape
            .children
            .iter()
            .map(|c| place(c, text, &mut inner, false))
            .collect();
        *cursor = end;
        let span = if is_root {
            Span::new(0, offset(text.len()))
        } else {
            Span::new(offset(start), offset(end))
        };
        (span, children)
    } else {
        let children: Vec<_> = shape
            .children
            .iter()
            .map(|c| place(c, text, cursor, false))
            .collect();
        let span = if is_root {
            Span::new(0, offset(text.len()))
        } else {
            match (children.first(), children.last()) {
                (Some(first), Some(last)) => first.span.merge(last.span),
                _ => Span::point(offset(*cursor)),
            }
        };
        (span, children)
    };

    let label = if children.is_empty() {
        shape.snippet.clone()
    } else {
        None
    };
    Placed {
        kind: shape.kind.clone(),
        tag: shape.tag.clone(),
        label,
        span,
        children,
    }
}

fn push(
    builder: &mut TreeBuilder,
    node: &Placed,
    parent: Option<NodeId>,
    tags: &mut FxHashMap<String, NodeId>,
) {
    let id = builder
        .push(&node.kind, node.label.as_deref(), node.span, parent)
        .unwrap_or_else(|e| panic!("placing `{}`: {e}", node.kind));
    if let Some(tag) = &node.tag {
        if tags.insert(tag.clone(), id).is_some() {
            panic!("duplicate tag `{tag}`");
        }
    }
    for child in &node.children {
        push(builder, child, Some(id), tags);
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser { src, pos: 0 }
    }

    fn parse_root(mut self) -> Shape {
        let shape = self.node();
        self.skip_ws();
        if self.pos != self.src.len() {
            panic!("trailing input at {}: {:?}", self.pos, &self.src[self.pos..]);
        }
        shape
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect_char(&mut self, want: char) {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => {}
            other => panic!("expected `{want}` at {}, found {other:?}", self.pos),
        }
    }

    fn word(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '`' | '#'))
        {
            self.bump();
        }
        if start == self.pos {
            panic!("expected a name at {start}");
        }
        self.src[start..self.pos].to_string()
    }

    fn node(&mut self) -> Shape {
        self.expect_char('(');
        self.skip_ws();
        let kind = self.word();
        let tag = if self.peek() == Some('#') {
            self.bump();
            Some(self.word())
        } else {
            None
        };

        self.skip_ws();
        let snippet = if self.peek() == Some('`') {
            self.bump();
            let start = self.pos;
            while self.peek().is_some_and(|c| c != '`') {
                self.bump();
            }
            let snippet = self.src[start..self.pos].to_string();
            self.expect_char('`');
            Some(snippet)
        } else {
            None
        };

        let mut children = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('(') => children.push(self.node()),
                Some(')') => {
                    self.bump();
                    break;
                }
                other => panic!("unexpected {other:?} at {}", self.pos),
            }
        }

        Shape {
            kind,
            tag,
            snippet,
            children,
        }
    }
}
