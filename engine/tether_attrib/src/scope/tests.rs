use pretty_assertions::assert_eq;
use tether_ir::testing::TreeFixture;
use tether_ir::{KindTable, LineIndex, Span};

use super::*;
use crate::range::Coverage;
use crate::Tolerance;

const TWO_FUNCTIONS: &str = "def run(a):\n    x = 1\n    return x\ndef go():\n    y = 2\n";

fn two_functions() -> TreeFixture {
    TreeFixture::new(
        TWO_FUNCTIONS,
        "(file_input
           (funcdef#run `def run(a):\n    x = 1\n    return x`
             (name `run`) (parameters (param `a`))
             (suite (expr_stmt#x `x = 1`) (return_stmt#ret `return x`)))
           (funcdef#go `def go():\n    y = 2`
             (name#go_name `go`) (parameters `()`)
             (suite (expr_stmt#y `y = 2`))))",
    )
}

fn context_for(f: &TreeFixture, line: i64, tolerance: u32) -> ScopeContext {
    let index = LineIndex::build(&f.text);
    let window = RangeWindow::resolve(&f.tree, &index, line, Tolerance::symmetric(tolerance));
    let line = LineSpan::resolve(&f.tree, &index, line);
    ScopeContext::resolve(&f.tree, &line, &window, &KindTable::default())
}

#[test]
fn test_enclosing_scope_includes_self() {
    let f = two_functions();
    let kinds = KindTable::default();
    assert_eq!(enclosing_scope(&f.tree, f.id("run"), &kinds), Some(f.id("run")));
    assert_eq!(enclosing_scope(&f.tree, f.id("y"), &kinds), Some(f.id("go")));
    assert_eq!(enclosing_scope(&f.tree, f.tree.root(), &kinds), None);
}

#[test]
fn test_scope_of_line_inside_function() {
    let f = two_functions();
    let scope = context_for(&f, 2, 10);
    assert_eq!(scope.anchor, Some(f.id("x")));
    assert_eq!(scope.scope, Some(f.id("run")));

    let span = |tag| f.tree.span(f.id(tag));
    assert!(scope.admits(&f.tree, span("ret"), ScopeContainment::Contained));
    assert!(!scope.admits(&f.tree, span("y"), ScopeContainment::Contained));
}

#[test]
fn test_scope_of_header_line() {
    let f = two_functions();
    let scope = context_for(&f, 4, 0);
    assert_eq!(scope.anchor, Some(f.id("go_name")));
    assert_eq!(scope.scope, Some(f.id("go")));
}

#[test]
fn test_legacy_containment_is_asymmetric() {
    let f = two_functions();
    let scope = context_for(&f, 2, 10);
    let root = f.tree.span(f.tree.root());
    let inner = f.tree.span(f.id("x"));

    // The historical check accepts spans that extend past the scope end and
    // rejects spans strictly inside it.
    assert!(scope.admits(&f.tree, root, ScopeContainment::Legacy));
    assert!(!scope.admits(&f.tree, inner, ScopeContainment::Legacy));
    assert!(!scope.admits(&f.tree, root, ScopeContainment::Contained));
    assert!(scope.admits(&f.tree, inner, ScopeContainment::Contained));
}

#[test]
fn test_module_level_line_admits_everything() {
    let f = TreeFixture::new(
        "a = 1\nb = 2\n",
        "(file_input (expr_stmt#a `a = 1`) (expr_stmt#b `b = 2`))",
    );
    let scope = context_for(&f, 1, 0);
    assert_eq!(scope.anchor, Some(f.id("a")));
    assert_eq!(scope.scope, None);
    assert!(scope.admits(&f.tree, Span::new(0, 999), ScopeContainment::Contained));
}

#[test]
fn test_empty_line_falls_back_to_window_start() {
    let f = TreeFixture::new(
        "a = 1\nb = 2\nc = 3\n",
        "(file_input (expr_stmt#a `a = 1`) (expr_stmt#b `b = 2`) (expr_stmt#c `c = 3`))",
    );
    let index = LineIndex::build(&f.text);
    let window = RangeWindow::resolve(&f.tree, &index, 2, Tolerance::symmetric(0));
    let empty = LineSpan {
        line: 2,
        offsets: Span::point(6),
        coverage: Coverage {
            nodes: Vec::new(),
            bounds: Span::point(6),
        },
    };
    let scope = ScopeContext::resolve(&f.tree, &empty, &window, &KindTable::default());
    assert_eq!(scope.anchor, Some(f.id("b")));
}

#[test]
fn test_custom_scope_kinds() {
    let f = TreeFixture::new(
        "class K:\n    v = 1\n",
        "(file_input (classdef#k `class K:\n    v = 1` (name `K`) (suite (expr_stmt#v `v = 1`))))",
    );
    let mut kinds = KindTable::default();
    assert_eq!(enclosing_scope(&f.tree, f.id("v"), &kinds), None);
    kinds.scopes.push("classdef".to_string());
    assert_eq!(enclosing_scope(&f.tree, f.id("v"), &kinds), Some(f.id("k")));
}
