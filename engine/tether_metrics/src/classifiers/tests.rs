#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use tether_attrib::{AnalysisConfig, AnalysisInput, Tolerance, Version};
use tether_ir::testing::DiffFixture;
use tether_ir::Side;

use crate::{analyze, AnalysisReport, Registry};

fn input(d: &DiffFixture) -> AnalysisInput<'_> {
    AnalysisInput {
        old: Version {
            tree: &d.old.tree,
            text: &d.old.text,
        },
        new: Version {
            tree: &d.new.tree,
            text: &d.new.text,
        },
        mapping: &d.mapping,
        changes: &d.changes,
        script: &d.script,
    }
}

fn report_with(d: &DiffFixture, line: i64, config: &AnalysisConfig) -> AnalysisReport {
    analyze(&Registry::standard(), input(d), line, config).unwrap()
}

fn report(d: &DiffFixture, line: i64) -> AnalysisReport {
    report_with(d, line, &AnalysisConfig::default())
}

fn metric(r: &AnalysisReport, name: &str) -> i64 {
    r.metrics
        .get(name)
        .unwrap_or_else(|| panic!("no metric `{name}`"))
}

fn narrow(tolerance: u32) -> AnalysisConfig {
    AnalysisConfig {
        tolerance: Tolerance::symmetric(tolerance),
        ..AnalysisConfig::default()
    }
}

fn unscoped() -> AnalysisConfig {
    AnalysisConfig {
        scope_filter: false,
        ..AnalysisConfig::default()
    }
}

const IFS_OLD: &str = "def run():\n    if ready:\n        work()\n    done()\n\
                       def go():\n    if ready:\n        work()\n    done()\n";
const IFS_OLD_SHAPE: &str = "(file_input#root
   (funcdef#run `def run():\n    if ready:\n        work()\n    done()`
     (name `run`) (parameters `()`)
     (suite#rs
       (if_stmt#if1 `if ready:\n        work()` (name#c1 `ready`) (suite#s1 (expr_stmt#w1 `work()`)))
       (expr_stmt#d1 `done()`)))
   (funcdef#go `def go():\n    if ready:\n        work()\n    done()`
     (name `go`) (parameters `()`)
     (suite#gs
       (if_stmt#if2 `if ready:\n        work()` (name#c2 `ready`) (suite#s2 (expr_stmt#w2 `work()`)))
       (expr_stmt#d2 `done()`))))";
const IFS_GONE: &str = "def run():\n    done()\ndef go():\n    done()\n";
const IFS_GONE_SHAPE: &str = "(file_input#root
   (funcdef#run `def run():\n    done()` (name `run`) (parameters `()`) (suite#rs (expr_stmt#d1 `done()`)))
   (funcdef#go `def go():\n    done()` (name `go`) (parameters `()`) (suite#gs (expr_stmt#d2 `done()`))))";

/// Both functions lose their `if` block.
fn deleted_ifs() -> DiffFixture {
    DiffFixture::new(IFS_OLD, IFS_OLD_SHAPE, IFS_GONE, IFS_GONE_SHAPE)
        .delete_tree("if1")
        .delete_tree("if2")
}

/// Both functions gain an `if` block.
fn inserted_ifs() -> DiffFixture {
    DiffFixture::new(
        IFS_GONE.replace("done", "work").as_str(),
        "(file_input#root
           (funcdef#run `def run():\n    work()` (name `run`) (parameters `()`) (suite#rs (expr_stmt#w1 `work()`)))
           (funcdef#go `def go():\n    work()` (name `go`) (parameters `()`) (suite#gs (expr_stmt#w2 `work()`))))",
        "def run():\n    if ready:\n        done()\n    work()\n\
         def go():\n    if ready:\n        done()\n    work()\n",
        "(file_input#root
           (funcdef#run `def run():\n    if ready:\n        done()\n    work()`
             (name `run`) (parameters `()`)
             (suite#rs
               (if_stmt#if1 `if ready:\n        done()` (name `ready`) (suite#s1 (expr_stmt `done()`)))
               (expr_stmt#w1 `work()`)))
           (funcdef#go `def go():\n    if ready:\n        done()\n    work()`
             (name `go`) (parameters `()`)
             (suite#gs
               (if_stmt#if2 `if ready:\n        done()` (name `ready`) (suite#s2 (expr_stmt `done()`)))
               (expr_stmt#w2 `work()`))))",
    )
    .tree_insert("if1")
    .tree_insert("if2")
}

#[test]
fn test_deleted_if_counts_only_in_scope() {
    let r = report(&deleted_ifs(), 2);
    assert_eq!(metric(&r, "deletedIfStmts"), 1);
    assert_eq!(metric(&r, "insertedIfConditions"), 0);
    assert_eq!(metric(&r, "anyDeleted"), 4);
    assert_eq!(metric(&r, "anyInserted"), 0);
}

#[test]
fn test_deleted_if_without_scope_filter() {
    let r = report_with(&deleted_ifs(), 2, &unscoped());
    assert_eq!(metric(&r, "deletedIfStmts"), 2);
    assert_eq!(metric(&r, "elseDeleted"), 2);
    assert_eq!(metric(&r, "anyDeleted"), 8);
    assert_eq!(metric(&r, "locDelta"), -4);
}

#[test]
fn test_deleted_if_outside_narrow_window() {
    // Line 2 alone only covers the condition.
    let r = report_with(&deleted_ifs(), 2, &narrow(0));
    assert_eq!(metric(&r, "deletedIfStmts"), 0);
    assert_eq!(metric(&r, "elseDeleted"), 0);
    assert_eq!(metric(&r, "anyDeleted"), 1);
    // Line-level metrics do not depend on the window.
    assert_eq!(metric(&r, "EntireLineDeleted"), 1);
}

#[test]
fn test_deleted_block_counts_once() {
    let r = report(&deleted_ifs(), 2);
    assert_eq!(metric(&r, "elseDeleted"), 1);
}

#[test]
fn test_deleted_line_metrics() {
    let r = report(&deleted_ifs(), 2);
    assert_eq!(metric(&r, "AnythingInLineDeleted"), 1);
    assert_eq!(metric(&r, "EntireLineDeleted"), 1);
    assert_eq!(metric(&r, "AnythingInLineUpdated"), 0);
    assert_eq!(metric(&r, "EntireLineMoved"), 0);
    assert_eq!(metric(&r, "srclocs"), 1);
    assert_eq!(metric(&r, "locDelta"), -2);
}

#[test]
fn test_surviving_node_keeps_line_alive() {
    // Only the `if` itself is gone; its condition survives on line 2.
    let d = DiffFixture::new(IFS_OLD, IFS_OLD_SHAPE, IFS_GONE, IFS_GONE_SHAPE).delete("if1");
    let r = report(&d, 2);
    assert_eq!(metric(&r, "AnythingInLineDeleted"), 0);
    assert_eq!(metric(&r, "EntireLineDeleted"), 0);
    assert_eq!(metric(&r, "deletedIfStmts"), 1);
    assert_eq!(metric(&r, "elseDeleted"), 0);
}

#[test]
fn test_inserted_if_needs_in_scope_attribution() {
    let d = inserted_ifs();
    let r = report(&d, 2);
    assert_eq!(metric(&r, "insertedIfConditions"), 1);
    assert_eq!(metric(&r, "elseInserted"), 1);
    // Range only, no scope.
    assert_eq!(metric(&r, "anyInserted"), 8);

    let r = report_with(&d, 2, &unscoped());
    assert_eq!(metric(&r, "insertedIfConditions"), 2);
    assert_eq!(metric(&r, "elseInserted"), 2);
}

#[test]
fn test_insertions_landing_on_the_line() {
    let r = report(&inserted_ifs(), 2);
    // The `if` subtree in `run` lands before `work()` on line 2.
    assert_eq!(metric(&r, "AnythingInsertedIntoLine"), 4);
    assert_eq!(metric(&r, "locDelta"), 2);
    assert_eq!(metric(&r, "srclocs"), 1);
}

#[test]
fn test_removed_try_counts_statement_and_handler() {
    let d = DiffFixture::new(
        "def run():\n    try:\n        work()\n    except Error:\n        pass\n    done()\n",
        "(file_input#root
           (funcdef#run `def run():\n    try:\n        work()\n    except Error:\n        pass\n    done()`
             (name `run`) (parameters `()`)
             (suite#rs
               (try_stmt#try `try:\n        work()\n    except Error:\n        pass`
                 (suite (expr_stmt `work()`))
                 (except_clause `except Error` (name `Error`))
                 (suite (pass_stmt `pass`)))
               (expr_stmt#done `done()`))))",
        "def run():\n    done()\n",
        "(file_input#root
           (funcdef#run `def run():\n    done()` (name `run`) (parameters `()`)
             (suite#rs (expr_stmt#done `done()`))))",
    )
    .delete_tree("try");

    let r = report(&d, 6);
    assert_eq!(metric(&r, "RemovedTryCatch"), 2);
    assert_eq!(metric(&r, "InsertedTryCatch"), 0);
    assert_eq!(metric(&r, "anyDeleted"), 7);
    assert_eq!(metric(&r, "elseDeleted"), 0);
    assert_eq!(metric(&r, "locDelta"), -4);
}

fn literals() -> DiffFixture {
    DiffFixture::new(
        "def run():\n    \"\"\"Start.\"\"\"\n    limit = 10\n    return limit\n",
        "(file_input#root
           (funcdef#run `def run():\n    \"\"\"Start.\"\"\"\n    limit = 10\n    return limit`
             (name `run`) (parameters `()`)
             (suite#rs
               (expr_stmt#doc (string#docstr `\"\"\"Start.\"\"\"`))
               (expr_stmt#assign `limit = 10` (name `limit`) (operator `=`) (number#value `10`))
               (return_stmt#ret `return limit`))))",
        "def run():\n    \"\"\"Begin.\"\"\"\n    limit = 20\n    assert limit\n    label = \"b\"\n    return limit\n",
        "(file_input#root
           (funcdef#run `def run():\n    \"\"\"Begin.\"\"\"\n    limit = 20\n    assert limit\n    label = \"b\"\n    return limit`
             (name `run`) (parameters `()`)
             (suite#rs
               (expr_stmt#doc (string#docstr `\"\"\"Begin.\"\"\"`))
               (expr_stmt#assign `limit = 20` (name `limit`) (operator `=`) (number#value `20`))
               (assert_stmt#check `assert limit` (name `limit`))
               (expr_stmt#label `label = \"b\"` (name `label`) (operator `=`) (string `\"b\"`))
               (return_stmt#ret `return limit`))))",
    )
    .update("docstr")
    .update("value")
    .tree_insert("check")
    .tree_insert("label")
}

#[test]
fn test_literal_and_comment_edits() {
    let r = report(&literals(), 3);
    // Updated docstring plus the inserted `"b"`.
    assert_eq!(metric(&r, "AddedOrUpdatedComments"), 2);
    assert_eq!(metric(&r, "UpdatedValueAssignments"), 2);
    assert_eq!(metric(&r, "UpdatedSrcs"), 2);
    assert_eq!(metric(&r, "AnythingInLineUpdated"), 1);
}

#[test]
fn test_inserted_assert() {
    let r = report(&literals(), 3);
    assert_eq!(metric(&r, "InsertedAssertConditions"), 1);
}

#[test]
fn test_unknown_literal_is_not_a_replacement() {
    let r = report(&literals(), 3);
    assert_eq!(metric(&r, "magicStringsReplaced"), 0);
}

#[test]
fn test_literal_assignment_in_other_function() {
    let d = DiffFixture::new(
        "def run():\n    x = \"hello\"\ndef go():\n    pass\n",
        "(file_input#root
           (funcdef#run `def run():\n    x = \"hello\"` (name `run`) (parameters `()`)
             (suite#rs (expr_stmt#x `x = \"hello\"` (name `x`) (operator `=`) (string `\"hello\"`))))
           (funcdef#go `def go():\n    pass` (name `go`) (parameters `()`)
             (suite#gs (pass_stmt#p `pass`))))",
        "def run():\n    x = \"hello\"\ndef go():\n    pass\n    y = \"hello\"\n",
        "(file_input#root
           (funcdef#run `def run():\n    x = \"hello\"` (name `run`) (parameters `()`)
             (suite#rs (expr_stmt#x `x = \"hello\"` (name `x`) (operator `=`) (string `\"hello\"`))))
           (funcdef#go `def go():\n    pass\n    y = \"hello\"` (name `go`) (parameters `()`)
             (suite#gs
               (pass_stmt#p `pass`)
               (expr_stmt#y `y = \"hello\"` (name `y`) (operator `=`) (string `\"hello\"`)))))",
    )
    .tree_insert("y");

    assert_eq!(metric(&report(&d, 2), "magicStringsReplaced"), 0);
    assert_eq!(metric(&report_with(&d, 2, &unscoped()), "magicStringsReplaced"), 1);
}

#[test]
fn test_parameter_swap() {
    let d = DiffFixture::new(
        "def run(a):\n    pass\n",
        "(file_input#root
           (funcdef#run `def run(a):\n    pass` (name `run`) (parameters#params `(a)` (param#a `a`))
             (suite#body (pass_stmt#p `pass`))))",
        "def run(b):\n    pass\n",
        "(file_input#root
           (funcdef#run `def run(b):\n    pass` (name `run`) (parameters#params `(b)` (param#b `b`))
             (suite#body (pass_stmt#p `pass`))))",
    )
    .delete("a")
    .insert("b");

    let r = report(&d, 2);
    assert_eq!(metric(&r, "UpdatedFuncArguments"), 2);
    assert_eq!(metric(&r, "anyDeleted"), 1);
    assert_eq!(metric(&r, "anyInserted"), 1);
}

#[test]
fn test_swapped_conditions_count_as_moved_blocks() {
    let d = DiffFixture::new(
        "if a:\n    x()\nelif b:\n    y()\n",
        "(file_input#root
           (if_stmt#if `if a:\n    x()\nelif b:\n    y()`
             (name#a `a`) (suite#sx (expr_stmt `x()`))
             (name#b `b`) (suite#sy (expr_stmt `y()`))))",
        "if b:\n    y()\nelif a:\n    x()\n",
        "(file_input#root
           (if_stmt#if `if b:\n    y()\nelif a:\n    x()`
             (name#b `b`) (suite#sy (expr_stmt `y()`))
             (name#a `a`) (suite#sx (expr_stmt `x()`))))",
    )
    .move_to("a")
    .move_to("b")
    .move_to("sx")
    .move_to("sy");

    let r = report(&d, 1);
    assert_eq!(metric(&r, "MovedBlocksInIfConditions"), 2);
    assert!(r.faults.is_empty());
}

#[test]
fn test_unexpected_if_shapes_are_faults() {
    let d = DiffFixture::new(
        "if a:\n    x()\nif c:\n",
        "(file_input#root
           (if_stmt#if `if a:\n    x()` (name `a`) (suite (expr_stmt `x()`)))
           (if_stmt#bad `if c:` (name `c`)))",
        "while a:\n    x()\n",
        "(file_input#root
           (while_stmt#loop `while a:\n    x()` (name `a`) (suite (expr_stmt `x()`))))",
    )
    .map("if", "loop");

    let r = report(&d, 1);
    assert_eq!(metric(&r, "MovedBlocksInIfConditions"), 0);
    let located: Vec<_> = r.faults.iter().map(|f| (f.side, f.node)).collect();
    assert_eq!(
        located,
        vec![(Side::New, d.new.id("loop")), (Side::Old, d.old.id("bad"))]
    );
    assert!(r
        .faults
        .iter()
        .all(|f| f.classifier == "moved-block-in-condition"));
    assert_eq!(r.faults[0].message, "`if_stmt` mapped to `while_stmt`");
}

fn rotated_lines() -> DiffFixture {
    DiffFixture::new(
        "a = 1\nb = 2\nc = 3\n",
        "(file_input#root
           (simple_stmt#a `a = 1\n` (expr_stmt `a = 1`))
           (simple_stmt#b `b = 2\n` (expr_stmt `b = 2`))
           (simple_stmt#c `c = 3\n` (expr_stmt `c = 3`)))",
        "b = 2\nc = 3\na = 1\n",
        "(file_input#root
           (simple_stmt#b `b = 2\n` (expr_stmt `b = 2`))
           (simple_stmt#c `c = 3\n` (expr_stmt `c = 3`))
           (simple_stmt#a `a = 1\n` (expr_stmt `a = 1`)))",
    )
    .move_to("a")
}

#[test]
fn test_line_moved_away() {
    let r = report_with(&rotated_lines(), 1, &narrow(0));
    assert_eq!(metric(&r, "AnythingInLineMoved"), 1);
    assert_eq!(metric(&r, "EntireLineMoved"), 1);
    assert_eq!(metric(&r, "AnythingMovedIntoLine"), 1);
    assert_eq!(metric(&r, "getMovedSrcs"), 1);
}

#[test]
fn test_line_where_a_move_lands_counts_nothing() {
    // Old line 3 is `c = 3`; the moved `a = 1` only lands there in the new file.
    let r = report_with(&rotated_lines(), 3, &narrow(0));
    assert_eq!(metric(&r, "AnythingMovedIntoLine"), 0);
    assert_eq!(metric(&r, "AnythingInLineMoved"), 0);
    assert_eq!(metric(&r, "EntireLineMoved"), 0);
}

#[test]
fn test_moved_into_line_ignores_scope_and_window() {
    let d = rotated_lines();
    let r = report_with(&d, 1, &unscoped());
    assert_eq!(metric(&r, "AnythingMovedIntoLine"), 1);
    // A move outside the line never counts.
    let r = report_with(&d, 2, &unscoped());
    assert_eq!(metric(&r, "AnythingMovedIntoLine"), 0);
}

#[test]
fn test_change_totals_keep_table_column_names() {
    let registry = Registry::standard();
    assert_eq!(
        registry.columns()[..4],
        ["anyInserted", "anyDeleted", "getMovedSrcs", "UpdatedSrcs"]
    );
}

#[test]
fn test_every_column_is_written() {
    let registry = Registry::standard();
    let r = report(&deleted_ifs(), 2);
    assert_eq!(r.metrics.columns().collect::<Vec<_>>(), registry.columns());
}

mod proptest_classifiers {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn test_if_statement_itself_never_counts_as_block(
            line in -2i64..12,
            tolerance in 0u32..12,
            scope_filter in any::<bool>(),
        ) {
            let d = DiffFixture::new(IFS_OLD, IFS_OLD_SHAPE, IFS_GONE, IFS_GONE_SHAPE)
                .delete("if1")
                .delete("if2");
            let config = AnalysisConfig {
                tolerance: Tolerance::symmetric(tolerance),
                scope_filter,
                ..AnalysisConfig::default()
            };
            let r = report_with(&d, line, &config);
            prop_assert_eq!(metric(&r, "elseDeleted"), 0);
            prop_assert!(metric(&r, "deletedIfStmts") <= 2);
            for (name, value) in r.metrics.iter() {
                if name != "locDelta" {
                    prop_assert!(value >= 0, "{} = {}", name, value);
                }
            }
        }
    }
}
