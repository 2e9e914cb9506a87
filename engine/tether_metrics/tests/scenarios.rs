//! End-to-end scenarios over the standard registry.

#![allow(clippy::unwrap_used)]

use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tether_attrib::{AnalysisConfig, AnalysisError, AnalysisInput, RangeDegradation, Version};
use tether_ir::testing::DiffFixture;
use tether_ir::{Correspondence, MappingError, NodeId};
use tether_metrics::{analyze, AnalysisReport, Registry};

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

fn report(d: &DiffFixture, line: i64) -> AnalysisReport {
    analyze(&Registry::standard(), input(d), line, &AnalysisConfig::default()).unwrap()
}

fn metric(r: &AnalysisReport, name: &str) -> i64 {
    r.metrics.get(name).unwrap()
}

/// The else branch is a single statement, which the tree provider folds
/// into a labelled block.
fn else_branch_edited() -> DiffFixture {
    DiffFixture::new(
        "if a:\n  x=1\nelse:\n  x=2\n",
        "(file_input#root
           (if_stmt#if `if a:\n  x=1\nelse:\n  x=2`
             (name#cond `a`) (suite#body `x=1`) (suite#else_body `x=2`)))",
        "if a:\n  x=1\nelse:\n  x=3\n",
        "(file_input#root
           (if_stmt#if `if a:\n  x=1\nelse:\n  x=3`
             (name#cond `a`) (suite#body `x=1`) (suite#else_body `x=3`)))",
    )
    .update("else_body")
}

#[test]
fn test_updated_else_branch() {
    let r = report(&else_branch_edited(), 4);
    assert_eq!(metric(&r, "elseUpdated"), 1);
    assert_eq!(metric(&r, "insertedIfConditions"), 0);
    assert_eq!(metric(&r, "deletedIfStmts"), 0);
    assert_eq!(metric(&r, "UpdatedSrcs"), 1);
    assert_eq!(metric(&r, "AnythingInLineUpdated"), 1);
    assert_eq!(r.degradation(), None);
    assert!(r.faults.is_empty());
}

#[test]
fn test_statement_wrapped_in_try() {
    let d = DiffFixture::new(
        "def run():\n    a = 1\n    b = 2\n    c = 3\n",
        "(file_input#root
           (funcdef#run `def run():\n    a = 1\n    b = 2\n    c = 3`
             (name `run`) (parameters `()`)
             (suite#body (expr_stmt#a `a = 1`) (expr_stmt#b `b = 2`) (expr_stmt#c `c = 3`))))",
        "def run():\n    a = 1\n    try:\n        b = 2\n    except Error:\n        pass\n    c = 3\n",
        "(file_input#root
           (funcdef#run `def run():\n    a = 1\n    try:\n        b = 2\n    except Error:\n        pass\n    c = 3`
             (name `run`) (parameters `()`)
             (suite#body
               (expr_stmt#a `a = 1`)
               (try_stmt#try `try:\n        b = 2\n    except Error:\n        pass`
                 (suite#try_body (expr_stmt#b `b = 2`))
                 (except_clause#except `except Error` (name `Error`))
                 (suite#handler (pass_stmt `pass`)))
               (expr_stmt#c `c = 3`))))",
    )
    .insert("try")
    .insert("try_body")
    .move_to("b")
    .tree_insert("except")
    .tree_insert("handler");

    let r = report(&d, 3);
    assert!(metric(&r, "InsertedTryCatch") >= 2);
    assert_eq!(metric(&r, "RemovedTryCatch"), 0);
    assert_eq!(metric(&r, "getMovedSrcs"), 1);
    assert_eq!(metric(&r, "AnythingInsertedIntoLine"), 6);
    assert_eq!(metric(&r, "locDelta"), 4);
}

#[test]
fn test_repeated_literal_extracted() {
    let d = DiffFixture::new(
        "def run():\n    x = \"hello\"\n    return x\n",
        "(file_input#root
           (funcdef#run `def run():\n    x = \"hello\"\n    return x`
             (name `run`) (parameters `()`)
             (suite#body
               (expr_stmt#x `x = \"hello\"` (name `x`) (operator `=`) (string `\"hello\"`))
               (return_stmt#ret `return x`))))",
        "def run():\n    x = \"hello\"\n    y = \"hello\"\n    return x\n",
        "(file_input#root
           (funcdef#run `def run():\n    x = \"hello\"\n    y = \"hello\"\n    return x`
             (name `run`) (parameters `()`)
             (suite#body
               (expr_stmt#x `x = \"hello\"` (name `x`) (operator `=`) (string `\"hello\"`))
               (expr_stmt#y `y = \"hello\"` (name `y`) (operator `=`) (string `\"hello\"`))
               (return_stmt#ret `return x`))))",
    )
    .tree_insert("y");

    let r = report(&d, 2);
    assert_eq!(metric(&r, "magicStringsReplaced"), 1);
    assert_eq!(metric(&r, "AddedOrUpdatedComments"), 1);
    assert_eq!(metric(&r, "locDelta"), 1);
}

/// Log sink shared between a test and its scoped subscriber.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with warnings written to the returned log.
fn with_captured_log<R>(f: impl FnOnce() -> R) -> (R, String) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, log.text())
}

#[test]
fn test_line_zero_uses_file_wide_window() {
    let d = else_branch_edited();
    let (r, log) = with_captured_log(|| report(&d, 0));

    assert!(log.contains("WARN"), "{log}");
    assert!(
        log.contains("target line outside the file; using a file-wide window"),
        "{log}"
    );
    assert!(log.contains("target_line=0"), "{log}");

    assert_eq!(
        r.degradation(),
        Some(RangeDegradation {
            requested_line: 0,
            total_lines: 4,
        })
    );
    assert_eq!(r.window.start_line, 0);
    assert_eq!(r.window.end_line, 4);
    assert_eq!(r.window.offsets.start, 0);
    // Everything is in range, so the edit still counts.
    assert_eq!(metric(&r, "elseUpdated"), 1);
    // The line itself is empty.
    assert_eq!(metric(&r, "AnythingInLineUpdated"), 0);
}

#[test]
fn test_line_past_end_is_degraded() {
    let (r, log) = with_captured_log(|| report(&else_branch_edited(), 40));
    assert_eq!(r.degradation().map(|d| d.requested_line), Some(40));
    assert_eq!(metric(&r, "elseUpdated"), 1);
    assert!(log.contains("target_line=40"), "{log}");
}

#[test]
fn test_line_in_file_logs_no_warning() {
    let (r, log) = with_captured_log(|| report(&else_branch_edited(), 4));
    assert_eq!(r.degradation(), None);
    assert!(!log.contains("WARN"), "{log}");
}

#[test]
fn test_malformed_mapping_fails_fast() {
    let d = else_branch_edited();
    let mut mapping = Correspondence::new();
    mapping.insert(NodeId::new(0), NodeId::new(77)).unwrap();
    let input = AnalysisInput {
        mapping: &mapping,
        ..input(&d)
    };
    let err = analyze(&Registry::standard(), input, 4, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::Mapping(MappingError::UnknownNew(NodeId::new(77)))
    );
}
