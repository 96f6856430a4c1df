//! Tests for WDL task recovery.

use crate::error::HydrantError;
use crate::wdl::{Task, TaskReference, TaskSelector, WdlDocument};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WF: &str = "\
task foo {
  command { echo foo }
}

task bar {
  command { echo bar }
}

workflow wf {
  call foo
  call bar
}
";

fn doc(source: &str) -> WdlDocument {
    WdlDocument::parse_str(source, Path::new("wf/wf.wdl")).unwrap()
}

#[test]
fn test_tasks_in_source_order() {
    let doc = doc(WF);

    let names: Vec<_> = doc.tasks().keys().cloned().collect();
    assert_eq!(names, vec!["foo", "bar"]);
    assert_eq!(
        doc.task("foo").unwrap().text(),
        "task foo {\n  command { echo foo }\n}"
    );
    assert_eq!(
        doc.workflow(),
        Some("workflow wf {\n  call foo\n  call bar\n}\n")
    );
}

#[test]
fn test_select_named_and_all() {
    let doc = doc(WF);

    let one = doc.select(&TaskSelector::Named("bar".to_string())).unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].name(), "bar");

    let all = doc.select(&TaskSelector::All).unwrap();
    let names: Vec<_> = all.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["foo", "bar"]);
}

#[test]
fn test_select_missing_task() {
    let doc = doc(WF);
    let err = doc
        .select(&TaskSelector::Named("baz".to_string()))
        .unwrap_err();
    match err {
        HydrantError::TaskNotFound { task, path } => {
            assert_eq!(task, "baz");
            assert_eq!(path, Path::new("wf/wf.wdl"));
        }
        other => panic!("expected TaskNotFound, got {:?}", other),
    }
}

#[test]
fn test_render_text_reproduces_blocks() {
    let doc = doc(WF);
    assert_eq!(doc.render_text(), WF);

    let again = WdlDocument::parse_str(&doc.render_text(), doc.path()).unwrap();
    assert_eq!(again.tasks(), doc.tasks());
    assert_eq!(again.workflow(), doc.workflow());
}

#[test]
fn test_name_with_brace_attached() {
    let doc = doc("task tight{\n}\nworkflow w {}\n");
    assert!(doc.task("tight").is_some());
}

#[test]
fn test_task_without_name_is_malformed() {
    let err = WdlDocument::parse_str("task\n}\nworkflow w {}\n", Path::new("x.wdl")).unwrap_err();
    assert!(matches!(err, HydrantError::MalformedWdl { .. }));
    assert!(err.to_string().contains("has no name"));
}

#[test]
fn test_task_name_comes_from_task_line_only() {
    let source = "task\n  command { echo }\n}\nworkflow w {}\n";
    let err = WdlDocument::parse_str(source, Path::new("x.wdl")).unwrap_err();
    assert!(matches!(err, HydrantError::MalformedWdl { .. }));

    let err = WdlDocument::parse_str("task {\n}\nworkflow w {}\n", Path::new("x.wdl")).unwrap_err();
    assert!(matches!(err, HydrantError::MalformedWdl { .. }));
}

#[test]
fn test_task_from_text_ignores_later_lines() {
    assert!(Task::from_text("task\nfoo {\n}").is_none());
    assert!(Task::from_text("task }").is_none());
    let task = Task::from_text("task foo{\n  command {}\n}\n").unwrap();
    assert_eq!(task.name(), "foo");
}

#[test]
fn test_unterminated_task_is_malformed() {
    let err = WdlDocument::parse_str("task a {\n}\n", Path::new("x.wdl")).unwrap_err();
    assert!(matches!(err, HydrantError::MalformedWdl { .. }));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_duplicate_task_keeps_first_position_last_text() {
    let doc = doc("task a {\n  one\n}\ntask b {\n}\ntask a {\n  two\n}\nworkflow w {}\n");
    let names: Vec<_> = doc.tasks().keys().cloned().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(doc.task("a").unwrap().text().contains("two"));
}

#[test]
fn test_no_workflow() {
    let doc = doc("");
    assert!(doc.tasks().is_empty());
    assert_eq!(doc.workflow(), None);
    assert_eq!(doc.render_text(), "");
}

#[test]
fn test_parse_file() {
    let temp = TempDir::new().unwrap();
    let reference = TaskReference::parse("wf.foo").unwrap().unwrap();
    let path = reference.wdl_path(temp.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, WF).unwrap();

    let doc = WdlDocument::parse(&path).unwrap();
    let selected = doc.select(&reference.selector).unwrap();
    assert_eq!(selected[0].name(), "foo");
    assert_eq!(doc.path(), path);
}

#[test]
fn test_parse_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = WdlDocument::parse(temp.path().join("gone.wdl")).unwrap_err();
    assert!(matches!(err, HydrantError::FileNotFound { .. }));
}
