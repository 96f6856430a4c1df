//! Reuse of tasks from existing workflows.
//!
//! Every task spliced into a new workflow leaves a trace in its home task
//! directory: a `.dependents` file listing, one per line, when and by which
//! workflow it was reused. Changing a task with dependents affects them too.

use crate::error::Result;
use crate::fs::append_line;
use crate::wdl::{Task, TaskReference, WdlDocument};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the per-task dependents log.
pub const DEPENDENTS_FILE: &str = ".dependents";

/// A task taken verbatim from another workflow.
#[derive(Debug, Clone)]
pub struct ReusedTask {
    pub task: Task,
    /// Workflow the task was taken from.
    pub origin: String,
}

impl ReusedTask {
    /// `<base>/<origin>/<task>`, where the task's sources live.
    pub fn origin_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.origin).join(self.task.name())
    }
}

/// Resolves task references against sibling workflows, parsing each
/// referenced WDL at most once.
#[derive(Debug)]
pub struct TaskLibrary<'a> {
    base: &'a Path,
    documents: HashMap<String, WdlDocument>,
}

impl<'a> TaskLibrary<'a> {
    /// Workflows are looked up as `<base>/<workflow>/<workflow>.wdl`.
    pub fn new(base: &'a Path) -> Self {
        Self {
            base,
            documents: HashMap::new(),
        }
    }

    /// The tasks a reference selects, in source order.
    pub fn resolve(&mut self, reference: &TaskReference) -> Result<Vec<ReusedTask>> {
        if !self.documents.contains_key(&reference.workflow) {
            let doc = WdlDocument::parse(reference.wdl_path(self.base))?;
            self.documents.insert(reference.workflow.clone(), doc);
        }
        let Some(doc) = self.documents.get(&reference.workflow) else {
            return Ok(Vec::new());
        };

        let tasks = doc.select(&reference.selector)?;
        Ok(tasks
            .into_iter()
            .map(|task| ReusedTask {
                task: task.clone(),
                origin: reference.workflow.clone(),
            })
            .collect())
    }
}

/// One dependents log line: `<RFC 3339 timestamp>\t<workflow>`.
pub fn dependent_entry(workflow: &str, at: DateTime<Local>) -> String {
    format!("{}\t{}", at.to_rfc3339(), workflow)
}

/// Append `workflow` to the dependents log of a reused task.
///
/// Returns `false` (with a warning) when the task has no directory of its
/// own to record into.
pub fn record_dependent(
    base: &Path,
    reused: &ReusedTask,
    workflow: &str,
    at: DateTime<Local>,
) -> Result<bool> {
    let dir = reused.origin_dir(base);
    if !dir.is_dir() {
        warn!(
            "{} has no task directory at {}; not recording {} as a dependent",
            reused.task.name(),
            dir.display(),
            workflow
        );
        return Ok(false);
    }
    append_line(dir.join(DEPENDENTS_FILE), &dependent_entry(workflow, at))?;
    Ok(true)
}
