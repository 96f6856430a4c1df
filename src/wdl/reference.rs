//! References to tasks of another workflow: `<workflow>.<task>` or `<workflow>.*`.

use crate::error::{HydrantError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which tasks of the referenced workflow to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSelector {
    All,
    Named(String),
}

/// A reference to one or all tasks of an existing workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReference {
    pub workflow: String,
    pub selector: TaskSelector,
}

impl TaskReference {
    /// Parse `wf.task` or `wf.*`.
    ///
    /// Returns `Ok(None)` for a plain task name (no `.`), which callers treat
    /// as a new task.
    pub fn parse(entry: &str) -> Result<Option<Self>> {
        let Some((workflow, task)) = entry.split_once('.') else {
            return Ok(None);
        };
        let (workflow, task) = (workflow.trim(), task.trim());
        if workflow.is_empty() || task.is_empty() {
            return Err(HydrantError::UserError(format!(
                "invalid task reference '{}': expected <workflow>.<task> or <workflow>.*",
                entry
            )));
        }

        let selector = match task {
            "*" => TaskSelector::All,
            name => TaskSelector::Named(name.to_string()),
        };
        Ok(Some(Self {
            workflow: workflow.to_string(),
            selector,
        }))
    }

    /// `<base>/<workflow>/<workflow>.wdl`
    pub fn wdl_path(&self, base: &Path) -> PathBuf {
        base.join(&self.workflow).join(format!("{}.wdl", self.workflow))
    }
}

impl fmt::Display for TaskReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            TaskSelector::All => write!(f, "{}.*", self.workflow),
            TaskSelector::Named(name) => write!(f, "{}.{}", self.workflow, name),
        }
    }
}
