//! Task and workflow blocks of an existing WDL file.
//!
//! [`WdlDocument`] recovers reusable task definitions from a WDL file so they
//! can be spliced verbatim into a newly generated workflow. Parsing is purely
//! lexical (see [`blocks`]); task bodies are never interpreted.

mod blocks;
mod reference;

#[cfg(test)]
mod tests;

pub use blocks::{Block, BlockKind, SplitError, split_blocks};
pub use reference::{TaskReference, TaskSelector};

use crate::error::{HydrantError, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One task block: `task <name> { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    text: String,
}

impl Task {
    /// Build a task from its raw block text (trailing whitespace is dropped).
    ///
    /// The name is the second whitespace-delimited token of the `task`
    /// line, without a `{` glued to it.
    pub fn from_text(text: &str) -> Option<Self> {
        let text = text.trim_end();
        let name = text
            .lines()
            .next()?
            .split_whitespace()
            .nth(1)?
            .trim_end_matches('{');
        if name.is_empty() || name.chars().all(|c| c == '{' || c == '}') {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw task text exactly as it appeared in the source.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The tasks (in source order) and the workflow block of one WDL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WdlDocument {
    path: PathBuf,
    tasks: IndexMap<String, Task>,
    workflow: Option<String>,
}

impl WdlDocument {
    /// Read and segment a WDL file.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HydrantError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => HydrantError::UserError(format!(
                "failed to read WDL '{}': {}",
                path.display(),
                e
            )),
        })?;
        Self::parse_str(&source, path)
    }

    /// Segment WDL source. `path` is recorded for error messages.
    pub fn parse_str(source: &str, path: &Path) -> Result<Self> {
        let blocks = split_blocks(source.split_inclusive('\n'))
            .map_err(|e| HydrantError::malformed_wdl(path, e.message))?;

        let mut tasks = IndexMap::new();
        let mut workflow = None;
        for block in blocks {
            match block.kind {
                BlockKind::Task => {
                    let task = Task::from_text(&block.text).ok_or_else(|| {
                        HydrantError::malformed_wdl(
                            path,
                            format!("task at line {} has no name", block.line),
                        )
                    })?;
                    if tasks.contains_key(task.name()) {
                        warn!(
                            "{} defines task '{}' more than once; keeping the last definition",
                            path.display(),
                            task.name()
                        );
                    }
                    tasks.insert(task.name().to_string(), task);
                }
                BlockKind::Workflow => workflow = Some(block.text),
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            tasks,
            workflow,
        })
    }

    /// Path the document was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tasks in order of first appearance.
    pub fn tasks(&self) -> &IndexMap<String, Task> {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Raw workflow block, if the file has one.
    pub fn workflow(&self) -> Option<&str> {
        self.workflow.as_deref()
    }

    /// Select tasks by name, or all of them in source order.
    pub fn select(&self, selector: &TaskSelector) -> Result<Vec<&Task>> {
        match selector {
            TaskSelector::All => Ok(self.tasks.values().collect()),
            TaskSelector::Named(name) => {
                let task = self.task(name).ok_or_else(|| HydrantError::TaskNotFound {
                    task: name.clone(),
                    path: self.path.clone(),
                })?;
                Ok(vec![task])
            }
        }
    }

    /// Every task followed by a blank line, then the workflow block.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for task in self.tasks.values() {
            out.push_str(task.text());
            out.push_str("\n\n");
        }
        if let Some(workflow) = &self.workflow {
            out.push_str(workflow);
        }
        out
    }
}
