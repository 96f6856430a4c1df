//! Workflow scaffolding for `hydrant init`.
//!
//! A new workflow directory gets one subdirectory per new task (sources,
//! Dockerfile, task-level config), an empty `tests/` directory and a WDL file
//! rendered from [`templates`]. Tasks referenced as `<workflow>.<task>` or
//! `<workflow>.*` are copied verbatim from existing sibling workflows instead.

mod reuse;
mod scaffold;
mod templates;


pub use reuse::{DEPENDENTS_FILE, ReusedTask, TaskLibrary, dependent_entry, record_dependent};
pub use scaffold::{DOCKERFILE, DOCKERIGNORE, scaffold_task};
pub use templates::TemplateSet;

use crate::config::{ConfigValue, DockerSection, FieldValue};
use crate::context::FixedPaths;
use crate::docker::DEFAULT_TAG;
use crate::error::{HydrantError, Result};
use crate::fs::atomic_write_file;
use crate::template::render_template;
use crate::wdl::TaskReference;
use chrono::Local;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Who the generated WDL names as its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub fullname: String,
    pub username: String,
}

impl Identity {
    /// The current OS account.
    pub fn current() -> Self {
        Self {
            fullname: whoami::realname(),
            username: whoami::username(),
        }
    }
}

/// What `init` was asked to generate.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub workflow: String,
    /// Explicit task list; entries may be references to existing tasks.
    pub tasks: Option<Vec<String>>,
    /// Number of `task_N` placeholders when no task list is available.
    pub num_tasks: usize,
    pub package: bool,
    pub namespace: Option<String>,
    pub tag: Option<String>,
}

/// One task of the workflow being generated.
#[derive(Debug, Clone)]
enum PlannedTask {
    New(String),
    Reused(ReusedTask),
}

impl PlannedTask {
    fn name(&self) -> &str {
        match self {
            PlannedTask::New(name) => name,
            PlannedTask::Reused(reused) => reused.task.name(),
        }
    }
}

/// Generates workflow trees under a base directory.
pub struct Generator<'a> {
    base: &'a Path,
    config: &'a ConfigValue,
    paths: &'a FixedPaths,
    identity: Identity,
}

impl<'a> Generator<'a> {
    pub fn new(
        base: &'a Path,
        config: &'a ConfigValue,
        paths: &'a FixedPaths,
        identity: Identity,
    ) -> Self {
        Self {
            base,
            config,
            paths,
            identity,
        }
    }

    /// Names of the tasks to create: the explicit list, else the configured
    /// task sections, else `task_1..task_N`.
    pub fn task_list(&self, opts: &InitOptions) -> Vec<String> {
        if let Some(tasks) = &opts.tasks {
            return tasks.clone();
        }
        let configured = self.config.task_names();
        if !configured.is_empty() {
            return configured;
        }
        (1..=opts.num_tasks.max(1)).map(|n| format!("task_{}", n)).collect()
    }

    /// Image coordinates for a new task: command line, then the task
    /// section, then `[Docker]`; namespace defaults to the user name and tag
    /// to `latest`.
    pub fn docker_for(&self, task: &str, opts: &InitOptions) -> DockerSection {
        let cli = DockerSection {
            registry: None,
            namespace: opts.namespace.clone().map(FieldValue::Scalar),
            tag: opts.tag.clone().map(FieldValue::Scalar),
        };
        let mut docker = cli.or(&self.config.docker_for_task(task));
        if docker.namespace.is_none() {
            docker.namespace = Some(FieldValue::Scalar(self.identity.username.clone()));
        }
        if docker.tag.is_none() {
            docker.tag = Some(FieldValue::Scalar(DEFAULT_TAG.to_string()));
        }
        docker
    }

    fn plan(&self, entries: &[String]) -> Result<Vec<PlannedTask>> {
        let mut library = TaskLibrary::new(self.base);
        let mut planned = Vec::new();
        for entry in entries {
            match TaskReference::parse(entry)? {
                Some(reference) => {
                    debug!("reusing {}", reference);
                    planned.extend(library.resolve(&reference)?.into_iter().map(PlannedTask::Reused));
                }
                None => planned.push(PlannedTask::New(entry.trim().to_string())),
            }
        }

        let mut seen = HashSet::new();
        for task in &planned {
            if task.name().is_empty() {
                return Err(HydrantError::UserError("task names must not be empty".to_string()));
            }
            if !seen.insert(task.name()) {
                return Err(HydrantError::UserError(format!(
                    "task '{}' appears more than once in the workflow",
                    task.name()
                )));
            }
        }
        if planned.is_empty() {
            return Err(HydrantError::UserError("no tasks to generate".to_string()));
        }
        Ok(planned)
    }

    fn src_dir(&self, task: &str) -> Option<PathBuf> {
        let src = self
            .config
            .tasks
            .as_ref()?
            .get(task)?
            .src
            .as_ref()?
            .as_scalar()?;
        let src = self.paths.expand_home(src);
        Some(if src.is_relative() { self.base.join(src) } else { src })
    }

    fn vars(&self, workflow: &str, docker: &DockerSection) -> HashMap<String, String> {
        let namespace = docker
            .namespace
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let namespace = match &docker.registry {
            Some(registry) => format!("{}/{}", registry, namespace),
            None => namespace,
        };
        let tag = docker.tag.as_ref().map(ToString::to_string).unwrap_or_default();

        crate::template::vars([
            ("workflow", workflow.to_string()),
            ("workflowname", workflow.to_lowercase()),
            ("fullname", self.identity.fullname.clone()),
            ("username", self.identity.username.clone()),
            ("namespace", namespace),
            ("tag", tag),
        ])
    }

    /// Render the WDL for `tasks`. New tasks get the task templates; reused
    /// tasks keep their original text.
    fn render_wdl(
        &self,
        workflow: &str,
        templates: &TemplateSet,
        tasks: &[PlannedTask],
        dockers: &HashMap<String, DockerSection>,
    ) -> Result<String> {
        let mut body = String::new();
        for (idx, task) in tasks.iter().enumerate() {
            match task {
                PlannedTask::New(name) => {
                    let docker = dockers.get(name).cloned().unwrap_or_default();
                    let mut vars = self.vars(workflow, &docker);
                    vars.insert("task".to_string(), name.clone());
                    let template = if idx == 0 {
                        templates.task_1
                    } else {
                        templates.task_n
                    };
                    body.push_str(&render_template(template, &vars)?);
                }
                PlannedTask::Reused(reused) => {
                    body.push_str(reused.task.text());
                    body.push_str("\n\n");
                }
            }
        }

        let mut vars = self.vars(workflow, &DockerSection::default());
        body.push_str(&render_template(templates.workflow_start, &vars)?);
        let mut prev: Option<&str> = None;
        for task in tasks {
            vars.insert("task".to_string(), task.name().to_string());
            let template = match prev {
                None => templates.call_task_1,
                Some(prev) => {
                    vars.insert("prevtask".to_string(), prev.to_string());
                    templates.call_task_n
                }
            };
            body.push_str(&render_template(template, &vars)?);
            prev = Some(task.name());
        }
        body.push_str(&render_template(templates.workflow_end, &vars)?);
        Ok(body)
    }

    /// Generate `<base>/<workflow>/`. Returns the workflow directory.
    ///
    /// Every reference and `Src` directory is resolved before anything is
    /// written, and a failed write removes the workflow directory again.
    pub fn generate(&self, opts: &InitOptions) -> Result<PathBuf> {
        let workflow = opts.workflow.trim();
        if workflow.is_empty() || workflow.contains(['/', '\\']) || workflow.starts_with('.') {
            return Err(HydrantError::UserError(format!(
                "invalid workflow name '{}'",
                opts.workflow
            )));
        }
        let workflow_dir = self.base.join(workflow);
        if workflow_dir.exists() {
            return Err(HydrantError::UserError(format!(
                "{} already exists",
                workflow_dir.display()
            )));
        }

        let tasks = self.plan(&self.task_list(opts))?;
        // Packaging chains `<workflow>_pkg` outputs from task to task, which
        // reused tasks do not declare.
        if opts.package
            && let Some(reused) = tasks.iter().find(|t| matches!(t, PlannedTask::Reused(_)))
        {
            return Err(HydrantError::UserError(format!(
                "--package cannot be combined with reused task '{}'",
                reused.name()
            )));
        }
        let templates = TemplateSet::for_packaging(opts.package);

        let mut dockers = HashMap::new();
        let mut sources = HashMap::new();
        for task in &tasks {
            if let PlannedTask::New(name) = task {
                dockers.insert(name.clone(), self.docker_for(name, opts));
                if let Some(src) = self.src_dir(name) {
                    if !src.is_dir() {
                        return Err(HydrantError::FileNotFound { path: src });
                    }
                    sources.insert(name.clone(), src);
                }
            }
        }
        let wdl = self.render_wdl(workflow, &templates, &tasks, &dockers)?;

        if let Err(err) = self.write_tree(&workflow_dir, workflow, &tasks, &dockers, &sources, &wdl) {
            if let Err(e) = std::fs::remove_dir_all(&workflow_dir) {
                warn!("could not remove partial {}: {}", workflow_dir.display(), e);
            }
            return Err(err);
        }

        let now = Local::now();
        for task in &tasks {
            if let PlannedTask::Reused(reused) = task {
                record_dependent(self.base, reused, workflow, now)?;
                info!("Reused {}.{}", reused.origin, reused.task.name());
            }
        }

        Ok(workflow_dir)
    }

    fn write_tree(
        &self,
        workflow_dir: &Path,
        workflow: &str,
        tasks: &[PlannedTask],
        dockers: &HashMap<String, DockerSection>,
        sources: &HashMap<String, PathBuf>,
        wdl: &str,
    ) -> Result<()> {
        let tests_dir = workflow_dir.join("tests");
        std::fs::create_dir_all(&tests_dir).map_err(|e| {
            HydrantError::UserError(format!(
                "failed to create '{}': {}",
                tests_dir.display(),
                e
            ))
        })?;

        for task in tasks {
            if let PlannedTask::New(name) = task {
                let docker = dockers.get(name).cloned().unwrap_or_default();
                let src = sources.get(name).map(PathBuf::as_path);
                scaffold_task(&workflow_dir.join(name), src, &docker)?;
                info!("Created task {}", name);
            }
        }

        let wdl_path = workflow_dir.join(format!("{}.wdl", workflow));
        atomic_write_file(&wdl_path, wdl)?;
        info!("Wrote {}", wdl_path.display());
        Ok(())
    }
}
