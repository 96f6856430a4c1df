//! Typed configuration model.
//!
//! Each fixed section (`All`, `FireCloud`, `Docker`) has an explicit list of
//! known keys; anything else in those sections is ignored. `Task <name>`
//! sections are open-ended and collected into an ordered map.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A resolved config value: a single string, or a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Interpret a raw value.
    ///
    /// Values are trimmed; a value containing a comma becomes a list of
    /// trimmed parts; an empty value (or a key with no value) is absent.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.is_empty() {
            None
        } else if raw.contains(',') {
            Some(FieldValue::List(
                raw.split(',').map(|part| part.trim().to_string()).collect(),
            ))
        } else {
            Some(FieldValue::Scalar(raw.to_string()))
        }
    }

    /// The value if it is a single string.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// The value as a list; a scalar is a list of one.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            FieldValue::Scalar(s) => vec![s.clone()],
            FieldValue::List(items) => items.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&serialize_list(items)),
        }
    }
}

/// Split a comma-separated value into trimmed parts.
///
/// Returns `None` for an empty or whitespace-only value.
pub fn parse_list(raw: &str) -> Option<Vec<String>> {
    FieldValue::parse(Some(raw)).map(|v| v.to_list())
}

/// Join items back into the comma-separated form accepted by [`parse_list`].
pub fn serialize_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// `[All]`: logging and external tool locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllSection {
    pub logfile: Option<FieldValue>,
    /// URL or local path of the workflow execution jar.
    pub cromwell: Option<FieldValue>,
    /// URL or local path of the WDL validator jar.
    pub wdltool: Option<FieldValue>,
}

impl AllSection {
    pub const NAME: &'static str = "All";
    pub const LOGFILE: &'static str = "Logfile";
    pub const CROMWELL: &'static str = "Cromwell";
    pub const WDLTOOL: &'static str = "WDLtool";
    pub const FIELDS: &'static [&'static str] = &[Self::LOGFILE, Self::CROMWELL, Self::WDLTOOL];
}

/// `[FireCloud]`: method repository defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FireCloudSection {
    pub method_namespace: Option<FieldValue>,
    pub workspaces: Option<FieldValue>,
    pub synopsis: Option<FieldValue>,
    pub documentation: Option<FieldValue>,
    pub snapshot_comment: Option<FieldValue>,
}

impl FireCloudSection {
    pub const NAME: &'static str = "FireCloud";
    pub const METHOD_NAMESPACE: &'static str = "MethodNamespace";
    pub const WORKSPACES: &'static str = "Workspaces";
    pub const SYNOPSIS: &'static str = "Synopsis";
    pub const DOCUMENTATION: &'static str = "Documentation";
    pub const SNAPSHOT_COMMENT: &'static str = "SnapshotComment";
    pub const FIELDS: &'static [&'static str] = &[
        Self::METHOD_NAMESPACE,
        Self::WORKSPACES,
        Self::SYNOPSIS,
        Self::DOCUMENTATION,
        Self::SNAPSHOT_COMMENT,
    ];
}

/// `[Docker]`: image coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerSection {
    pub registry: Option<FieldValue>,
    pub namespace: Option<FieldValue>,
    pub tag: Option<FieldValue>,
}

impl DockerSection {
    pub const NAME: &'static str = "Docker";
    pub const REGISTRY: &'static str = "Registry";
    pub const NAMESPACE: &'static str = "Namespace";
    pub const TAG: &'static str = "Tag";
    pub const FIELDS: &'static [&'static str] = &[Self::REGISTRY, Self::NAMESPACE, Self::TAG];

    /// Fill every absent field from `fallback`.
    pub fn or(&self, fallback: &DockerSection) -> DockerSection {
        DockerSection {
            registry: self.registry.clone().or_else(|| fallback.registry.clone()),
            namespace: self.namespace.clone().or_else(|| fallback.namespace.clone()),
            tag: self.tag.clone().or_else(|| fallback.tag.clone()),
        }
    }
}

/// `[Task <name>]`: per-task source location and image coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskSection {
    /// Directory whose contents seed the task's `src/`.
    pub src: Option<FieldValue>,
    #[serde(flatten)]
    pub docker: DockerSection,
}

impl TaskSection {
    /// Section names starting with this prefix declare a task.
    pub const NAME_PREFIX: &'static str = "Task ";
    pub const SRC: &'static str = "Src";
    pub const FIELDS: &'static [&'static str] = &[
        Self::SRC,
        DockerSection::REGISTRY,
        DockerSection::NAMESPACE,
        DockerSection::TAG,
    ];
}

/// The fully resolved, layered configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigValue {
    pub all: AllSection,
    pub firecloud: FireCloudSection,
    pub docker: DockerSection,
    /// `None` when no `[Task ...]` section exists in any layer.
    pub tasks: Option<IndexMap<String, TaskSection>>,
}

impl ConfigValue {
    /// Docker coordinates for a task: the task section over the global one.
    pub fn docker_for_task(&self, task: &str) -> DockerSection {
        match self.tasks.as_ref().and_then(|tasks| tasks.get(task)) {
            Some(section) => section.docker.or(&self.docker),
            None => self.docker.clone(),
        }
    }

    /// Names of the configured tasks, in declaration order.
    pub fn task_names(&self) -> Vec<String> {
        self.tasks
            .as_ref()
            .map(|tasks| tasks.keys().cloned().collect())
            .unwrap_or_default()
    }
}
