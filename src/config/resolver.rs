//! Layered config resolution.
//!
//! Layers are applied lowest to highest precedence:
//!
//! 1. user-level `~/.hydrant/hydrant.cfg` (required)
//! 2. workflow-level `hydrant.cfg` (optional)
//! 3. task-level `hydrant.cfg`, only inside a task directory (optional)
//! 4. the file passed with `--config` (optional, must exist when given)
//!
//! Layers are overlaid key by key: a key missing from a later layer keeps its
//! earlier value. Interpolation runs on the merged result.

use super::ini::IniFile;
use super::model::{
    AllSection, ConfigValue, DockerSection, FieldValue, FireCloudSection, TaskSection,
};
use crate::context::{CONFIG_FILE_NAME, FixedPaths, is_task_dir};
use crate::error::{HydrantError, Result};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Section whose keys act as fallbacks for every other section.
const DEFAULT_SECTION: &str = "DEFAULT";

/// Maximum nesting of `%(key)s` references.
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Where a config layer comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    User,
    Workflow,
    Task,
    Explicit,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::User => "user",
            LayerKind::Workflow => "workflow",
            LayerKind::Task => "task",
            LayerKind::Explicit => "command-line",
        };
        f.write_str(name)
    }
}

/// One config file taking part in resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub kind: LayerKind,
    pub path: PathBuf,
}

/// Loads and merges the config layers that apply to a directory.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    paths: &'a FixedPaths,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(paths: &'a FixedPaths) -> Self {
        Self { paths }
    }

    /// List the layers for `workflow_path`, lowest precedence first.
    ///
    /// If `workflow_path` holds a Dockerfile it is a task directory and its
    /// parent holds the workflow-level file.
    pub fn layers(&self, workflow_path: &Path, explicit: Option<&Path>) -> Result<Vec<ConfigLayer>> {
        let user = self.paths.user_config();
        if !user.is_file() {
            return Err(HydrantError::ConfigNotFound { path: user });
        }

        let mut layers = vec![ConfigLayer {
            kind: LayerKind::User,
            path: user,
        }];

        let dir = std::path::absolute(workflow_path).map_err(|e| {
            HydrantError::UserError(format!(
                "cannot resolve directory '{}': {}",
                workflow_path.display(),
                e
            ))
        })?;

        if is_task_dir(&dir) {
            if let Some(parent) = dir.parent() {
                layers.push(ConfigLayer {
                    kind: LayerKind::Workflow,
                    path: parent.join(CONFIG_FILE_NAME),
                });
            }
            layers.push(ConfigLayer {
                kind: LayerKind::Task,
                path: dir.join(CONFIG_FILE_NAME),
            });
        } else {
            layers.push(ConfigLayer {
                kind: LayerKind::Workflow,
                path: dir.join(CONFIG_FILE_NAME),
            });
        }

        if let Some(explicit) = explicit {
            if !explicit.is_file() {
                return Err(HydrantError::ExplicitFileNotFound {
                    path: explicit.to_path_buf(),
                });
            }
            layers.push(ConfigLayer {
                kind: LayerKind::Explicit,
                path: explicit.to_path_buf(),
            });
        }

        Ok(layers)
    }

    /// Load, merge and project every layer that applies to `workflow_path`.
    pub fn load(&self, workflow_path: &Path, explicit: Option<&Path>) -> Result<ConfigValue> {
        let mut merged = MergedConfig::default();

        for layer in self.layers(workflow_path, explicit)? {
            let text = match std::fs::read_to_string(&layer.path) {
                Ok(text) => text,
                Err(e) => match layer.kind {
                    LayerKind::User => {
                        return Err(HydrantError::ConfigNotFound { path: layer.path });
                    }
                    LayerKind::Explicit => {
                        return Err(HydrantError::UserError(format!(
                            "failed to read config file '{}': {}",
                            layer.path.display(),
                            e
                        )));
                    }
                    LayerKind::Workflow | LayerKind::Task => {
                        if layer.path.exists() {
                            warn!("skipping unreadable {} config {}: {}", layer.kind, layer.path.display(), e);
                        }
                        continue;
                    }
                },
            };

            debug!("loading {} config {}", layer.kind, layer.path.display());
            let ini = IniFile::parse(&text, &layer.path)?;
            merged.overlay(ini, &layer.path)?;
        }

        merged.resolve()
    }
}

/// A raw value together with the file that last set it.
#[derive(Debug, Clone)]
struct RawEntry {
    value: Option<String>,
    source: PathBuf,
}

/// Every layer overlaid, before interpolation and projection.
#[derive(Debug, Default)]
struct MergedConfig {
    sections: IndexMap<String, IndexMap<String, RawEntry>>,
    /// Canonical task section name -> first raw header seen for it.
    task_headers: HashMap<String, String>,
}

impl MergedConfig {
    fn overlay(&mut self, ini: IniFile, source: &Path) -> Result<()> {
        for (header, entries) in ini.sections {
            let name = self.canonical_section_name(&header, source)?;
            let section = self.sections.entry(name).or_default();
            for (key, value) in entries {
                section.insert(
                    key,
                    RawEntry {
                        value,
                        source: source.to_path_buf(),
                    },
                );
            }
        }
        Ok(())
    }

    /// `[Task  foo ]` and `[Task foo]` both name task `foo`.
    fn canonical_section_name(&mut self, header: &str, source: &Path) -> Result<String> {
        let Some(task) = header.strip_prefix(TaskSection::NAME_PREFIX) else {
            return Ok(header.to_string());
        };
        let task = task.trim();
        if task.is_empty() {
            return Err(HydrantError::config_parse(
                source,
                format!("section '[{}]' does not name a task", header),
            ));
        }

        let canonical = format!("{}{}", TaskSection::NAME_PREFIX, task);
        let first = self
            .task_headers
            .entry(canonical.clone())
            .or_insert_with(|| header.to_string());
        if first != header {
            warn!(
                "sections '[{}]' and '[{}]' both configure task '{}'; later values win",
                first, header, task
            );
        }
        Ok(canonical)
    }

    fn resolve(&self) -> Result<ConfigValue> {
        let all = self.view(AllSection::NAME);
        let firecloud = self.view(FireCloudSection::NAME);
        let docker = self.view(DockerSection::NAME);

        let all = AllSection {
            logfile: all.field(AllSection::LOGFILE)?,
            cromwell: all.field(AllSection::CROMWELL)?,
            wdltool: all.field(AllSection::WDLTOOL)?,
        };
        let firecloud = FireCloudSection {
            method_namespace: firecloud.field(FireCloudSection::METHOD_NAMESPACE)?,
            workspaces: firecloud.field(FireCloudSection::WORKSPACES)?,
            synopsis: firecloud.field(FireCloudSection::SYNOPSIS)?,
            documentation: firecloud.field(FireCloudSection::DOCUMENTATION)?,
            snapshot_comment: firecloud.field(FireCloudSection::SNAPSHOT_COMMENT)?,
        };
        let docker = docker_section(&docker)?;

        let mut tasks = IndexMap::new();
        for name in self.sections.keys() {
            let Some(task) = name.strip_prefix(TaskSection::NAME_PREFIX) else {
                continue;
            };
            let view = self.view(name);
            view.log_unknown_keys(TaskSection::FIELDS);
            tasks.insert(
                task.to_string(),
                TaskSection {
                    src: view.field(TaskSection::SRC)?,
                    docker: docker_section(&view)?,
                },
            );
        }

        self.view(AllSection::NAME).log_unknown_keys(AllSection::FIELDS);
        self.view(FireCloudSection::NAME)
            .log_unknown_keys(FireCloudSection::FIELDS);
        self.view(DockerSection::NAME).log_unknown_keys(DockerSection::FIELDS);

        Ok(ConfigValue {
            all,
            firecloud,
            docker,
            tasks: if tasks.is_empty() { None } else { Some(tasks) },
        })
    }

    fn view<'m>(&'m self, name: &'m str) -> SectionView<'m> {
        SectionView {
            name,
            own: self.sections.get(name),
            defaults: self.sections.get(DEFAULT_SECTION),
        }
    }
}

fn docker_section(view: &SectionView<'_>) -> Result<DockerSection> {
    Ok(DockerSection {
        registry: view.field(DockerSection::REGISTRY)?,
        namespace: view.field(DockerSection::NAMESPACE)?,
        tag: view.field(DockerSection::TAG)?,
    })
}

/// One merged section seen through the `DEFAULT` fallbacks.
struct SectionView<'m> {
    name: &'m str,
    own: Option<&'m IndexMap<String, RawEntry>>,
    defaults: Option<&'m IndexMap<String, RawEntry>>,
}

impl SectionView<'_> {
    fn entry(&self, key: &str) -> Option<&RawEntry> {
        self.own
            .and_then(|own| own.get(key))
            .or_else(|| self.defaults.and_then(|defaults| defaults.get(key)))
    }

    /// Resolve a key: interpolate, then split lists and drop empty values.
    fn field(&self, key: &str) -> Result<Option<FieldValue>> {
        let Some(entry) = self.entry(key) else {
            return Ok(None);
        };
        let Some(raw) = entry.value.as_deref() else {
            return Ok(None);
        };
        let expanded = self.interpolate(key, raw, &entry.source, 1)?;
        Ok(FieldValue::parse(Some(&expanded)))
    }

    /// Expand `%(other)s` references and `%%` escapes.
    fn interpolate(&self, key: &str, raw: &str, source: &Path, depth: usize) -> Result<String> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(HydrantError::config_parse(
                source,
                format!(
                    "interpolation of '{}' in [{}] nests deeper than {} levels",
                    key, self.name, MAX_INTERPOLATION_DEPTH
                ),
            ));
        }

        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('%') {
                out.push('%');
                rest = tail;
            } else if let Some(tail) = after.strip_prefix('(')
                && let Some(end) = tail.find(")s")
            {
                let reference = &tail[..end];
                let entry = self.entry(reference).ok_or_else(|| {
                    HydrantError::config_parse(
                        source,
                        format!(
                            "'{}' in [{}] references unknown key '%({})s'",
                            key, self.name, reference
                        ),
                    )
                })?;
                let value = entry.value.as_deref().unwrap_or("");
                out.push_str(&self.interpolate(reference, value, &entry.source, depth + 1)?);
                rest = &tail[end + 2..];
            } else {
                return Err(HydrantError::config_parse(
                    source,
                    format!(
                        "'%' in '{}' of [{}] must be followed by '%' or '(name)s'",
                        key, self.name
                    ),
                ));
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn log_unknown_keys(&self, known: &[&str]) {
        let Some(own) = self.own else {
            return;
        };
        for key in own.keys().filter(|k| !known.contains(&k.as_str())) {
            debug!("ignoring unknown key '{}' in [{}]", key, self.name);
        }
    }
}
