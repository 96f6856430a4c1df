//! Writing task-level config files.
//!
//! `init` and `build` record a task's image coordinates in
//! `<task>/hydrant.cfg` so later commands run inside the task directory pick
//! them up as the task layer.

use super::model::DockerSection;
use crate::context::CONFIG_FILE_NAME;
use crate::error::Result;
use crate::fs::atomic_write_file;
use std::path::{Path, PathBuf};

/// Render a `[Docker]` section, omitting absent fields.
pub fn render_docker_section(docker: &DockerSection) -> String {
    let fields = [
        (DockerSection::REGISTRY, &docker.registry),
        (DockerSection::NAMESPACE, &docker.namespace),
        (DockerSection::TAG, &docker.tag),
    ];

    let mut out = format!("[{}]\n", DockerSection::NAME);
    for (key, value) in fields {
        if let Some(value) = value {
            out.push_str(&format!("{} = {}\n", key, value));
        }
    }
    out.push('\n');
    out
}

/// Replace `<task_dir>/hydrant.cfg` with the given `[Docker]` section.
pub fn write_task_config(task_dir: &Path, docker: &DockerSection) -> Result<PathBuf> {
    let path = task_dir.join(CONFIG_FILE_NAME);
    atomic_write_file(&path, &render_docker_section(docker))?;
    Ok(path)
}
