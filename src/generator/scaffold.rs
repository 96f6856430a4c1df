//! On-disk layout of a new task directory.

use crate::config::{DockerSection, write_task_config};
use crate::context::BUILD_DESCRIPTOR;
use crate::error::{HydrantError, Result};
use crate::fs::{atomic_write_file, copy_dir_contents};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DOCKERFILE: &str = r#"FROM broadgdac/run-r:3.3.2

# Install any libraries necessary to run the task
# RUN set -ex \
#     && apt-get update \
#     && apt-get install -y --no-install-recommends \
#         libcairo2-dev \
#         libxt-dev \
#     && rm -rf /var/lib/apt/lists/* \
#     && install2.r -e \
#         Cairo \
#         data.table \
#     && rm -rf /tmp/*

# Copy the built tool and any supporting files into the image
COPY src /src

# Set the working directory
WORKDIR src
"#;

pub const DOCKERIGNORE: &str = "*\n!src\n!Dockerfile\n";

/// Create `<task_dir>/` with `src/`, a Dockerfile, a .dockerignore and a
/// task-level config recording `docker`.
///
/// When `src` is given its contents seed `src/`.
pub fn scaffold_task(task_dir: &Path, src: Option<&Path>, docker: &DockerSection) -> Result<()> {
    let src_dir = task_dir.join("src");
    fs::create_dir_all(&src_dir).map_err(|e| {
        HydrantError::UserError(format!(
            "failed to create '{}': {}",
            src_dir.display(),
            e
        ))
    })?;

    if let Some(src) = src {
        let copied = copy_dir_contents(src, &src_dir)?;
        info!("Copied {} entries from {} into {}", copied, src.display(), src_dir.display());
    }

    atomic_write_file(task_dir.join(BUILD_DESCRIPTOR), DOCKERFILE)?;
    atomic_write_file(task_dir.join(".dockerignore"), DOCKERIGNORE)?;
    write_task_config(task_dir, docker)?;
    Ok(())
}
