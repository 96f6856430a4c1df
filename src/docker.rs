//! Docker image coordinates and the `docker` CLI.
//!
//! A Docker repository is a directory holding a `Dockerfile`; its name is the
//! directory name. Images are tagged `[registry/]namespace/repository:tag`.

use crate::config::ConfigResolver;
use crate::context::is_task_dir;
use crate::error::{HydrantError, Result};
use crate::tools::{ToolOutput, run_tool};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Tag used when neither the command line nor the config names one.
pub const DEFAULT_TAG: &str = "latest";

/// A fully qualified image name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub registry: Option<String>,
    pub namespace: String,
    pub repository: String,
    pub tag: Option<String>,
}

impl ImageTag {
    pub fn new(
        registry: Option<&str>,
        namespace: &str,
        repository: &str,
        tag: Option<&str>,
    ) -> Self {
        Self {
            registry: registry.map(str::to_string),
            namespace: namespace.to_string(),
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
        }
    }

    /// The name without its tag.
    pub fn repository_path(&self) -> String {
        match &self.registry {
            Some(registry) => format!("{}/{}/{}", registry, self.namespace, self.repository),
            None => format!("{}/{}", self.namespace, self.repository),
        }
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repository_path())?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}

/// Split a `repository[:tag]` argument.
pub fn split_repo_arg(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once(':') {
        Some((repo, tag)) => (repo, Some(tag)),
        None => (arg, None),
    }
}

/// A buildable directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerRepo {
    pub name: String,
    pub path: PathBuf,
    /// Tag from the directory's resolved config, else `latest`.
    pub tag: String,
}

/// Docker repositories at `dir`: `dir` itself if it holds a Dockerfile,
/// otherwise its immediate subdirectories that do, ordered by name.
pub fn docker_repos(
    dir: &Path,
    resolver: &ConfigResolver<'_>,
    explicit: Option<&Path>,
) -> Result<Vec<DockerRepo>> {
    let candidates: Vec<PathBuf> = if is_task_dir(dir) {
        vec![dir.to_path_buf()]
    } else {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir() && is_task_dir(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    };

    let mut repos = Vec::with_capacity(candidates.len());
    for path in candidates {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let config = resolver.load(&path, explicit)?;
        let tag = config
            .docker
            .tag
            .as_ref()
            .and_then(|tag| tag.as_scalar())
            .unwrap_or(DEFAULT_TAG)
            .to_string();
        repos.push(DockerRepo { name, path, tag });
    }
    Ok(repos)
}

fn run_docker(cwd: &Path, args: &[&str]) -> Result<ToolOutput> {
    run_tool("docker", cwd, args)
}

/// `docker build --rm -t <image> <dir>`, logging the build output.
pub fn build_image(dir: &Path, image: &ImageTag) -> Result<()> {
    let image = image.to_string();
    let dir_arg = dir.to_string_lossy();
    info!("Building {} from {}", image, dir.display());

    let output = run_docker(dir, &["build", "--rm", "-t", &image, dir_arg.as_ref()])?;
    for line in output.lines() {
        info!("{}", line);
    }
    Ok(())
}

/// `docker push <image>`.
///
/// A registry refusing the push for lack of credentials is reported with a
/// hint to log in first; credentials are never prompted for.
pub fn push_image(cwd: &Path, image: &ImageTag) -> Result<()> {
    let image = image.to_string();
    info!("Pushing {}", image);

    match run_docker(cwd, &["push", &image]) {
        Ok(output) => {
            for line in output.lines() {
                info!("{}", line);
            }
            Ok(())
        }
        Err(HydrantError::ToolError(msg)) if msg.contains("unauthorized") => {
            Err(HydrantError::ToolError(format!(
                "{}\nNo valid credentials for {}; run `docker login` and try again",
                msg, image
            )))
        }
        Err(e) => Err(e),
    }
}
