//! Fixed path and invocation context resolution for hydrant.
//!
//! The per-user directory (`~/.hydrant/`) is resolved once at process start
//! into a [`FixedPaths`] value and passed by parameter to everything that needs
//! it. Nothing reads the home directory from ambient state after that, which
//! keeps config loading testable with an injected home directory.

use crate::error::{HydrantError, Result};
use crate::fs::atomic_write_file;
use std::env;
use std::path::{Path, PathBuf};

/// File name shared by the user-, workflow- and task-level config files.
pub const CONFIG_FILE_NAME: &str = "hydrant.cfg";

/// Name of the per-user directory under the home directory.
pub const USER_DIR_NAME: &str = ".hydrant";

/// A directory holding this file is a task (Docker repository) directory.
pub const BUILD_DESCRIPTOR: &str = "Dockerfile";

/// Contents written to `~/.hydrant/hydrant.cfg` on first run.
pub const DEFAULT_USER_CONFIG: &str = "\
# Hydrant user configuration.
# Lists (e.g. Workspaces) may be written with commas: Workspaces=ws1,ws2,ws3
# Values may reference other keys of the same section with %(key)s.

[All]
Logfile
Cromwell = https://github.com/broadinstitute/cromwell/releases/download/29/cromwell-29.jar
WDLtool = https://github.com/broadinstitute/wdltool/releases/download/0.14/wdltool-0.14.jar

[FireCloud]
MethodNamespace
Workspaces
Synopsis
Documentation
SnapshotComment

[Docker]
Registry
Namespace
Tag
";

/// Well-known locations that do not depend on the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPaths {
    /// The user's home directory.
    pub home: PathBuf,

    /// Absolute path to the per-user directory (default: `~/.hydrant/`).
    pub user_dir: PathBuf,
}

impl FixedPaths {
    /// Build the fixed paths for a given home directory.
    pub fn from_home<P: AsRef<Path>>(home: P) -> Self {
        let home = home.as_ref().to_path_buf();
        let user_dir = home.join(USER_DIR_NAME);
        Self { home, user_dir }
    }

    /// Resolve the fixed paths from the current user's home directory.
    pub fn resolve() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            HydrantError::UserError("could not determine the home directory".to_string())
        })?;
        Ok(Self::from_home(home))
    }

    /// Path to the user-level config file.
    pub fn user_config(&self) -> PathBuf {
        self.user_dir.join(CONFIG_FILE_NAME)
    }

    /// Expand a leading `~/` against the home directory.
    pub fn expand_home<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        match path.strip_prefix("~") {
            Ok(rest) => self.home.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Ensure the user directory and its default config file exist.
    ///
    /// Returns `true` when the config file had to be generated.
    pub fn initialize_user_dir(&self) -> Result<bool> {
        let user_config = self.user_config();
        if user_config.is_file() {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.user_dir).map_err(|e| {
            HydrantError::UserError(format!(
                "failed to create user directory '{}': {}",
                self.user_dir.display(),
                e
            ))
        })?;
        atomic_write_file(&user_config, DEFAULT_USER_CONFIG)?;
        Ok(true)
    }
}

/// Everything a command needs to know about where it was invoked.
#[derive(Debug, Clone)]
pub struct HydrantContext {
    /// Absolute working directory the command operates on.
    pub cwd: PathBuf,

    /// Fixed per-user locations.
    pub paths: FixedPaths,

    /// Config file passed with `--config`, applied with highest precedence.
    pub explicit_config: Option<PathBuf>,
}

impl HydrantContext {
    /// Resolve the context from the process working directory and home.
    pub fn resolve(explicit_config: Option<PathBuf>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            HydrantError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(Self::new(cwd, FixedPaths::resolve()?, explicit_config))
    }

    /// Build a context from explicit parts. Used by tests and by `resolve`.
    pub fn new(cwd: PathBuf, paths: FixedPaths, explicit_config: Option<PathBuf>) -> Self {
        // A relative --config is relative to where the command was run.
        let explicit_config = explicit_config.map(|p| if p.is_relative() { cwd.join(p) } else { p });
        Self {
            cwd,
            paths,
            explicit_config,
        }
    }

    /// Name of the working directory, which doubles as the workflow or task name.
    pub fn dir_name(&self) -> Result<String> {
        self.cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                HydrantError::UserError(format!(
                    "cannot derive a name from directory '{}'",
                    self.cwd.display()
                ))
            })
    }
}

/// Whether `dir` is a task directory (contains a Dockerfile).
pub fn is_task_dir(dir: &Path) -> bool {
    dir.join(BUILD_DESCRIPTOR).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_paths_layout() {
        let paths = FixedPaths::from_home("/home/alice");
        assert_eq!(paths.user_dir, PathBuf::from("/home/alice/.hydrant"));
        assert_eq!(
            paths.user_config(),
            PathBuf::from("/home/alice/.hydrant/hydrant.cfg")
        );
    }

    #[test]
    fn test_expand_home() {
        let paths = FixedPaths::from_home("/home/alice");
        assert_eq!(
            paths.expand_home("~/logs/hydrant.log"),
            PathBuf::from("/home/alice/logs/hydrant.log")
        );
        assert_eq!(paths.expand_home("/var/log/h.log"), PathBuf::from("/var/log/h.log"));
        assert_eq!(paths.expand_home("rel.log"), PathBuf::from("rel.log"));
    }

    #[test]
    fn test_initialize_user_dir_creates_default_config() {
        let home = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(home.path());

        assert!(paths.initialize_user_dir().unwrap());
        let content = std::fs::read_to_string(paths.user_config()).unwrap();
        assert_eq!(content, DEFAULT_USER_CONFIG);

        // Second run leaves the (possibly edited) file alone
        std::fs::write(paths.user_config(), "[All]\n").unwrap();
        assert!(!paths.initialize_user_dir().unwrap());
        let content = std::fs::read_to_string(paths.user_config()).unwrap();
        assert_eq!(content, "[All]\n");
    }

    #[test]
    fn test_context_resolves_relative_explicit_config() {
        let ctx = HydrantContext::new(
            PathBuf::from("/work/flows"),
            FixedPaths::from_home("/home/alice"),
            Some(PathBuf::from("cli.cfg")),
        );
        assert_eq!(ctx.explicit_config, Some(PathBuf::from("/work/flows/cli.cfg")));
        assert_eq!(ctx.dir_name().unwrap(), "flows");
    }

    #[test]
    fn test_is_task_dir() {
        let dir = TempDir::new().unwrap();
        assert!(!is_task_dir(dir.path()));
        std::fs::write(dir.path().join(BUILD_DESCRIPTOR), "FROM scratch\n").unwrap();
        assert!(is_task_dir(dir.path()));
    }
}
