//! External tool runner for hydrant.
//!
//! `docker` and the Java jars (WDL validator, Cromwell) are driven as
//! subprocesses. All of them go through [`run_tool`] (captured output) or
//! [`run_tool_inherit`] (output streamed to the terminal), so a failure to
//! launch or a non-zero exit always surfaces as [`HydrantError::ToolError`].

use crate::config::FieldValue;
use crate::context::FixedPaths;
use crate::error::{HydrantError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Captured output of a successful tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output (trimmed).
    pub stdout: String,
    /// Standard error (trimmed).
    pub stderr: String,
}

impl ToolOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Stdout lines, empty if there was no output.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }
}

fn describe(program: &str, args: &[&str]) -> String {
    match args.first() {
        Some(sub) => format!("{} {}", program, sub),
        None => program.to_string(),
    }
}

/// Run `program args...` in `cwd`, capturing stdout and stderr.
///
/// A non-zero exit is a `ToolError` carrying stderr (or stdout when stderr is
/// empty).
pub fn run_tool<P: AsRef<Path>>(program: &str, cwd: P, args: &[&str]) -> Result<ToolOutput> {
    let name = describe(program, args);
    debug!("running {} {:?}", program, args);

    let output = Command::new(program)
        .current_dir(cwd.as_ref())
        .args(args)
        .output()
        .map_err(|e| HydrantError::ToolError(format!("failed to execute {}: {}", name, e)))?;

    let tool_output = ToolOutput::from_output(&output);

    if output.status.success() {
        Ok(tool_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if tool_output.stderr.is_empty() {
            tool_output.stdout.clone()
        } else {
            tool_output.stderr.clone()
        };
        Err(HydrantError::ToolError(format!(
            "{} failed (exit code {}): {}",
            name, exit_code, error_msg
        )))
    }
}

/// Run `program args...` in `cwd` with the terminal's stdin/stdout/stderr.
pub fn run_tool_inherit<P: AsRef<Path>>(program: &str, cwd: P, args: &[&str]) -> Result<()> {
    let name = describe(program, args);
    debug!("running {} {:?}", program, args);

    let status = Command::new(program)
        .current_dir(cwd.as_ref())
        .args(args)
        .status()
        .map_err(|e| HydrantError::ToolError(format!("failed to execute {}: {}", name, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(HydrantError::ToolError(format!(
            "{} failed (exit code {})",
            name,
            status.code().unwrap_or(-1)
        )))
    }
}

/// `java -jar <jar> args...`, captured.
pub fn run_java_jar(cwd: &Path, jar: &Path, args: &[&str]) -> Result<ToolOutput> {
    let jar = jar.to_string_lossy();
    let mut full = vec!["-jar", jar.as_ref()];
    full.extend_from_slice(args);
    run_tool("java", cwd, &full)
}

/// `java -jar <jar> args...`, streamed to the terminal.
pub fn run_java_jar_inherit(cwd: &Path, jar: &Path, args: &[&str]) -> Result<()> {
    let jar = jar.to_string_lossy();
    let mut full = vec!["-jar", jar.as_ref()];
    full.extend_from_slice(args);
    run_tool_inherit("java", cwd, &full)
}

/// Locate the jar configured under `[All] <key>`.
///
/// The configured value is either a local path (used directly when it
/// exists) or a download URL, in which case the jar is expected in the user
/// directory under the URL's last path segment.
pub fn find_tool(configured: Option<&FieldValue>, key: &str, paths: &FixedPaths) -> Result<PathBuf> {
    let location = configured
        .and_then(FieldValue::as_scalar)
        .ok_or_else(|| {
            HydrantError::UserError(format!(
                "no location configured for {key}; set [All] {key} in {}",
                paths.user_config().display()
            ))
        })?;

    let direct = paths.expand_home(location);
    if direct.is_file() {
        return Ok(direct);
    }

    let file_name = location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(location);
    let local = paths.user_dir.join(file_name);
    if local.is_file() {
        debug!("using {} for {}", local.display(), key);
        return Ok(local);
    }

    Err(HydrantError::UserError(format!(
        "{key} not found at {}; download it from {} and place it there",
        local.display(),
        location
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scalar(s: &str) -> FieldValue {
        FieldValue::Scalar(s.to_string())
    }

    #[test]
    fn test_find_tool_unconfigured() {
        let home = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(home.path());
        let err = find_tool(None, "WDLtool", &paths).unwrap_err();
        assert!(matches!(err, HydrantError::UserError(_)));
        assert!(err.to_string().contains("[All] WDLtool"));
    }

    #[test]
    fn test_find_tool_local_path() {
        let home = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(home.path());
        let jar = home.path().join("cromwell.jar");
        std::fs::write(&jar, "jar").unwrap();

        let found = find_tool(Some(&scalar(&jar.to_string_lossy())), "Cromwell", &paths).unwrap();
        assert_eq!(found, jar);
    }

    #[test]
    fn test_find_tool_url_in_user_dir() {
        let home = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(home.path());
        std::fs::create_dir_all(&paths.user_dir).unwrap();
        std::fs::write(paths.user_dir.join("wdltool-0.14.jar"), "jar").unwrap();

        let url = "https://github.com/broadinstitute/wdltool/releases/download/0.14/wdltool-0.14.jar";
        let found = find_tool(Some(&scalar(url)), "WDLtool", &paths).unwrap();
        assert_eq!(found, paths.user_dir.join("wdltool-0.14.jar"));
    }

    #[test]
    fn test_find_tool_missing_jar_names_url() {
        let home = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(home.path());
        let url = "https://example.org/dl/cromwell-29.jar";

        let err = find_tool(Some(&scalar(url)), "Cromwell", &paths).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(url));
        assert!(msg.contains("cromwell-29.jar"));
    }

    #[test]
    fn test_find_tool_rejects_list() {
        let home = TempDir::new().unwrap();
        let paths = FixedPaths::from_home(home.path());
        let value = FieldValue::List(vec!["a".into(), "b".into()]);
        assert!(find_tool(Some(&value), "Cromwell", &paths).is_err());
    }

    #[test]
    fn test_run_tool_missing_program() {
        let dir = TempDir::new().unwrap();
        let err = run_tool("hydrant-no-such-program", dir.path(), &["x"]).unwrap_err();
        assert!(matches!(err, HydrantError::ToolError(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::TOOL_FAILURE);
    }
}
