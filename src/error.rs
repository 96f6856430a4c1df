//! Error types for the hydrant CLI.
//!
//! Uses thiserror for derive macros. Every variant carries enough context
//! (file path, section or task name) for an actionable message.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hydrant operations.
#[derive(Error, Debug)]
pub enum HydrantError {
    /// User provided invalid arguments or the system is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The user-level config file is missing or unreadable.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// A loaded config file is not valid INI.
    #[error("failed to parse config file '{}': {message}", path.display())]
    ConfigParseError { path: PathBuf, message: String },

    /// The config file given with `--config` does not exist.
    #[error("config file given on the command line not found: {}", path.display())]
    ExplicitFileNotFound { path: PathBuf },

    /// A WDL (or other required input) file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A referenced task is absent from a parsed WDL.
    #[error("task '{task}' not found in {}", path.display())]
    TaskNotFound { task: String, path: PathBuf },

    /// A WDL file could not be segmented into task/workflow blocks.
    #[error("malformed WDL '{}': {message}", path.display())]
    MalformedWdl { path: PathBuf, message: String },

    /// An external tool could not be run or exited non-zero.
    #[error("Tool failed: {0}")]
    ToolError(String),
}

impl HydrantError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            HydrantError::UserError(_)
            | HydrantError::ConfigParseError { .. }
            | HydrantError::MalformedWdl { .. } => exit_codes::USER_ERROR,
            HydrantError::ConfigNotFound { .. }
            | HydrantError::ExplicitFileNotFound { .. }
            | HydrantError::FileNotFound { .. }
            | HydrantError::TaskNotFound { .. } => exit_codes::NOT_FOUND,
            HydrantError::ToolError(_) => exit_codes::TOOL_FAILURE,
        }
    }

    pub(crate) fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        HydrantError::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed_wdl(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        HydrantError::MalformedWdl {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for hydrant operations.
pub type Result<T> = std::result::Result<T, HydrantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = HydrantError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn parse_errors_are_user_errors() {
        let err = HydrantError::config_parse("/tmp/hydrant.cfg", "line 3: bad");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = HydrantError::malformed_wdl("/tmp/wf.wdl", "unterminated task");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn missing_inputs_have_not_found_exit_code() {
        let errs = [
            HydrantError::ConfigNotFound {
                path: PathBuf::from("/home/u/.hydrant/hydrant.cfg"),
            },
            HydrantError::ExplicitFileNotFound {
                path: PathBuf::from("cli.cfg"),
            },
            HydrantError::FileNotFound {
                path: PathBuf::from("wf.wdl"),
            },
            HydrantError::TaskNotFound {
                task: "baz".to_string(),
                path: PathBuf::from("wf/wf.wdl"),
            },
        ];
        for err in &errs {
            assert_eq!(err.exit_code(), exit_codes::NOT_FOUND, "{}", err);
        }
    }

    #[test]
    fn tool_error_has_correct_exit_code() {
        let err = HydrantError::ToolError("docker build failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::TOOL_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = HydrantError::TaskNotFound {
            task: "baz".to_string(),
            path: PathBuf::from("wf/wf.wdl"),
        };
        assert_eq!(err.to_string(), "task 'baz' not found in wf/wf.wdl");

        let err = HydrantError::config_parse("a.cfg", "line 1: no section header");
        assert_eq!(
            err.to_string(),
            "failed to parse config file 'a.cfg': line 1: no section header"
        );
    }
}
