//! Command implementations for hydrant.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the lookups several commands share.

mod build;
mod init;
mod push;
mod show_config;
mod tutorial;
mod validate;

use crate::cli::Command;
use crate::config::{ConfigResolver, ConfigValue, FieldValue};
use crate::context::HydrantContext;
use crate::error::{HydrantError, Result};
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(ctx: &HydrantContext, command: Command) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(ctx, args),
        Command::Build(args) => build::cmd_build(ctx, args),
        Command::Push(args) => push::cmd_push(ctx, args),
        Command::Validate(args) => validate::cmd_validate(ctx, args),
        Command::Test(args) => test::cmd_test(ctx, args),
        Command::Tutorial => tutorial::cmd_tutorial(),
        Command::ShowConfig(args) => show_config::cmd_show_config(ctx, args),
    }
}

/// Resolve the layered configuration for `dir`.
pub(crate) fn load_config(ctx: &HydrantContext, dir: &Path) -> Result<ConfigValue> {
    ConfigResolver::new(&ctx.paths).load(dir, ctx.explicit_config.as_deref())
}

/// A command-line value, else a configured scalar.
pub(crate) fn arg_or_config(arg: Option<String>, configured: Option<&FieldValue>) -> Option<String> {
    arg.or_else(|| configured.and_then(FieldValue::as_scalar).map(str::to_string))
}

/// The namespace images are tagged under; there is no usable default.
pub(crate) fn require_namespace(namespace: Option<String>) -> Result<String> {
    namespace.ok_or_else(|| {
        HydrantError::UserError(
            "no Docker namespace: pass --namespace or set [Docker] Namespace in hydrant.cfg"
                .to_string(),
        )
    })
}

/// The WDL a command operates on: the given path (relative to the working
/// directory), else `<working directory name>.wdl`. It must exist.
pub(crate) fn resolve_wdl(ctx: &HydrantContext, wdl: Option<PathBuf>) -> Result<PathBuf> {
    let wdl = match wdl {
        Some(path) => ctx.cwd.join(path),
        None => ctx.cwd.join(format!("{}.wdl", ctx.dir_name()?)),
    };
    if !wdl.is_file() {
        return Err(HydrantError::FileNotFound { path: wdl });
    }
    Ok(wdl)
}
