//! Implementation of the `hydrant validate` command.

use super::{load_config, resolve_wdl};
use crate::cli::WdlArgs;
use crate::config::AllSection;
use crate::context::HydrantContext;
use crate::error::{HydrantError, Result};
use crate::fs::atomic_write_file;
use crate::inputs::{merge_inputs, read_inputs};
use crate::tools::{find_tool, run_java_jar};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Execute the `hydrant validate` command.
pub fn cmd_validate(ctx: &HydrantContext, args: WdlArgs) -> Result<()> {
    let wdl = resolve_wdl(ctx, args.wdl)?;
    let config = load_config(ctx, &ctx.cwd)?;
    let jar = find_tool(config.all.wdltool.as_ref(), AllSection::WDLTOOL, &ctx.paths)?;
    let wdl_arg = wdl.to_string_lossy();

    run_java_jar(&ctx.cwd, &jar, &["validate", wdl_arg.as_ref()])?;
    info!("Success: {} syntax is correct", wdl.display());

    let inputs = ctx.cwd.join(&args.inputs);
    info!("Writing {}", inputs.display());
    regenerate_inputs(&inputs, || {
        run_java_jar(&ctx.cwd, &jar, &["inputs", wdl_arg.as_ref()]).map(|out| out.stdout)
    })
    .inspect_err(|_| error!("Unable to generate inputs for {}", wdl.display()))?;

    info!(
        "Now edit {} to reflect input files etc, then run `hydrant test`",
        inputs.display()
    );
    Ok(())
}

fn backup_path(inputs: &Path) -> PathBuf {
    let mut name = inputs.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Rewrite `inputs` from a generated skeleton, keeping user values.
///
/// An existing file is moved to `<inputs>.bak` first and moved back if
/// anything fails; after success the backup is left in place.
fn regenerate_inputs<F>(inputs: &Path, generate: F) -> Result<()>
where
    F: FnOnce() -> Result<String>,
{
    let backup = backup_path(inputs);
    let had_previous = inputs.is_file();
    if had_previous {
        fs::rename(inputs, &backup).map_err(|e| {
            HydrantError::UserError(format!(
                "failed to back up '{}': {}",
                inputs.display(),
                e
            ))
        })?;
    }

    let result = write_merged(inputs, had_previous.then_some(backup.as_path()), generate);
    if result.is_err()
        && had_previous
        && let Err(e) = fs::rename(&backup, inputs)
    {
        warn!(
            "could not restore {} from {}: {}",
            inputs.display(),
            backup.display(),
            e
        );
    }
    result
}

fn write_merged<F>(inputs: &Path, previous: Option<&Path>, generate: F) -> Result<()>
where
    F: FnOnce() -> Result<String>,
{
    let generated = generate()?;
    let previous = match previous.map(read_inputs) {
        Some(Ok(values)) => Some(values),
        Some(Err(e)) => {
            warn!("ignoring previous inputs: {}", e);
            None
        }
        None => None,
    };
    let merged = merge_inputs(&generated, previous.as_ref())?;
    atomic_write_file(inputs, &merged)
}
