//! Implementation of the `hydrant show-config` command.

use super::load_config;
use crate::cli::ShowConfigArgs;
use crate::config::{ConfigResolver, ConfigValue};
use crate::context::HydrantContext;
use crate::error::{HydrantError, Result};

/// Execute the `hydrant show-config` command.
pub fn cmd_show_config(ctx: &HydrantContext, args: ShowConfigArgs) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => ctx.cwd.join(dir),
        None => ctx.cwd.clone(),
    };
    if !dir.is_dir() {
        return Err(HydrantError::FileNotFound { path: dir });
    }

    let layers = ConfigResolver::new(&ctx.paths).layers(&dir, ctx.explicit_config.as_deref())?;
    for layer in layers {
        let state = if layer.path.is_file() { "" } else { " (missing)" };
        println!("# {}: {}{}", layer.kind, layer.path.display(), state);
    }

    let config = load_config(ctx, &dir)?;
    print!("{}", render_config(&config)?);
    Ok(())
}

fn render_config(config: &ConfigValue) -> Result<String> {
    serde_yaml::to_string(config)
        .map_err(|e| HydrantError::UserError(format!("failed to render config: {}", e)))
}
