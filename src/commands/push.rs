//! Implementation of the `hydrant push` command.

use super::{arg_or_config, load_config, require_namespace};
use crate::cli::PushArgs;
use crate::config::ConfigValue;
use crate::context::HydrantContext;
use crate::docker::{DEFAULT_TAG, ImageTag, push_image};
use crate::error::Result;

/// Execute the `hydrant push` command.
pub fn cmd_push(ctx: &HydrantContext, args: PushArgs) -> Result<()> {
    let config = load_config(ctx, &ctx.cwd)?;
    let image = push_target(args, &config, &ctx.dir_name()?)?;
    push_image(&ctx.cwd, &image)?;
    println!("Pushed {}", image);
    Ok(())
}

/// The image to push: command line first, then the resolved config, with the
/// directory name as repository.
fn push_target(args: PushArgs, config: &ConfigValue, dir_name: &str) -> Result<ImageTag> {
    let registry = arg_or_config(args.registry, config.docker.registry.as_ref());
    let namespace = require_namespace(arg_or_config(
        args.namespace,
        config.docker.namespace.as_ref(),
    ))?;
    let repository = args.repository.unwrap_or_else(|| dir_name.to_string());
    let tag = arg_or_config(args.tag, config.docker.tag.as_ref())
        .unwrap_or_else(|| DEFAULT_TAG.to_string());

    Ok(ImageTag::new(
        registry.as_deref(),
        &namespace,
        &repository,
        Some(&tag),
    ))
}
