//! Implementation of the `hydrant init` command.

use super::load_config;
use crate::cli::InitArgs;
use crate::context::HydrantContext;
use crate::error::Result;
use crate::generator::{Generator, Identity, InitOptions};

/// Execute the `hydrant init` command.
pub fn cmd_init(ctx: &HydrantContext, args: InitArgs) -> Result<()> {
    let config = load_config(ctx, &ctx.cwd)?;
    let opts = InitOptions {
        workflow: args.workflow,
        tasks: args.tasks,
        num_tasks: usize::from(args.num_tasks),
        package: args.package,
        namespace: args.namespace,
        tag: args.tag,
    };

    let generator = Generator::new(&ctx.cwd, &config, &ctx.paths, Identity::current());
    let dir = generator.generate(&opts)?;

    println!("Created workflow {}", dir.display());
    println!();
    println!("Next steps:");
    println!("  * copy or edit source code into each <task>/src directory");
    println!("  * edit each <task>/Dockerfile, then run `hydrant build`");
    Ok(())
}
