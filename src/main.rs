//! Hydrant: scaffold, build, validate and test FireCloud workflows.
//!
//! This is the main entry point for the `hydrant` CLI. It parses arguments,
//! prepares the per-user directory and logging, dispatches to the
//! appropriate command handler, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod docker;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod generator;
pub mod inputs;
pub mod logging;
pub mod template;
pub mod tools;
pub mod wdl;

use cli::Cli;
use config::ConfigResolver;
use context::HydrantContext;
use error::Result;
use std::process::ExitCode;
use tracing::{info, warn};

fn run(cli: Cli) -> Result<()> {
    let ctx = HydrantContext::resolve(cli.config)?;
    let first_run = ctx.paths.initialize_user_dir()?;

    // The logfile comes from the config, so a broken config must not stop
    // logging from starting; the command reports the error itself.
    let logfile = ConfigResolver::new(&ctx.paths)
        .load(&ctx.cwd, ctx.explicit_config.as_deref())
        .ok()
        .and_then(|config| config.all.logfile)
        .and_then(|value| value.as_scalar().map(|path| ctx.paths.expand_home(path)));

    if let Err(err) = logging::init_logging(cli.verbose, logfile.as_deref()) {
        logging::init_logging(cli.verbose, None)?;
        warn!("{}", err);
    }

    if first_run {
        info!(
            "First run of hydrant, created {}. Edit it using INI structure; lists may be written with commas (Workspaces=ws1,ws2,ws3).",
            ctx.paths.user_config().display()
        );
    }

    commands::dispatch(&ctx, cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
