//! CLI argument parsing for hydrant.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Hydrant: scaffold, build, validate and test FireCloud workflows.
///
/// A workflow is a directory holding a WDL file, a tests/ directory and one
/// subdirectory per task. Every task directory carries a Dockerfile and the
/// sources baked into the task's image.
#[derive(Parser, Debug)]
#[command(name = "hydrant")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file applied over every other hydrant.cfg.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for hydrant.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a workflow directory tree with templated WDL.
    ///
    /// Creates one directory per new task (src/, Dockerfile, .dockerignore,
    /// hydrant.cfg), a tests/ directory and <workflow>/<workflow>.wdl.
    Init(InitArgs),

    /// Build the Docker image of one or more task directories.
    ///
    /// Records the image registry, namespace and tag in the task's
    /// hydrant.cfg.
    Build(BuildArgs),

    /// Push the current task's image to its registry.
    Push(PushArgs),

    /// Validate WDL syntax and generate the test inputs JSON.
    Validate(WdlArgs),

    /// Run the workflow locally with Cromwell using the test inputs.
    Test(WdlArgs),

    /// Show the general flow of hydrant use, by example.
    Tutorial,

    /// Print the configuration resolved for a directory.
    ShowConfig(ShowConfigArgs),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Name of the workflow directory to create.
    pub workflow: String,

    /// Comma-separated task names; <workflow>.<task> or <workflow>.* reuse
    /// tasks from an existing workflow.
    #[arg(long, value_delimiter = ',')]
    pub tasks: Option<Vec<String>>,

    /// Number of empty tasks when neither --tasks nor the config name any.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub num_tasks: u16,

    /// Generate tasks that zip their output and pass it downstream.
    #[arg(short, long)]
    pub package: bool,

    /// Docker namespace for the new tasks' images.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Docker tag for the new tasks' images.
    #[arg(long)]
    pub tag: Option<String>,
}

/// Arguments for the `build` command.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Host[:port] of the registry if not Docker Hub.
    #[arg(short = 'R', long)]
    pub registry: Option<String>,

    /// Namespace under which the repository resides.
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Build every Docker repository found.
    #[arg(short, long)]
    pub all: bool,

    /// Repositories to build, as name[:tag].
    #[arg(value_name = "REPO[:TAG]")]
    pub repositories: Vec<String>,
}

/// Arguments for the `push` command.
#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Host[:port] of the registry if not Docker Hub.
    #[arg(short = 'R', long)]
    pub registry: Option<String>,

    /// Namespace under which the repository resides.
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Repository name (default: current directory name).
    #[arg(short, long)]
    pub repository: Option<String>,

    /// Image tag (default: configured tag, else latest).
    #[arg(short, long)]
    pub tag: Option<String>,
}

/// Arguments shared by `validate` and `test`.
#[derive(Parser, Debug)]
pub struct WdlArgs {
    /// WDL file (default: <current directory name>.wdl).
    pub wdl: Option<PathBuf>,

    /// Test inputs JSON.
    #[arg(short, long, default_value = "tests/inputs.json")]
    pub inputs: PathBuf,
}

/// Arguments for the `show-config` command.
#[derive(Parser, Debug)]
pub struct ShowConfigArgs {
    /// Directory to resolve the configuration for (default: current).
    pub dir: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
