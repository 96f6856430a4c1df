//! Implementation of the `hydrant build` command.

use super::{arg_or_config, require_namespace};
use crate::cli::BuildArgs;
use crate::config::{ConfigResolver, DockerSection, FieldValue, write_task_config};
use crate::context::HydrantContext;
use crate::docker::{DockerRepo, ImageTag, build_image, docker_repos, split_repo_arg};
use crate::error::{HydrantError, Result};
use tracing::info;

/// Execute the `hydrant build` command.
pub fn cmd_build(ctx: &HydrantContext, args: BuildArgs) -> Result<()> {
    let resolver = ConfigResolver::new(&ctx.paths);
    let explicit = ctx.explicit_config.as_deref();
    let config = resolver.load(&ctx.cwd, explicit)?;
    let repos = docker_repos(&ctx.cwd, &resolver, explicit)?;

    let registry = arg_or_config(args.registry, config.docker.registry.as_ref());
    let namespace = require_namespace(arg_or_config(
        args.namespace,
        config.docker.namespace.as_ref(),
    ))?;
    let targets = select_targets(&repos, args.all, &args.repositories)?;

    for (repo, tag) in targets {
        let image = ImageTag::new(registry.as_deref(), &namespace, &repo.name, Some(&tag));
        build_image(&repo.path, &image)?;

        let recorded = DockerSection {
            registry: registry.clone().map(FieldValue::Scalar),
            namespace: Some(FieldValue::Scalar(namespace.clone())),
            tag: Some(FieldValue::Scalar(tag)),
        };
        let path = write_task_config(&repo.path, &recorded)?;
        info!("Recorded {} in {}", image, path.display());
        println!("Built {}", image);
    }
    Ok(())
}

/// Pick the repositories to build and the tag for each.
///
/// Named repositories are only built if every one of them exists.
fn select_targets<'a>(
    repos: &'a [DockerRepo],
    all: bool,
    names: &[String],
) -> Result<Vec<(&'a DockerRepo, String)>> {
    if repos.is_empty() {
        return Err(HydrantError::UserError(
            "no Dockerfile found in this directory or its subdirectories".to_string(),
        ));
    }

    if all {
        return Ok(repos.iter().map(|r| (r, r.tag.clone())).collect());
    }

    if names.is_empty() {
        if let [only] = repos {
            return Ok(vec![(only, only.tag.clone())]);
        }
        let choices: Vec<String> = repos.iter().map(|r| format!("{}:{}", r.name, r.tag)).collect();
        return Err(HydrantError::UserError(format!(
            "no repository specified; choose from {} or pass --all",
            choices.join(", ")
        )));
    }

    let mut targets = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for arg in names {
        let (name, tag) = split_repo_arg(arg);
        match repos.iter().find(|r| r.name == name) {
            Some(repo) => targets.push((repo, tag.unwrap_or(repo.tag.as_str()).to_string())),
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(HydrantError::UserError(format!(
            "could not find a directory for {}; the directory containing the Dockerfile must match the repository name",
            missing.join(", ")
        )));
    }
    Ok(targets)
}
