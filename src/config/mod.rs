//! Layered INI configuration for hydrant.
//!
//! A [`ConfigValue`] is resolved fresh for every command from up to four
//! `hydrant.cfg` files (user, workflow, task, `--config`), overlaid key by key.
//! `[Task <name>]` sections are discovered dynamically.

pub(crate) mod ini;
mod model;
mod resolver;
mod writer;

#[cfg(test)]
mod tests;

pub use model::{
    AllSection, ConfigValue, DockerSection, FieldValue, FireCloudSection, TaskSection,
    parse_list, serialize_list,
};
pub use resolver::{ConfigLayer, ConfigResolver, LayerKind};
pub use writer::{render_docker_section, write_task_config};
