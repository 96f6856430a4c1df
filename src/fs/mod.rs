//! Filesystem helpers for hydrant.
//!
//! Generated files (configs, WDL, Dockerfiles) are written atomically so an
//! interrupted command never leaves a half-written file behind. The
//! dependents log is append-only.

pub mod atomic;
mod tree;

pub use atomic::{append_line, atomic_write, atomic_write_file};
pub use tree::copy_dir_contents;
