//! Directory tree copying.

use crate::error::{HydrantError, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy everything under `src` into `dest`, preserving relative layout.
///
/// `dest` is created if missing. Existing files in `dest` are overwritten.
/// Returns the number of files copied.
pub fn copy_dir_contents(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(HydrantError::FileNotFound {
            path: src.to_path_buf(),
        });
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| {
            HydrantError::UserError(format!("failed to walk '{}': {}", src.display(), e))
        })?;
        // strip_prefix cannot fail: every entry lives under `src`
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);

        let result = if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    HydrantError::UserError(format!(
                        "failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            copied += 1;
            fs::copy(entry.path(), &target).map(|_| ())
        };
        result.map_err(|e| {
            HydrantError::UserError(format!(
                "failed to copy '{}' to '{}': {}",
                entry.path().display(),
                target.display(),
                e
            ))
        })?;
    }

    Ok(copied)
}
