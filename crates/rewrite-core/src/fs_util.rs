//! Filesystem helpers used by the rewriters.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::config::RewriteConfig;
use crate::error::{Result, RewriteError};

/// Recursively copy the contents of `src` into `dst`.
///
/// Creates `dst` and any missing subdirectories. Existing files are overwritten.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| RewriteError::io("creating directory", dst, e))?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            match e.into_io_error() {
                Some(io) => RewriteError::io("walking source directory", path, io),
                None => RewriteError::Other(format!(
                    "Filesystem loop while copying {}",
                    path.display()
                )),
            }
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| RewriteError::Other(format!("Unexpected path in walk: {e}")))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| RewriteError::io("creating directory", &target, e))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| RewriteError::io("copying file", entry.path(), e))?;
        }
    }

    debug!("Copied {} to {}", src.display(), dst.display());
    Ok(())
}

/// Copy a SavedModel to `dst` without its asset directories.
///
/// The lite converter rejects SavedModels that carry `assets/` or
/// `assets.extra/`, so those are removed from the copy.
pub fn create_lite_compatible_saved_model(src: &Path, dst: &Path) -> Result<()> {
    copy_dir(src, dst)?;

    for name in [
        RewriteConfig::ASSETS_DIRECTORY,
        RewriteConfig::EXTRA_ASSETS_DIRECTORY,
    ] {
        let path = dst.join(name);
        if path.exists() {
            std::fs::remove_dir_all(&path)
                .map_err(|e| RewriteError::io("removing asset directory", &path, e))?;
        }
    }
    Ok(())
}

/// Whether `dir` looks like a SavedModel directory.
pub fn is_saved_model_dir(dir: &Path) -> bool {
    dir.is_dir()
        && RewriteConfig::SAVED_MODEL_FILENAMES
            .iter()
            .any(|name| dir.join(name).is_file())
}
