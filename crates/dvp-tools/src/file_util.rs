//! Path checks shared by the commands.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ToolError;

/// Fails with [`ToolError::PathDoesNotExist`] for the first missing path.
pub(crate) fn validate_paths_exist<P: AsRef<Path>>(paths: &[P]) -> Result<(), ToolError> {
    match paths.iter().map(AsRef::as_ref).find(|path| !path.exists()) {
        Some(missing) => Err(ToolError::PathDoesNotExist(missing.to_path_buf())),
        None => Ok(()),
    }
}

/// Fails with [`ToolError::PathExists`] for the first path already present.
pub(crate) fn validate_paths_do_not_exist<P: AsRef<Path>>(paths: &[P]) -> Result<(), ToolError> {
    match paths.iter().map(AsRef::as_ref).find(|path| path.exists()) {
        Some(existing) => Err(ToolError::PathExists(existing.to_path_buf())),
        None => Ok(()),
    }
}

/// Requires `path` to exist and be a regular file.
pub(crate) fn validate_file(path: &Path) -> Result<(), ToolError> {
    validate_paths_exist(&[path])?;
    if path.is_file() {
        Ok(())
    } else {
        Err(ToolError::PathIsNotFile(path.to_path_buf()))
    }
}

/// Requires `path` to exist and be a directory.
pub(crate) fn validate_directory(path: &Path) -> Result<(), ToolError> {
    validate_paths_exist(&[path])?;
    if path.is_dir() {
        Ok(())
    } else {
        Err(ToolError::PathIsNotDirectory(path.to_path_buf()))
    }
}

/// Removes every path that exists, files and directory trees alike.
///
/// Removal is best effort; a failure is logged and the remaining paths are
/// still attempted.
pub(crate) fn delete_paths(paths: &[PathBuf]) {
    for path in paths.iter().filter(|path| path.exists()) {
        let result = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        if let Err(error) = result {
            tracing::warn!(path = %path.display(), %error, "unable to clean up path");
        }
    }
}

/// Resolves `relative` against the directory holding `file`.
pub(crate) fn sibling_path(file: &Path, relative: &str) -> PathBuf {
    file.parent()
        .map_or_else(|| PathBuf::from(relative), |dir| dir.join(relative))
}
