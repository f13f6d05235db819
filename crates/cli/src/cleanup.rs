// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Removal of per-case scratch directories after a passing case.

use crate::log::LogSink;
use crate::output_diagnostic::print_warning;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to remove directory {}: {source}", path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Recursively remove each directory in order, returning how many existed.
///
/// A directory that is already gone is reported as a warning and skipped.
pub async fn remove_dirs<P: AsRef<Path>>(
    dirs: &[P],
    sink: &mut LogSink,
) -> Result<usize, CleanupError> {
    let mut removed = 0;
    for dir in dirs {
        let dir = dir.as_ref();
        sink.command(&format!("rm -rf {}", dir.display()));
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(dir = %dir.display(), "cleanup directory missing");
                print_warning(format_args!(
                    "directory {} does not exist, nothing to remove",
                    dir.display()
                ));
            }
            Err(source) => {
                return Err(CleanupError {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
