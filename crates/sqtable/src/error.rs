// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the structural comparator.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which of the two compared files a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Output,
    Expected,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Output => f.write_str("output"),
            Side::Expected => f.write_str("expected"),
        }
    }
}

/// Errors that abort a structural comparison.
///
/// A feature that differs is not an error; these cover inputs that cannot be
/// compared at all.
#[derive(Debug, Error)]
pub enum SqtableError {
    #[error("expected file {} does not exist", path.display())]
    ExpectedMissing { path: PathBuf },

    #[error("expected file {} is empty", path.display())]
    ExpectedEmpty { path: PathBuf },

    #[error("sequence {name} is in the {present_in} file but not in the other")]
    SequenceMissing { name: String, present_in: Side },

    #[error(
        "sequence order differs at position {}: output has {output}, expected has {expected}",
        position + 1
    )]
    OrderMismatch {
        position: usize,
        output: String,
        expected: String,
    },

    #[error("feature line {feature:?} of sequence {sequence} is in neither file")]
    RecordIntegrity { sequence: String, feature: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SqtableError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A golden file that is absent or zero-length is a misconfigured test,
/// never a valid expectation.
pub(crate) fn check_expected(path: &Path) -> Result<(), SqtableError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Err(SqtableError::ExpectedEmpty {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SqtableError::ExpectedMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(SqtableError::io(path, e)),
    }
}
