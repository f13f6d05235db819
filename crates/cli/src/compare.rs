// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output-versus-golden file comparison.

use crate::diff::DiffTool;
use crate::log::LogSink;
use annotest_sqtable::SqtableError;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension that selects the structural sqtable comparison on mismatch.
pub const SQTABLE_EXTENSION: &str = "sqtable";

/// Errors that stop a comparison. A mismatch is a [`Verdict`], not an error.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("expected file {} does not exist", path.display())]
    ExpectedMissing { path: PathBuf },

    #[error("expected file {} is empty", path.display())]
    ExpectedEmpty { path: PathBuf },

    #[error("failed to diff {} against {}: {source}", output.display(), expected.display())]
    Diff {
        output: PathBuf,
        expected: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot inspect output file {}: {source}", path.display())]
    OutputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqtable comparison failed: {0}")]
    Annotation(#[from] SqtableError),
}

/// Why a comparison failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailReason {
    OutputMissing,
    OutputEmpty,
    /// `see` is the sqtable report when one was written, else the raw diff.
    Differs { see: PathBuf },
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::OutputMissing => f.write_str("output file does not exist"),
            FailReason::OutputEmpty => f.write_str("output file is empty"),
            FailReason::Differs { see } => write!(f, "files differ, see {}", see.display()),
        }
    }
}

/// Outcome of comparing one output file with its golden file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub output: PathBuf,
    pub expected: PathBuf,
    pub diff: PathBuf,
    pub failure: Option<FailReason>,
    /// Structural summary, present when a sqtable mismatch was analysed.
    pub annotation: Option<annotest_sqtable::Summary>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Compare `output` with `expected`, leaving the diff in `diff_path`.
///
/// On a mismatch, copies of both inputs are saved as `<diff>.out` and
/// `<diff>.exp`; for sqtable files a structural report is written to
/// `<diff>.man`.
pub async fn compare_files(
    output: &Path,
    expected: &Path,
    diff_path: &Path,
    tool: &DiffTool,
    sink: &mut LogSink,
) -> Result<Verdict, CompareError> {
    check_expected(expected)?;

    sink.progress(format_args!("  checking {} ... ", output.display()));

    let mut verdict = Verdict {
        output: output.to_path_buf(),
        expected: expected.to_path_buf(),
        diff: diff_path.to_path_buf(),
        failure: None,
        annotation: None,
    };

    match std::fs::metadata(output) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            verdict.failure = Some(FailReason::OutputMissing)
        }
        Err(source) => {
            return Err(CompareError::OutputUnreadable {
                path: output.to_path_buf(),
                source,
            })
        }
        Ok(meta) if meta.len() == 0 => verdict.failure = Some(FailReason::OutputEmpty),
        Ok(_) => {
            tool.write_diff(output, expected, diff_path, sink)
                .await
                .map_err(|source| CompareError::Diff {
                    output: output.to_path_buf(),
                    expected: expected.to_path_buf(),
                    source,
                })?;
            if !is_empty_file(diff_path)? {
                let (see, annotation) = record_mismatch(output, expected, diff_path)?;
                verdict.failure = Some(FailReason::Differs { see });
                verdict.annotation = annotation;
            }
        }
    }

    match &verdict.failure {
        None => sink.progress_line("pass"),
        Some(reason) => {
            tracing::info!(output = %output.display(), %reason, "comparison failed");
            sink.progress_line(format_args!("FAIL [{}]", reason));
        }
    }
    Ok(verdict)
}

fn check_expected(expected: &Path) -> Result<(), CompareError> {
    match std::fs::metadata(expected) {
        Ok(meta) if meta.len() == 0 => Err(CompareError::ExpectedEmpty {
            path: expected.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(_) => Err(CompareError::ExpectedMissing {
            path: expected.to_path_buf(),
        }),
    }
}

fn is_empty_file(path: &Path) -> Result<bool, CompareError> {
    std::fs::metadata(path)
        .map(|m| m.len() == 0)
        .map_err(|source| CompareError::Artifact {
            path: path.to_path_buf(),
            source,
        })
}

/// Save input snapshots and, for sqtable pairs, the structural report.
fn record_mismatch(
    output: &Path,
    expected: &Path,
    diff_path: &Path,
) -> Result<(PathBuf, Option<annotest_sqtable::Summary>), CompareError> {
    copy_artifact(output, &with_suffix(diff_path, ".out"))?;
    copy_artifact(expected, &with_suffix(diff_path, ".exp"))?;

    if !(is_sqtable(output) && is_sqtable(expected)) {
        return Ok((diff_path.to_path_buf(), None));
    }

    let report_path = with_suffix(diff_path, ".man");
    let report = annotest_sqtable::compare_files(output, expected, &report_path)?;
    Ok((report_path, Some(report.summary)))
}

fn copy_artifact(from: &Path, to: &Path) -> Result<(), CompareError> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| CompareError::Artifact {
            path: to.to_path_buf(),
            source,
        })
}

fn is_sqtable(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == SQTABLE_EXTENSION)
}

/// `a/b.diff` + `.out` -> `a/b.diff.out`
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
