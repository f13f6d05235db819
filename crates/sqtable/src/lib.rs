// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structural comparison of sqtable annotation files.
//!
//! A sqtable file is a sequence of records, each introduced by a `>` header
//! line. Inside a record, zero or more coordinate lines are followed by the
//! feature (or note) line they belong to. Instead of reporting a raw line
//! diff, this crate pairs the records of an output file with those of its
//! expected counterpart and classifies every feature line as identical,
//! different, output-only or expected-only.

mod compare;
mod error;
mod parse;
mod report;

pub use compare::{
    compare, ComparisonReport, Excerpt, Outcome, SequenceComparison, Summary, Tally,
};
pub use error::{Side, SqtableError};
pub use parse::{classify, AnnotationFile, FeatureRecord, LineKind, SequenceRecord};
pub use report::{render, write_report};

use std::path::Path;

/// Compare two sqtable files and write the human-readable report to `report`.
///
/// The expected file must exist and be non-empty. Sequence names must agree
/// between the two files, both as a set and in order; any disagreement is an
/// error rather than a reportable difference.
pub fn compare_files(
    output: &Path,
    expected: &Path,
    report: &Path,
) -> Result<ComparisonReport, SqtableError> {
    error::check_expected(expected)?;

    let output_file = AnnotationFile::load(output)?;
    let expected_file = AnnotationFile::load(expected)?;

    let comparison = compare(&output_file, &expected_file)?;
    write_report(report, &comparison)?;
    Ok(comparison)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
