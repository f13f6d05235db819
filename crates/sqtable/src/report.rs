// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text report for a structural comparison.

use crate::compare::{ComparisonReport, Excerpt, Outcome, SequenceComparison, Tally};
use crate::error::SqtableError;
use std::fmt::Write;
use std::path::Path;

const EXCERPT_INDENT: &str = "    ";
const BLOCK_INDENT: &str = "        ";

/// Render the report: one line per sequence, each followed by its excerpts,
/// then the aggregate summary line.
pub fn render(report: &ComparisonReport) -> String {
    let width = report
        .sequences
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for sequence in &report.sequences {
        render_sequence(&mut out, sequence, width);
    }

    let summary = &report.summary;
    let _ = writeln!(
        out,
        "# total: {} sequences; ftr: {}; note: {}",
        summary.sequences,
        buckets(&summary.features),
        buckets(&summary.notes)
    );
    out
}

/// Render and write the report to `path`.
pub fn write_report(path: &Path, report: &ComparisonReport) -> Result<(), SqtableError> {
    std::fs::write(path, render(report)).map_err(|e| SqtableError::io(path, e))
}

fn render_sequence(out: &mut String, sequence: &SequenceComparison, width: usize) {
    let ftr_tag = if sequence.features.is_identical() {
        "FTR-IDENTICAL"
    } else {
        "FTR-DIFFERENT"
    };
    let note_tag = if sequence.notes.is_identical() {
        "NOTE-IDENTICAL"
    } else {
        "NOTE-DIFFERENT"
    };

    let _ = writeln!(
        out,
        "{ftr_tag} {note_tag} {:<width$}  ftr:{}  note:{}",
        sequence.name,
        counts(&sequence.features),
        counts(&sequence.notes),
    );

    for excerpt in &sequence.excerpts {
        render_excerpt(out, excerpt);
    }
}

fn render_excerpt(out: &mut String, excerpt: &Excerpt) {
    let _ = writeln!(
        out,
        "{EXCERPT_INDENT}{}: {}",
        excerpt.outcome.label(),
        excerpt.feature_line
    );

    match excerpt.outcome {
        Outcome::Different => {
            let _ = writeln!(out, "{EXCERPT_INDENT}  output:");
            render_block(out, excerpt.output_block.as_deref());
            let _ = writeln!(out, "{EXCERPT_INDENT}  expected:");
            render_block(out, excerpt.expected_block.as_deref());
        }
        Outcome::OutputOnly => render_block(out, excerpt.output_block.as_deref()),
        Outcome::ExpectedOnly => render_block(out, excerpt.expected_block.as_deref()),
        Outcome::Identical => {}
    }
}

fn render_block(out: &mut String, block: Option<&str>) {
    match block {
        Some(block) if !block.is_empty() => {
            for line in block.lines() {
                let _ = writeln!(out, "{BLOCK_INDENT}{line}");
            }
        }
        _ => {
            let _ = writeln!(out, "{BLOCK_INDENT}(no coordinates)");
        }
    }
}

fn counts(tally: &Tally) -> String {
    format!(
        "[{} {} {} {}]",
        tally.identical, tally.different, tally.output_only, tally.expected_only
    )
}

fn buckets(tally: &Tally) -> String {
    [
        Outcome::Identical,
        Outcome::Different,
        Outcome::OutputOnly,
        Outcome::ExpectedOnly,
    ]
    .iter()
    .map(|&o| format!("{} {}", o.label(), tally.count(o)))
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
