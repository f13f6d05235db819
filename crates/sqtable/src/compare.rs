// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-sequence classification of feature lines.

use crate::error::{Side, SqtableError};
use crate::parse::{is_note_line, AnnotationFile, SequenceRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// How a feature line of one sequence compares across the two files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Identical,
    Different,
    OutputOnly,
    ExpectedOnly,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Identical => "identical",
            Outcome::Different => "different",
            Outcome::OutputOnly => "out-only",
            Outcome::ExpectedOnly => "exp-only",
        }
    }
}

/// Four-way count, in `[identical, different, output-only, expected-only]` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub identical: usize,
    pub different: usize,
    pub output_only: usize,
    pub expected_only: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        *self.slot(outcome) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Identical => self.identical,
            Outcome::Different => self.different,
            Outcome::OutputOnly => self.output_only,
            Outcome::ExpectedOnly => self.expected_only,
        }
    }

    /// True when nothing disagrees. A sequence without any lines of this kind
    /// is identical.
    pub fn is_identical(&self) -> bool {
        self.different == 0 && self.output_only == 0 && self.expected_only == 0
    }

    fn slot(&mut self, outcome: Outcome) -> &mut usize {
        match outcome {
            Outcome::Identical => &mut self.identical,
            Outcome::Different => &mut self.different,
            Outcome::OutputOnly => &mut self.output_only,
            Outcome::ExpectedOnly => &mut self.expected_only,
        }
    }

    /// Count one sequence into the aggregate buckets. Buckets count
    /// sequences, not lines.
    fn add_sequence(&mut self, sequence: &Tally) {
        if sequence.is_identical() {
            self.identical += 1;
        }
        for outcome in [Outcome::Different, Outcome::OutputOnly, Outcome::ExpectedOnly] {
            if sequence.count(outcome) > 0 {
                *self.slot(outcome) += 1;
            }
        }
    }
}

/// A disagreeing feature line with the coordinate blocks involved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    pub outcome: Outcome,
    pub feature_line: String,
    pub output_block: Option<String>,
    pub expected_block: Option<String>,
}

/// Result of comparing one sequence record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SequenceComparison {
    pub name: String,
    pub features: Tally,
    pub notes: Tally,
    pub excerpts: Vec<Excerpt>,
}

/// Aggregate over all sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sequences: usize,
    pub features: Tally,
    pub notes: Tally,
}

impl Summary {
    fn add(&mut self, sequence: &SequenceComparison) {
        self.sequences += 1;
        self.features.add_sequence(&sequence.features);
        self.notes.add_sequence(&sequence.notes);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub sequences: Vec<SequenceComparison>,
    pub summary: Summary,
}

impl ComparisonReport {
    pub fn is_identical(&self) -> bool {
        self.sequences
            .iter()
            .all(|s| s.features.is_identical() && s.notes.is_identical())
    }
}

/// Compare two parsed files sequence by sequence.
///
/// Both files must name the same sequences in the same order; no attempt is
/// made to realign them.
pub fn compare(
    output: &AnnotationFile,
    expected: &AnnotationFile,
) -> Result<ComparisonReport, SqtableError> {
    check_sequence_sets(output, expected)?;
    check_sequence_order(output, expected)?;

    let sequences = output
        .sequences
        .iter()
        .zip(&expected.sequences)
        .map(|(out, exp)| compare_sequence(out, exp))
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = Summary::default();
    for sequence in &sequences {
        summary.add(sequence);
    }

    Ok(ComparisonReport { sequences, summary })
}

fn check_sequence_sets(
    output: &AnnotationFile,
    expected: &AnnotationFile,
) -> Result<(), SqtableError> {
    let output_names: HashSet<&str> = output.names().collect();
    let expected_names: HashSet<&str> = expected.names().collect();

    if let Some(name) = output.names().find(|n| !expected_names.contains(n)) {
        return Err(SqtableError::SequenceMissing {
            name: name.to_string(),
            present_in: Side::Output,
        });
    }
    if let Some(name) = expected.names().find(|n| !output_names.contains(n)) {
        return Err(SqtableError::SequenceMissing {
            name: name.to_string(),
            present_in: Side::Expected,
        });
    }
    Ok(())
}

fn check_sequence_order(
    output: &AnnotationFile,
    expected: &AnnotationFile,
) -> Result<(), SqtableError> {
    let mut out_names = output.names();
    let mut exp_names = expected.names();
    let mut position = 0;

    loop {
        match (out_names.next(), exp_names.next()) {
            (None, None) => return Ok(()),
            (Some(out), Some(exp)) if out == exp => position += 1,
            // Same name set but different lengths only happens with repeated
            // headers; treat the shorter file as ending early.
            (out, exp) => {
                return Err(SqtableError::OrderMismatch {
                    position,
                    output: out.unwrap_or("<end of file>").to_string(),
                    expected: exp.unwrap_or("<end of file>").to_string(),
                })
            }
        }
    }
}

/// Map feature line to coordinate block. A repeated feature line keeps only
/// its last block.
fn block_map(record: &SequenceRecord) -> HashMap<&str, &str> {
    record
        .features
        .iter()
        .map(|f| (f.feature_line.as_str(), f.coordinate_block.as_str()))
        .collect()
}

fn compare_sequence(
    output: &SequenceRecord,
    expected: &SequenceRecord,
) -> Result<SequenceComparison, SqtableError> {
    let out_blocks = block_map(output);
    let exp_blocks = block_map(expected);

    let mut seen = HashSet::new();
    let union = output
        .features
        .iter()
        .chain(&expected.features)
        .map(|f| f.feature_line.as_str())
        .filter(|line| seen.insert(*line));

    let mut comparison = SequenceComparison {
        name: output.name.clone(),
        features: Tally::default(),
        notes: Tally::default(),
        excerpts: Vec::new(),
    };

    for line in union {
        let out_block = out_blocks.get(line).copied();
        let exp_block = exp_blocks.get(line).copied();

        let outcome = match (out_block, exp_block) {
            (None, None) => {
                return Err(SqtableError::RecordIntegrity {
                    sequence: output.name.clone(),
                    feature: line.to_string(),
                })
            }
            (None, Some(_)) => Outcome::ExpectedOnly,
            (Some(_), None) => Outcome::OutputOnly,
            (Some(out), Some(exp)) if out != exp => Outcome::Different,
            (Some(_), Some(_)) => Outcome::Identical,
        };

        if is_note_line(line) {
            comparison.notes.record(outcome);
        } else {
            comparison.features.record(outcome);
        }

        if outcome != Outcome::Identical {
            comparison.excerpts.push(Excerpt {
                outcome,
                feature_line: line.to_string(),
                output_block: out_block.map(str::to_string),
                expected_block: exp_block.map(str::to_string),
            });
        }
    }

    Ok(comparison)
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
