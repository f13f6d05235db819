// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sqtable parsing.
//!
//! ```text
//! >Feature seq1            header: starts a sequence record
//! 1	100	gene             coordinate line (optional '<', then digits)
//! 			gene	ORF1     feature line: terminates the coordinate block above
//! 			note	partial  note line: a feature line tallied separately
//! ```

use crate::error::SqtableError;
use std::path::Path;

/// First character of a sequence header line.
pub const SEQUENCE_MARKER: char = '>';

/// Leading keyword (after indentation) of a note line.
pub const NOTE_MARKER: &str = "note";

/// Role of a single line within a sqtable file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Starts a new sequence record.
    Header,
    /// Part of the coordinate block of the next feature line.
    Coordinate,
    /// Terminates the pending coordinate block.
    Feature,
}

/// Classify one line (without its line terminator).
pub fn classify(line: &str) -> LineKind {
    if line.starts_with(SEQUENCE_MARKER) {
        return LineKind::Header;
    }
    let digits = line.strip_prefix('<').unwrap_or(line);
    if digits.starts_with(|c: char| c.is_ascii_digit()) {
        LineKind::Coordinate
    } else {
        LineKind::Feature
    }
}

/// A feature or note line together with the coordinate lines preceding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureRecord {
    pub feature_line: String,
    /// Coordinate lines, each followed by `'\n'`. Empty when the feature line
    /// was not preceded by any.
    pub coordinate_block: String,
}

impl FeatureRecord {
    pub fn is_note(&self) -> bool {
        is_note_line(&self.feature_line)
    }
}

pub(crate) fn is_note_line(line: &str) -> bool {
    line.trim_start().starts_with(NOTE_MARKER)
}

/// All lines between one header and the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceRecord {
    /// The header line verbatim, marker included.
    pub name: String,
    /// Zero-based line index of the header within its file.
    pub header_line: usize,
    /// Feature records in file order, repeats included.
    pub features: Vec<FeatureRecord>,
}

/// A parsed sqtable file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationFile {
    pub sequences: Vec<SequenceRecord>,
}

impl AnnotationFile {
    /// Parse sqtable text.
    ///
    /// Lines before the first header belong to no sequence and are skipped.
    /// Coordinate lines after the last feature line of a sequence have no
    /// terminator and are dropped.
    pub fn parse(text: &str) -> Self {
        let mut sequences: Vec<SequenceRecord> = Vec::new();
        let mut pending = String::new();

        for (index, line) in text.lines().enumerate() {
            match classify(line) {
                LineKind::Header => {
                    pending.clear();
                    sequences.push(SequenceRecord {
                        name: line.to_string(),
                        header_line: index,
                        features: Vec::new(),
                    });
                }
                _ if sequences.is_empty() => {}
                LineKind::Coordinate => {
                    pending.push_str(line);
                    pending.push('\n');
                }
                LineKind::Feature => {
                    if let Some(current) = sequences.last_mut() {
                        current.features.push(FeatureRecord {
                            feature_line: line.to_string(),
                            coordinate_block: std::mem::take(&mut pending),
                        });
                    }
                }
            }
        }

        Self { sequences }
    }

    /// Read and parse a sqtable file.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn load(path: &Path) -> Result<Self, SqtableError> {
        let bytes = std::fs::read(path).map_err(|e| SqtableError::io(path, e))?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Sequence names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
