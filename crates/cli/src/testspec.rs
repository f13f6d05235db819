// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test-file parsing.
//!
//! A test file is a list of cases, each starting at a `command:` line:
//!
//! ```text
//! # comment
//! command: v-annotate.pl -f !dirbuild!/noro.fa out/va-noro
//! desc: annotate-noro
//! out: out/va-noro/va-noro.vadr.sqtable
//! exp: @VADRSCRIPTSDIR@/testfiles/expected/va-noro.vadr.sqtable
//! rmdir: out/va-noro
//! ```
//!
//! Filesystem preconditions are checked as each line is read, so a bad path
//! stops the run before any command executes.

use crate::env::Environment;
use crate::options::{ExecutionMode, OptionProvider};
use crate::placeholder::{substitute_env, substitute_options, PlaceholderError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading a test file
#[derive(Debug, Error)]
pub enum TestSpecError {
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("{0}")]
    Consistency(String),

    #[error("line {line}: {} {reason}", path.display())]
    Precondition {
        line: usize,
        path: PathBuf,
        reason: &'static str,
    },

    #[error("line {line}: !{name}! does not name a known option (--{name})")]
    UnknownOption { line: usize, name: String },

    #[error("line {line}: !{name}! requires --{name} to be given")]
    MissingOption { line: usize, name: String },

    #[error("Failed to read test file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TestSpecError {
    fn placeholder(line: usize, err: PlaceholderError) -> Self {
        match err {
            PlaceholderError::UnknownOption(name) => Self::UnknownOption { line, name },
            PlaceholderError::MissingOption(name) => Self::MissingOption { line, name },
        }
    }

    fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }
}

/// One command with the files it must produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub command: String,
    pub description: String,
    pub output_files: Vec<PathBuf>,
    /// Same length as `output_files`; paired by position.
    pub expected_files: Vec<PathBuf>,
    /// Directories to remove after the case passes. No duplicates.
    pub cleanup_dirs: Vec<PathBuf>,
}

impl TestCase {
    /// Output/expected pairs in declaration order.
    pub fn file_pairs(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.output_files
            .iter()
            .map(PathBuf::as_path)
            .zip(self.expected_files.iter().map(PathBuf::as_path))
    }
}

/// All cases of a test file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestSuite {
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// Number of cases, equal to the number of `command:` lines.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Total number of output/expected pairs.
    pub fn file_count(&self) -> usize {
        self.cases.iter().map(|c| c.output_files.len()).sum()
    }
}

/// Collaborators used while parsing.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub options: &'a dyn OptionProvider,
    pub env: &'a dyn Environment,
    pub mode: ExecutionMode,
}

/// Read and parse a test file.
pub fn parse(path: &Path, ctx: &ParseContext<'_>) -> Result<TestSuite, TestSpecError> {
    let text = std::fs::read_to_string(path).map_err(|source| TestSpecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&text, ctx)
}

/// Parse test-file text.
pub fn parse_str(text: &str, ctx: &ParseContext<'_>) -> Result<TestSuite, TestSpecError> {
    let mut cases = Vec::new();
    let mut state = State::Empty;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() || raw.starts_with('#') {
            continue;
        }

        let Some(spec_line) = SpecLine::classify(raw) else {
            return Err(TestSpecError::format(
                line,
                format!("unrecognized line: {raw}"),
            ));
        };

        match spec_line {
            SpecLine::Command(command) => {
                if let Some(case) = state.finalize()? {
                    cases.push(case);
                }
                let command = substitute_options(command.trim(), ctx.options)
                    .map_err(|e| TestSpecError::placeholder(line, e))?;
                state = State::Building(CaseDraft::new(command, line));
            }
            SpecLine::Desc(description) => {
                let draft = state.draft(line, "desc")?;
                if draft.description.is_some() {
                    return Err(TestSpecError::Consistency(format!(
                        "line {line}: second desc: line for the command on line {}",
                        draft.line
                    )));
                }
                draft.description = Some(description.to_string());
            }
            SpecLine::Out(value) => {
                let draft = state.draft(line, "out")?;
                let path = spec_path(value, line)?;
                check_output(&path, ctx.mode, line)?;
                draft.output_files.push(path);
            }
            SpecLine::Exp(value) => {
                let draft = state.draft(line, "exp")?;
                let resolved = substitute_env(value.trim(), ctx.env);
                let path = spec_path(&resolved, line)?;
                if !path.exists() {
                    return Err(TestSpecError::Precondition {
                        line,
                        path,
                        reason: "expected file does not exist",
                    });
                }
                draft.expected_files.push(path);
            }
            SpecLine::Rmdir(value) => {
                let draft = state.draft(line, "rmdir")?;
                let path = PathBuf::from(value.trim());
                if !draft.cleanup_dirs.contains(&path) {
                    draft.cleanup_dirs.push(path);
                }
            }
        }
    }

    if let Some(case) = state.finalize()? {
        cases.push(case);
    }

    tracing::debug!(cases = cases.len(), "parsed test file");
    Ok(TestSuite { cases })
}

/// A classified, non-comment line. Payloads are the text after the colon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpecLine<'a> {
    Command(&'a str),
    Desc(&'a str),
    Out(&'a str),
    Exp(&'a str),
    Rmdir(&'a str),
}

impl<'a> SpecLine<'a> {
    fn classify(line: &'a str) -> Option<Self> {
        let (keyword, rest) = line.split_once(':')?;
        let rest = rest.trim_start();
        match keyword {
            "command" => Some(Self::Command(rest)),
            "desc" => Some(Self::Desc(rest)),
            "out" => Some(Self::Out(rest)),
            "exp" => Some(Self::Exp(rest)),
            "rmdir" => Some(Self::Rmdir(rest)),
            _ => None,
        }
    }
}

/// A case whose lines are still being read.
#[derive(Debug)]
struct CaseDraft {
    /// Line number of the `command:` line.
    line: usize,
    command: String,
    description: Option<String>,
    output_files: Vec<PathBuf>,
    expected_files: Vec<PathBuf>,
    cleanup_dirs: Vec<PathBuf>,
}

impl CaseDraft {
    fn new(command: String, line: usize) -> Self {
        Self {
            line,
            command,
            description: None,
            output_files: Vec::new(),
            expected_files: Vec::new(),
            cleanup_dirs: Vec::new(),
        }
    }

    fn finalize(self) -> Result<TestCase, TestSpecError> {
        let at = self.line;
        let outs = self.output_files.len();
        let exps = self.expected_files.len();

        if outs == 0 {
            return Err(TestSpecError::Consistency(format!(
                "command on line {at} has no out: lines"
            )));
        }
        if exps == 0 {
            return Err(TestSpecError::Consistency(format!(
                "command on line {at} has no exp: lines"
            )));
        }
        if outs != exps {
            return Err(TestSpecError::Consistency(format!(
                "command on line {at} has {outs} out: lines but {exps} exp: lines"
            )));
        }
        let Some(description) = self.description else {
            return Err(TestSpecError::Consistency(format!(
                "command on line {at} has no desc: line"
            )));
        };

        Ok(TestCase {
            command: self.command,
            description,
            output_files: self.output_files,
            expected_files: self.expected_files,
            cleanup_dirs: self.cleanup_dirs,
        })
    }
}

#[derive(Debug)]
enum State {
    Empty,
    Building(CaseDraft),
}

impl State {
    /// Close the case under construction, if any.
    fn finalize(&mut self) -> Result<Option<TestCase>, TestSpecError> {
        match std::mem::replace(self, State::Empty) {
            State::Empty => Ok(None),
            State::Building(draft) => draft.finalize().map(Some),
        }
    }

    fn draft(&mut self, line: usize, keyword: &str) -> Result<&mut CaseDraft, TestSpecError> {
        match self {
            State::Building(draft) => Ok(draft),
            State::Empty => Err(TestSpecError::Consistency(format!(
                "line {line}: {keyword}: line before the first command: line"
            ))),
        }
    }
}

fn spec_path(value: &str, line: usize) -> Result<PathBuf, TestSpecError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TestSpecError::format(line, "missing path"));
    }
    if value.contains(char::is_whitespace) {
        return Err(TestSpecError::format(
            line,
            format!("path contains whitespace: {value}"),
        ));
    }
    Ok(PathBuf::from(value))
}

fn check_output(path: &Path, mode: ExecutionMode, line: usize) -> Result<(), TestSpecError> {
    let exists = path.exists();
    let reason = match mode {
        ExecutionMode::Execute if exists => "output file already exists",
        ExecutionMode::CompareOnly if !exists => "output file does not exist",
        _ => return Ok(()),
    };
    Err(TestSpecError::Precondition {
        line,
        path: path.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
#[path = "testspec_tests.rs"]
mod tests;
