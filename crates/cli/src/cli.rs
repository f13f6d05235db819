// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line interface.

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::diff::{DiffTool, DEFAULT_DIFF_PROGRAM};
use crate::env::{ANNOTEST_DIFF_PROGRAM, ANNOTEST_DIFF_TOOL, ANNOTEST_DIRBUILD};
use crate::options::{ExecutionMode, OptionProvider};
use crate::runner::RunConfig;

/// Run the commands listed in a test file and compare what they produce
/// with golden files.
#[derive(Parser, Debug, Clone)]
#[command(name = "annotest", version, about = "Regression-test harness for annotation pipelines")]
pub struct Cli {
    /// Test file listing commands and the files they must produce
    #[arg(value_name = "TEST_FILE")]
    pub test_file: PathBuf,

    /// Directory for run logs and diff artifacts
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Remove OUT_DIR first if it already exists
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Skip the commands and only compare existing outputs
    #[arg(short = 's', long)]
    pub skipexec: bool,

    /// Echo every command to stdout
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Remove a test's rmdir: directories once all its files pass
    #[arg(long)]
    pub rmout: bool,

    /// Build directory, substituted for !dirbuild! in commands
    #[arg(long, value_name = "DIR", env = ANNOTEST_DIRBUILD)]
    pub dirbuild: Option<String>,

    /// Line diff implementation
    #[arg(long, value_enum, default_value = "external", env = ANNOTEST_DIFF_TOOL)]
    pub diff_tool: DiffToolKind,

    /// Program used by the external diff
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DIFF_PROGRAM, env = ANNOTEST_DIFF_PROGRAM)]
    pub diff_program: String,

    /// Write a JSON summary of every verdict to PATH
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,
}

/// CLI-friendly diff tool selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DiffToolKind {
    /// Run an external diff program
    External,
    /// Compute the diff in-process
    Builtin,
}

impl Cli {
    pub fn diff_tool(&self) -> DiffTool {
        match self.diff_tool {
            DiffToolKind::External => DiffTool::External {
                program: self.diff_program.clone(),
            },
            DiffToolKind::Builtin => DiffTool::Builtin,
        }
    }

    pub fn run_config(&self, mode: ExecutionMode) -> RunConfig {
        RunConfig {
            out_dir: self.out_dir.clone(),
            mode,
            force: self.force,
            remove_outputs: self.rmout,
            verbose: self.verbose,
            diff_tool: self.diff_tool(),
            summary_path: self.summary.clone(),
        }
    }
}

/// The parsed command line as an [`OptionProvider`].
///
/// Keeps the clap `Command` so any declared long option, not just the fields
/// of [`Cli`], can be looked up by name.
#[derive(Debug, Clone)]
pub struct ClapOptions {
    command: clap::Command,
    matches: ArgMatches,
}

impl ClapOptions {
    /// Parse `args` into both the typed [`Cli`] and the option table.
    pub fn try_parse_from<I, T>(args: I) -> Result<(Cli, Self), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = Cli::command();
        let matches = command.clone().try_get_matches_from(args)?;
        let cli = Cli::from_arg_matches(&matches)?;
        Ok((cli, Self { command, matches }))
    }

    fn id(&self, long: &str) -> Option<&str> {
        self.command
            .get_arguments()
            .find(|arg| arg.get_long() == Some(long))
            .map(|arg| arg.get_id().as_str())
    }
}

impl OptionProvider for ClapOptions {
    fn exists(&self, long: &str) -> bool {
        self.id(long).is_some()
    }

    /// Given on the command line or through its environment variable;
    /// defaults do not count.
    fn is_used(&self, long: &str) -> bool {
        self.id(long)
            .and_then(|id| self.matches.value_source(id))
            .is_some_and(|source| {
                matches!(source, ValueSource::CommandLine | ValueSource::EnvVariable)
            })
    }

    fn get(&self, long: &str) -> Option<String> {
        let id = self.id(long)?;
        let values: Vec<String> = self
            .matches
            .get_raw(id)?
            .map(|v| v.to_string_lossy().into_owned())
            .collect();
        Some(values.join(" "))
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
