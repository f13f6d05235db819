// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test-suite execution.
//!
//! Cases run strictly in file order: a case's command finishes before any of
//! its files are compared, and the next case starts only after that.

use crate::cleanup::{remove_dirs, CleanupError};
use crate::compare::{compare_files, CompareError, Verdict};
use crate::diff::DiffTool;
use crate::env::Environment;
use crate::log::LogSink;
use crate::options::{ExecutionMode, OptionProvider};
use crate::testspec::{self, ParseContext, TestSpecError, TestSuite};
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;

/// Process exit codes.
pub mod exit_codes {
    /// Every file matched its golden file.
    pub const SUCCESS: i32 = 0;
    /// The run stopped on an error.
    pub const ERROR: i32 = 1;
    /// The run completed but at least one file differed.
    pub const FAILURES: i32 = 2;
}

/// Name used for run artifacts when the output directory has no final
/// component (e.g. `.`).
const FALLBACK_RUN_NAME: &str = "annotest";

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Spec(#[from] TestSpecError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error("output directory {}: {reason}", path.display())]
    OutputDir { path: PathBuf, reason: String },

    #[error("command exited with {status}: {command}")]
    CommandFailed { command: String, status: String },

    #[error("failed to start command {command}: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    #[error("failed to write summary {}: {source}", path.display())]
    Summary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    fn output_dir(path: &Path, reason: impl Into<String>) -> Self {
        Self::OutputDir {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Settings for one harness run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub out_dir: PathBuf,
    pub mode: ExecutionMode,
    /// Replace an existing output directory in execute mode.
    pub force: bool,
    /// Remove each passing case's `rmdir:` directories.
    pub remove_outputs: bool,
    /// Echo commands to stdout.
    pub verbose: bool,
    pub diff_tool: DiffTool,
    pub summary_path: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            mode: ExecutionMode::default(),
            force: false,
            remove_outputs: false,
            verbose: false,
            diff_tool: DiffTool::default(),
            summary_path: None,
        }
    }

    /// Final component of the output directory; prefixes every artifact.
    pub fn name(&self) -> String {
        self.out_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_RUN_NAME.to_string())
    }

    pub fn log_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.annotest.log", self.name()))
    }

    pub fn cmd_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.annotest.cmd", self.name()))
    }

    /// Diff artifact for pair `pair` of case `case`, both 1-based.
    pub fn diff_path(&self, case: usize, pair: usize) -> PathBuf {
        self.out_dir
            .join(format!("{}.{}.{}.diff", self.name(), case, pair))
    }
}

/// Outcome of one test case.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseResult {
    pub description: String,
    pub command: String,
    /// `None` in compare-only mode.
    pub elapsed_secs: Option<f64>,
    pub files: Vec<Verdict>,
    /// Cleanup directories were removed.
    pub cleaned: bool,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.files.iter().all(Verdict::passed)
    }
}

/// Outcome of a whole run, also written as the JSON summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub out_dir: PathBuf,
    pub mode: ExecutionMode,
    pub total_files: usize,
    pub failed_files: usize,
    pub cases: Vec<CaseResult>,
}

impl RunSummary {
    fn new(config: &RunConfig, cases: Vec<CaseResult>) -> Self {
        let files = cases.iter().flat_map(|c| &c.files);
        let total_files = files.clone().count();
        let failed_files = files.filter(|v| !v.passed()).count();
        Self {
            out_dir: config.out_dir.clone(),
            mode: config.mode,
            total_files,
            failed_files,
            cases,
        }
    }

    pub fn passed(&self) -> bool {
        self.failed_files == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            exit_codes::SUCCESS
        } else {
            exit_codes::FAILURES
        }
    }

    /// Closing line of the progress log.
    pub fn verdict_line(&self) -> String {
        if self.passed() {
            format!("All {} files passed.", self.total_files)
        } else {
            format!(
                "FAIL: {} of {} files failed.",
                self.failed_files, self.total_files
            )
        }
    }
}

/// Make the output directory ready for a run.
///
/// Execute mode starts from a fresh directory; compare-only mode reuses the
/// outputs of an earlier run.
pub fn prepare_output_dir(config: &RunConfig) -> Result<(), RunError> {
    let dir = &config.out_dir;
    match config.mode {
        ExecutionMode::CompareOnly => {
            if !dir.is_dir() {
                return Err(RunError::output_dir(
                    dir,
                    "does not exist (required with --skipexec)",
                ));
            }
            Ok(())
        }
        ExecutionMode::Execute => {
            if dir.exists() {
                if !config.force {
                    return Err(RunError::output_dir(
                        dir,
                        "already exists (use --force to replace it)",
                    ));
                }
                tracing::info!(dir = %dir.display(), "removing existing output directory");
                fs::remove_dir_all(dir)
                    .map_err(|e| RunError::output_dir(dir, format!("cannot remove: {e}")))?;
            }
            fs::create_dir_all(dir)
                .map_err(|e| RunError::output_dir(dir, format!("cannot create: {e}")))
        }
    }
}

/// Executes the cases of a parsed suite.
pub struct Runner {
    config: RunConfig,
    sink: LogSink,
}

impl Runner {
    pub fn new(config: RunConfig, sink: LogSink) -> Self {
        Self { config, sink }
    }

    /// Run every case, stopping at the first fatal error.
    pub async fn run(&mut self, suite: &TestSuite) -> Result<RunSummary, RunError> {
        let total = suite.len();
        let mut cases = Vec::with_capacity(total);

        for (index, case) in suite.cases.iter().enumerate() {
            let number = index + 1;
            self.sink.progress_line(format_args!(
                "## Test {} of {}: {}",
                number, total, case.description
            ));

            let elapsed_secs = match self.config.mode {
                ExecutionMode::Execute => Some(self.execute(&case.command).await?),
                ExecutionMode::CompareOnly => None,
            };

            let mut files = Vec::with_capacity(case.output_files.len());
            for (pair, (output, expected)) in case.file_pairs().enumerate() {
                let diff_path = self.config.diff_path(number, pair + 1);
                let verdict = compare_files(
                    output,
                    expected,
                    &diff_path,
                    &self.config.diff_tool,
                    &mut self.sink,
                )
                .await?;
                files.push(verdict);
            }

            let mut result = CaseResult {
                description: case.description.clone(),
                command: case.command.clone(),
                elapsed_secs,
                files,
                cleaned: false,
            };
            if self.config.remove_outputs && result.passed() && !case.cleanup_dirs.is_empty() {
                remove_dirs(&case.cleanup_dirs, &mut self.sink).await?;
                result.cleaned = true;
            }
            cases.push(result);
        }

        let summary = RunSummary::new(&self.config, cases);
        self.sink.progress_line("#");
        self.sink.progress_line(summary.verdict_line());
        self.sink.flush();
        Ok(summary)
    }

    /// Run `command` through `sh -c`, returning elapsed seconds.
    async fn execute(&mut self, command: &str) -> Result<f64, RunError> {
        self.sink.command(command);
        self.sink.progress("  running command ... ");
        let start = Instant::now();

        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| RunError::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        let elapsed = start.elapsed().as_secs_f64();
        if !status.success() {
            self.sink.progress_line("FAILED");
            return Err(RunError::CommandFailed {
                command: command.to_string(),
                status: status.to_string(),
            });
        }
        self.sink
            .progress_line(format_args!("done. [{:.2} seconds]", elapsed));
        Ok(elapsed)
    }
}

/// Write `summary` as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), RunError> {
    let to_err = |source: io::Error| RunError::Summary {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(fs::File::create(path).map_err(to_err)?);
    serde_json::to_writer_pretty(&mut writer, summary).map_err(|e| to_err(e.into()))?;
    writeln!(writer).and_then(|()| writer.flush()).map_err(to_err)
}

/// Full harness run: prepare the output directory, open the run logs,
/// parse `test_file` and execute it.
pub async fn launch(
    config: RunConfig,
    test_file: &Path,
    invocation: &str,
    options: &dyn OptionProvider,
    env: &dyn Environment,
) -> Result<RunSummary, RunError> {
    prepare_output_dir(&config)?;

    let mut sink = LogSink::new()
        .with_progress(io::stdout())
        .with_files(&config.log_path(), &config.cmd_path())
        .map_err(|e| RunError::output_dir(&config.out_dir, format!("cannot open run log: {e}")))?;
    sink.banner(invocation);
    if config.verbose {
        sink = sink.with_commands(io::stdout());
    }

    let ctx = ParseContext {
        options,
        env,
        mode: config.mode,
    };
    let suite = testspec::parse(test_file, &ctx)?;
    tracing::info!(
        test_file = %test_file.display(),
        files = suite.file_count(),
        "starting run"
    );

    let summary_path = config.summary_path.clone();
    let mut runner = Runner::new(config, sink);
    let summary = runner.run(&suite).await?;

    if let Some(path) = summary_path {
        write_summary(&path, &summary)?;
    }
    Ok(summary)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
