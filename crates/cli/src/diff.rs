// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line diff producers.
//!
//! Both variants write a zero-context unified diff of output against
//! expected. The artifact is empty exactly when the files match.

use crate::log::LogSink;
use similar::TextDiff;
use std::path::Path;
use std::process::Stdio;

/// External diff program used when none is configured.
pub const DEFAULT_DIFF_PROGRAM: &str = "diff";

/// How the line diff is computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffTool {
    /// Run `<program> -U 0 <output> <expected>` with stdout captured.
    External { program: String },
    /// Compute the diff in-process.
    Builtin,
}

impl Default for DiffTool {
    fn default() -> Self {
        Self::External {
            program: DEFAULT_DIFF_PROGRAM.to_string(),
        }
    }
}

impl DiffTool {
    /// Shell-equivalent command line, as recorded in the command log.
    pub fn command_line(&self, output: &Path, expected: &Path, diff_path: &Path) -> String {
        let program = match self {
            Self::External { program } => program.as_str(),
            Self::Builtin => "builtin-diff",
        };
        format!(
            "{} -U 0 {} {} > {}",
            program,
            output.display(),
            expected.display(),
            diff_path.display()
        )
    }

    /// Write the diff of `output` against `expected` to `diff_path`.
    ///
    /// A non-zero exit from an external diff is normal when the files differ
    /// and is not an error; only a failure to start it is.
    pub async fn write_diff(
        &self,
        output: &Path,
        expected: &Path,
        diff_path: &Path,
        sink: &mut LogSink,
    ) -> std::io::Result<()> {
        sink.command(&self.command_line(output, expected, diff_path));

        match self {
            Self::External { program } => {
                let artifact = std::fs::File::create(diff_path)?;
                let status = tokio::process::Command::new(program)
                    .arg("-U")
                    .arg("0")
                    .arg(output)
                    .arg(expected)
                    .stdin(Stdio::null())
                    .stdout(Stdio::from(artifact))
                    .status()
                    .await?;
                // diff(1) exits 1 on differences and 2 on trouble.
                if status.code() != Some(0) && status.code() != Some(1) {
                    tracing::warn!(
                        program = program.as_str(),
                        %status,
                        output = %output.display(),
                        "diff reported trouble; only its output is used"
                    );
                }
                Ok(())
            }
            Self::Builtin => {
                let old = tokio::fs::read(output).await?;
                let new = tokio::fs::read(expected).await?;
                let text = unified_diff(
                    &old,
                    &new,
                    &output.display().to_string(),
                    &expected.display().to_string(),
                )?;
                tokio::fs::write(diff_path, text).await
            }
        }
    }
}

/// Zero-context unified diff of raw bytes; empty exactly when the inputs
/// are byte-identical.
pub fn unified_diff(
    old: &[u8],
    new: &[u8],
    old_label: &str,
    new_label: &str,
) -> std::io::Result<Vec<u8>> {
    let mut text = Vec::new();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(0)
        .header(old_label, new_label)
        .to_writer(&mut text)?;
    Ok(text)
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
