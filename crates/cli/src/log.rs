// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run log sinks and diagnostic tracing setup.
//!
//! A run writes two human-readable streams: progress (test headers, file
//! checks, verdicts) and commands (every shell and diff command, in order,
//! so a run can be replayed by hand). Internal diagnostics go through
//! `tracing` to stderr instead.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

type Destination = Box<dyn Write + Send>;

/// Progress and command destinations for a run.
///
/// Write errors are ignored; a full disk must not turn a passing test into
/// a failure.
#[derive(Default)]
pub struct LogSink {
    progress: Vec<Destination>,
    commands: Vec<Destination>,
}

impl LogSink {
    /// A sink that discards everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also send progress to `writer`.
    pub fn with_progress(mut self, writer: impl Write + Send + 'static) -> Self {
        self.progress.push(Box::new(writer));
        self
    }

    /// Also send commands to `writer`.
    pub fn with_commands(mut self, writer: impl Write + Send + 'static) -> Self {
        self.commands.push(Box::new(writer));
        self
    }

    /// Append progress to `log_path` and commands to `cmd_path`, creating
    /// both files.
    pub fn with_files(self, log_path: &Path, cmd_path: &Path) -> io::Result<Self> {
        let log = BufWriter::new(File::create(log_path)?);
        let cmd = BufWriter::new(File::create(cmd_path)?);
        Ok(self.with_progress(log).with_commands(cmd))
    }

    /// Write a progress fragment. The caller supplies line breaks.
    pub fn progress(&mut self, text: impl Display) {
        for dest in &mut self.progress {
            let _ = write!(dest, "{}", text);
            let _ = dest.flush();
        }
    }

    /// Write a full progress line.
    pub fn progress_line(&mut self, text: impl Display) {
        self.progress(format_args!("{}\n", text));
    }

    /// Record a command before it runs.
    pub fn command(&mut self, command: &str) {
        tracing::debug!(command, "running");
        for dest in &mut self.commands {
            let _ = writeln!(dest, "{}", command);
            let _ = dest.flush();
        }
    }

    /// Write the same banner to both streams.
    pub fn banner(&mut self, invocation: &str) {
        let text = banner(invocation);
        self.progress(&text);
        for dest in &mut self.commands {
            let _ = write!(dest, "{}", text);
        }
    }

    pub fn flush(&mut self) {
        for dest in self.progress.iter_mut().chain(self.commands.iter_mut()) {
            let _ = dest.flush();
        }
    }
}

/// Header lines naming the tool, the time and how it was invoked.
pub fn banner(invocation: &str) -> String {
    format!(
        "# {} {}\n# date: {}\n# command: {}\n#\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%a %b %e %H:%M:%S %Y"),
        invocation
    )
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedBuffer {
    inner: std::sync::Arc<parking_lot::Mutex<Vec<u8>>>,
}

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Install the stderr diagnostics subscriber.
///
/// `filter` uses `EnvFilter` directive syntax; warnings only by default.
/// Installing twice is a no-op.
pub fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
