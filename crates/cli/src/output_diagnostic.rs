// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing diagnostics on stderr.
//!
//! Fatal errors and recoverable warnings are printed here so they reach the
//! user even when the `tracing` filter hides everything below `warn`.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// Severity of a diagnostic line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Error,
    Warning,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
        }
    }

    /// ANSI SGR color code.
    fn color(self) -> u8 {
        match self {
            Level::Error => 31,
            Level::Warning => 33,
        }
    }
}

/// Print a fatal error to stderr, in red on a terminal.
pub fn print_error(msg: impl Display) {
    emit(Level::Error, msg);
}

/// Print a warning to stderr, in yellow on a terminal.
pub fn print_warning(msg: impl Display) {
    emit(Level::Warning, msg);
}

fn emit(level: Level, msg: impl Display) {
    let mut stderr = io::stderr();
    let is_tty = stderr.is_terminal();
    write_diagnostic(&mut stderr, level, msg, is_tty);
}

fn write_diagnostic<W: Write>(writer: &mut W, level: Level, msg: impl Display, is_terminal: bool) {
    let _ = if is_terminal {
        writeln!(
            writer,
            "\x1b[{}m{}: {}\x1b[0m",
            level.color(),
            level.label(),
            msg
        )
    } else {
        writeln!(writer, "{}: {}", level.label(), msg)
    };
}

#[cfg(test)]
#[path = "output_diagnostic_tests.rs"]
mod tests;
