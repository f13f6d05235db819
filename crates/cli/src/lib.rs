// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Regression-test harness for annotation pipelines.
//!
//! A test file lists shell commands together with the files each command
//! must produce and the golden files they are compared against. The harness
//! runs each command, diffs every output against its golden copy, and for
//! sqtable feature tables adds a structural report (see
//! [`annotest_sqtable`]) explaining which sequences and features changed.

pub mod cleanup;
pub mod cli;
pub mod compare;
pub mod diff;
pub mod env;
pub mod log;
pub mod options;
pub mod output_diagnostic;
pub mod placeholder;
pub mod runner;
pub mod testspec;
