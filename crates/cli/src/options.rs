// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The harness option table as seen by the test-file parser.
//!
//! `!name!` placeholders in `command:` lines resolve against long options,
//! and `-s` switches the parser into compare-only mode. Both go through
//! [`OptionProvider`] so the parser does not depend on clap.

use std::collections::BTreeMap;

/// Long option that selects compare-only mode.
pub const SKIPEXEC: &str = "skipexec";

/// Read-only view of the options the harness was invoked with.
///
/// Names are long option names without the leading `--`.
pub trait OptionProvider {
    /// The option is declared by the harness.
    fn exists(&self, long: &str) -> bool;

    /// The user supplied the option for this invocation.
    fn is_used(&self, long: &str) -> bool;

    /// Value of a supplied option.
    fn get(&self, long: &str) -> Option<String>;
}

/// Whether commands run before their outputs are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run each command; outputs must not exist beforehand.
    #[default]
    Execute,
    /// Only compare; outputs must already exist.
    CompareOnly,
}

impl ExecutionMode {
    pub fn from_options(options: &dyn OptionProvider) -> Self {
        if options.is_used(SKIPEXEC) {
            Self::CompareOnly
        } else {
            Self::Execute
        }
    }
}

/// In-memory option table.
#[derive(Clone, Debug, Default)]
pub struct StaticOptions {
    declared: BTreeMap<String, Option<String>>,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option the user did not supply.
    pub fn declare(mut self, long: impl Into<String>) -> Self {
        self.declared.insert(long.into(), None);
        self
    }

    /// Declare an option and supply a value for it.
    pub fn with_value(mut self, long: impl Into<String>, value: impl Into<String>) -> Self {
        self.declared.insert(long.into(), Some(value.into()));
        self
    }

    /// Declare and supply a boolean flag.
    pub fn with_flag(self, long: impl Into<String>) -> Self {
        self.with_value(long, "true")
    }
}

impl OptionProvider for StaticOptions {
    fn exists(&self, long: &str) -> bool {
        self.declared.contains_key(long)
    }

    fn is_used(&self, long: &str) -> bool {
        matches!(self.declared.get(long), Some(Some(_)))
    }

    fn get(&self, long: &str) -> Option<String> {
        self.declared.get(long).cloned().flatten()
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
