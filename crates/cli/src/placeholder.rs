// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder substitution in test files.
//!
//! - `!name!` in a command is replaced by the value of `--name`.
//! - `@NAME@` in an expected path is replaced by the environment variable
//!   `NAME`, or by nothing when it is unset.

use crate::env::Environment;
use crate::options::OptionProvider;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static OPTION_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"!([^!\s]+)!").ok());

static ENV_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"@(\w+)@").ok());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("!{0}! does not name a known option (--{0})")]
    UnknownOption(String),

    #[error("!{0}! requires --{0} to be given")]
    MissingOption(String),
}

/// Replace every `!name!` with the value of the long option `name`.
///
/// All placeholders are resolved before any text is replaced, and values are
/// inserted literally.
pub fn substitute_options(
    text: &str,
    options: &dyn OptionProvider,
) -> Result<String, PlaceholderError> {
    let Some(re) = OPTION_TOKEN.as_ref() else {
        return Ok(text.to_string());
    };

    let mut values: HashMap<&str, String> = HashMap::new();
    for caps in re.captures_iter(text) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if values.contains_key(name) {
            continue;
        }
        if !options.exists(name) {
            return Err(PlaceholderError::UnknownOption(name.to_string()));
        }
        let value = options
            .get(name)
            .filter(|_| options.is_used(name))
            .ok_or_else(|| PlaceholderError::MissingOption(name.to_string()))?;
        values.insert(name, value);
    }

    if values.is_empty() {
        return Ok(text.to_string());
    }

    Ok(re
        .replace_all(text, |caps: &Captures| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

/// Replace every `@NAME@` with the environment variable `NAME`.
pub fn substitute_env(text: &str, env: &dyn Environment) -> String {
    let Some(re) = ENV_TOKEN.as_ref() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures| {
        env.var(&caps[1]).unwrap_or_default()
    })
    .into_owned()
}

#[cfg(test)]
#[path = "placeholder_tests.rs"]
mod tests;
