// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn declared_but_unused_option() {
    let options = StaticOptions::new().declare("dirbuild");
    assert!(options.exists("dirbuild"));
    assert!(!options.is_used("dirbuild"));
    assert_eq!(options.get("dirbuild"), None);
}

#[test]
fn supplied_option_has_value() {
    let options = StaticOptions::new().with_value("dirbuild", "/build");
    assert!(options.is_used("dirbuild"));
    assert_eq!(options.get("dirbuild"), Some("/build".to_string()));
}

#[test]
fn undeclared_option_does_not_exist() {
    let options = StaticOptions::new();
    assert!(!options.exists("dirbuild"));
    assert!(!options.is_used("dirbuild"));
}

#[test]
fn skipexec_selects_compare_only_mode() {
    let options = StaticOptions::new().with_flag(SKIPEXEC);
    assert_eq!(ExecutionMode::from_options(&options), ExecutionMode::CompareOnly);
}

#[test]
fn default_mode_executes() {
    let options = StaticOptions::new().declare(SKIPEXEC);
    assert_eq!(ExecutionMode::from_options(&options), ExecutionMode::Execute);
}
