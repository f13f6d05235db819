// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn static_env_returns_configured_values() {
    let env = StaticEnv::new().with_var("VADRSCRIPTSDIR", "/opt/vadr");
    assert_eq!(env.var("VADRSCRIPTSDIR"), Some("/opt/vadr".to_string()));
    assert_eq!(env.var("UNSET"), None);
}

#[test]
fn log_filter_ignores_blank_values() {
    let env = StaticEnv::new().with_var(ANNOTEST_LOG, "  ");
    assert_eq!(log_filter_from(&env), None);
}

#[test]
fn log_filter_returns_directive() {
    let env = StaticEnv::new().with_var(ANNOTEST_LOG, "annotest=debug");
    assert_eq!(log_filter_from(&env), Some("annotest=debug".to_string()));
}

#[test]
fn process_env_reads_path() {
    // PATH is set in every environment cargo runs tests in.
    assert!(ProcessEnv.var("PATH").is_some());
}

#[test]
fn generated_names_match_their_values() {
    assert_eq!(ANNOTEST_LOG, "ANNOTEST_LOG");
    assert_eq!(ANNOTEST_DIRBUILD, "ANNOTEST_DIRBUILD");
    assert_eq!(ANNOTEST_DIFF_TOOL, "ANNOTEST_DIFF_TOOL");
    assert_eq!(ANNOTEST_DIFF_PROGRAM, "ANNOTEST_DIFF_PROGRAM");
}
