// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Build scripts are expected to panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;

/// Environment variables the harness reads, with the doc line emitted for
/// each generated constant.
const VARS: &[(&str, &str)] = &[
    ("ANNOTEST_LOG", "Tracing filter for diagnostics on stderr."),
    ("ANNOTEST_DIRBUILD", "Default for `--dirbuild`."),
    ("ANNOTEST_DIFF_TOOL", "Default for `--diff-tool`."),
    ("ANNOTEST_DIFF_PROGRAM", "Default for `--diff-program`."),
];

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::io::BufWriter::new(std::fs::File::create(path).unwrap());

    for (name, doc) in VARS {
        writeln!(f, "/// {doc}").unwrap();
        writeln!(f, "pub const {name}: &str = {name:?};").unwrap();
    }
    f.flush().unwrap();
    println!("cargo:rerun-if-changed=build.rs");
}
