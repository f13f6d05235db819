// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared helpers for end-to-end harness tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Sample sqtable with two sequences, one note each.
pub const NORO_SQTABLE: &str = "\
>Feature NC_001959.2
5\t5374\tgene
\t\t\tgene\tORF1
5\t5374\tCDS
\t\t\tproduct\tnonstructural polyprotein
\t\t\tnote\tsimilar to reference
>Feature MN996867.1
1\t1623\tgene
\t\t\tgene\tORF2
";

/// Scratch project: golden files under `golden/`, runs under `runs/`.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("golden")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `golden/<name>`.
    pub fn golden(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path("golden").join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the test file and return its path.
    pub fn test_file(&self, content: &str) -> PathBuf {
        let path = self.path("tests.txt");
        fs::write(&path, content).unwrap();
        path
    }

    /// The harness, run from the project root with a clean environment
    /// and the in-process diff.
    pub fn annotest(&self) -> Command {
        let mut cmd = Command::cargo_bin("annotest").unwrap();
        cmd.current_dir(self.root())
            .env_remove("ANNOTEST_DIRBUILD")
            .env_remove("ANNOTEST_DIFF_PROGRAM")
            .env_remove("ANNOTEST_LOG")
            .env("ANNOTEST_DIFF_TOOL", "builtin")
            .env("GOLDEN", self.path("golden"));
        cmd
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }
}
