// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::compare::FailReason;
use crate::env::StaticEnv;
use crate::log::SharedBuffer;
use crate::options::StaticOptions;
use crate::testspec::TestCase;
use rstest::rstest;
use tempfile::TempDir;

struct Workspace {
    tmp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    fn golden(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn config(&self) -> RunConfig {
        let mut config = RunConfig::new(self.path("out"));
        config.diff_tool = DiffTool::Builtin;
        config
    }
}

/// A case whose command writes `content` to `output`.
fn printing_case(desc: &str, content: &str, output: &Path, expected: &Path) -> TestCase {
    TestCase {
        command: format!("printf '{}' > {}", content, output.display()),
        description: desc.to_string(),
        output_files: vec![output.to_path_buf()],
        expected_files: vec![expected.to_path_buf()],
        cleanup_dirs: Vec::new(),
    }
}

async fn run_with_progress(
    config: RunConfig,
    suite: &TestSuite,
) -> (Result<RunSummary, RunError>, String) {
    fs::create_dir_all(&config.out_dir).unwrap();
    let progress = SharedBuffer::new();
    let mut runner = Runner::new(config, LogSink::new().with_progress(progress.clone()));
    let result = runner.run(suite).await;
    (result, progress.contents())
}

#[rstest]
#[case("runs/noro", "noro")]
#[case("runs/noro/", "noro")]
#[case(".", "annotest")]
fn run_name_is_final_component(#[case] dir: &str, #[case] name: &str) {
    assert_eq!(RunConfig::new(dir).name(), name);
}

#[test]
fn artifact_paths_live_in_output_dir() {
    let config = RunConfig::new("runs/noro");
    assert_eq!(config.diff_path(2, 3), PathBuf::from("runs/noro/noro.2.3.diff"));
    assert_eq!(config.log_path(), PathBuf::from("runs/noro/noro.annotest.log"));
    assert_eq!(config.cmd_path(), PathBuf::from("runs/noro/noro.annotest.cmd"));
}

#[test]
fn execute_mode_creates_output_dir() {
    let ws = Workspace::new();
    let config = ws.config();
    prepare_output_dir(&config).unwrap();
    assert!(config.out_dir.is_dir());
}

#[test]
fn execute_mode_refuses_existing_dir() {
    let ws = Workspace::new();
    let config = ws.config();
    fs::create_dir(&config.out_dir).unwrap();

    let err = prepare_output_dir(&config).unwrap_err();

    assert!(matches!(err, RunError::OutputDir { .. }));
    assert!(err.to_string().contains("--force"));
}

#[test]
fn force_replaces_existing_dir() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.force = true;
    fs::create_dir(&config.out_dir).unwrap();
    let stale = config.out_dir.join("stale.txt");
    fs::write(&stale, "old").unwrap();

    prepare_output_dir(&config).unwrap();

    assert!(config.out_dir.is_dir());
    assert!(!stale.exists());
}

#[test]
fn compare_only_requires_existing_dir() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.mode = ExecutionMode::CompareOnly;

    assert!(prepare_output_dir(&config).is_err());

    fs::create_dir(&config.out_dir).unwrap();
    fs::write(config.out_dir.join("kept.txt"), "x").unwrap();
    prepare_output_dir(&config).unwrap();
    assert!(config.out_dir.join("kept.txt").exists());
}

#[tokio::test]
async fn passing_suite_reports_all_files_passed() {
    let ws = Workspace::new();
    let config = ws.config();
    let golden = ws.golden("exp.txt", "hello\n");
    let output = config.out_dir.join("hello.txt");
    let suite = TestSuite {
        cases: vec![printing_case("greet", "hello\\n", &output, &golden)],
    };

    let (result, progress) = run_with_progress(config, &suite).await;
    let summary = result.unwrap();

    assert!(summary.passed());
    assert_eq!(summary.exit_code(), exit_codes::SUCCESS);
    assert_eq!(summary.total_files, 1);
    assert!(summary.cases[0].elapsed_secs.is_some());
    assert!(progress.starts_with("## Test 1 of 1: greet\n"), "{progress}");
    assert!(progress.contains("  running command ... done. ["));
    assert!(progress.ends_with("#\nAll 1 files passed.\n"), "{progress}");
}

#[tokio::test]
async fn mismatch_does_not_stop_later_cases() {
    let ws = Workspace::new();
    let config = ws.config();
    let golden = ws.golden("exp.txt", "hello\n");
    let first = config.out_dir.join("first.txt");
    let second = config.out_dir.join("second.txt");
    let suite = TestSuite {
        cases: vec![
            printing_case("wrong", "goodbye\\n", &first, &golden),
            printing_case("right", "hello\\n", &second, &golden),
        ],
    };
    let diff = config.diff_path(1, 1);

    let (result, progress) = run_with_progress(config, &suite).await;
    let summary = result.unwrap();

    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.exit_code(), exit_codes::FAILURES);
    assert_eq!(
        summary.cases[0].files[0].failure,
        Some(FailReason::Differs { see: diff })
    );
    assert!(summary.cases[1].passed());
    assert!(progress.contains("## Test 2 of 2: right\n"));
    assert!(progress.ends_with("FAIL: 1 of 2 files failed.\n"), "{progress}");
}

#[tokio::test]
async fn failing_command_halts_the_run() {
    let ws = Workspace::new();
    let config = ws.config();
    let golden = ws.golden("exp.txt", "x\n");
    let never = config.out_dir.join("never.txt");
    let suite = TestSuite {
        cases: vec![
            TestCase {
                command: "exit 3".to_string(),
                description: "broken".to_string(),
                output_files: vec![config.out_dir.join("a.txt")],
                expected_files: vec![golden.clone()],
                cleanup_dirs: Vec::new(),
            },
            printing_case("unreached", "x\\n", &never, &golden),
        ],
    };

    let (result, progress) = run_with_progress(config, &suite).await;

    match result.unwrap_err() {
        RunError::CommandFailed { command, status } => {
            assert_eq!(command, "exit 3");
            assert!(status.contains('3'), "{status}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!never.exists());
    assert!(!progress.contains("unreached"));
}

#[tokio::test]
async fn compare_only_mode_skips_commands() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.mode = ExecutionMode::CompareOnly;
    let golden = ws.golden("exp.txt", "hello\n");
    fs::create_dir_all(&config.out_dir).unwrap();
    let output = config.out_dir.join("hello.txt");
    fs::write(&output, "hello\n").unwrap();
    let marker = ws.path("ran");
    let suite = TestSuite {
        cases: vec![TestCase {
            command: format!("touch {}", marker.display()),
            ..printing_case("cmp", "", &output, &golden)
        }],
    };

    let (result, progress) = run_with_progress(config, &suite).await;
    let summary = result.unwrap();

    assert!(summary.passed());
    assert!(summary.cases[0].elapsed_secs.is_none());
    assert!(!marker.exists());
    assert!(!progress.contains("running command"));
}

#[tokio::test]
async fn rmout_cleans_only_passing_cases() {
    let ws = Workspace::new();
    let mut config = ws.config();
    config.remove_outputs = true;
    let golden = ws.golden("exp.txt", "hello\n");
    let good_dir = config.out_dir.join("good");
    let bad_dir = config.out_dir.join("bad");
    let case = |desc: &str, text: &str, dir: &Path| TestCase {
        command: format!("mkdir -p {0} && printf '{1}' > {0}/o.txt", dir.display(), text),
        cleanup_dirs: vec![dir.to_path_buf()],
        ..printing_case(desc, "", &dir.join("o.txt"), &golden)
    };
    let suite = TestSuite {
        cases: vec![
            case("good", "hello\\n", &good_dir),
            case("bad", "nope\\n", &bad_dir),
        ],
    };

    let (result, _) = run_with_progress(config, &suite).await;
    let summary = result.unwrap();

    assert!(summary.cases[0].cleaned);
    assert!(!good_dir.exists());
    assert!(!summary.cases[1].cleaned);
    assert!(bad_dir.join("o.txt").exists());
}

#[tokio::test]
async fn outputs_are_kept_without_rmout() {
    let ws = Workspace::new();
    let config = ws.config();
    let golden = ws.golden("exp.txt", "hello\n");
    let dir = config.out_dir.join("kept");
    let suite = TestSuite {
        cases: vec![TestCase {
            command: format!("mkdir -p {0} && printf 'hello\\n' > {0}/o.txt", dir.display()),
            cleanup_dirs: vec![dir.clone()],
            ..printing_case("keep", "", &dir.join("o.txt"), &golden)
        }],
    };

    let (result, _) = run_with_progress(config, &suite).await;

    assert!(result.unwrap().passed());
    assert!(dir.exists());
}

#[tokio::test]
async fn summary_is_written_as_json() {
    let ws = Workspace::new();
    let config = ws.config();
    let golden = ws.golden("exp.txt", "hello\n");
    let output = config.out_dir.join("o.txt");
    let suite = TestSuite {
        cases: vec![printing_case("json", "bye\\n", &output, &golden)],
    };
    let (result, _) = run_with_progress(config, &suite).await;
    let path = ws.path("summary.json");

    write_summary(&path, &result.unwrap()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["mode"], "execute");
    assert_eq!(json["failed_files"], 1);
    assert_eq!(json["cases"][0]["description"], "json");
    assert_eq!(json["cases"][0]["files"][0]["failure"]["kind"], "differs");
}

#[tokio::test]
async fn launch_parses_runs_and_writes_logs() {
    let ws = Workspace::new();
    let golden = ws.golden("exp.txt", "built\n");
    let config = ws.config();
    let out_dir = config.out_dir.clone();
    let test_file = ws.golden(
        "tests.txt",
        &format!(
            "command: printf '%s\\n' !dirbuild! > {out}/o.txt\n\
             desc: build\n\
             out: {out}/o.txt\n\
             exp: @GOLDEN@/exp.txt\n",
            out = out_dir.display()
        ),
    );
    let options = StaticOptions::new().with_value("dirbuild", "built");
    let env = StaticEnv::new().with_var("GOLDEN", ws.tmp.path().display().to_string());

    let summary = launch(config.clone(), &test_file, "annotest tests.txt out", &options, &env)
        .await
        .unwrap();

    assert!(summary.passed(), "{summary:?}");
    let log = fs::read_to_string(config.log_path()).unwrap();
    assert!(log.starts_with("# annotest "));
    assert!(log.ends_with("All 1 files passed.\n"));
    let cmd = fs::read_to_string(config.cmd_path()).unwrap();
    assert!(cmd.contains(&format!("printf '%s\\n' built > {}/o.txt\n", out_dir.display())));
    assert!(cmd.contains(&format!(
        "builtin-diff -U 0 {}/o.txt {}",
        out_dir.display(),
        golden.display()
    )));
}

#[tokio::test]
async fn launch_stops_on_existing_output_dir() {
    let ws = Workspace::new();
    let config = ws.config();
    fs::create_dir(&config.out_dir).unwrap();
    let test_file = ws.golden("tests.txt", "");

    let err = launch(
        config,
        &test_file,
        "annotest",
        &StaticOptions::new(),
        &StaticEnv::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RunError::OutputDir { .. }));
}

#[tokio::test]
async fn launch_reports_spec_errors() {
    let ws = Workspace::new();
    let config = ws.config();
    let test_file = ws.golden("tests.txt", "command: run !nope!\n");

    let err = launch(
        config,
        &test_file,
        "annotest",
        &StaticOptions::new(),
        &StaticEnv::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        RunError::Spec(TestSpecError::UnknownOption { .. })
    ));
}
