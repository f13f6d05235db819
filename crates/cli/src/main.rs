// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! annotest binary entry point.

use annotest::cli::ClapOptions;
use annotest::env::{self, ProcessEnv};
use annotest::log::init_tracing;
use annotest::options::ExecutionMode;
use annotest::output_diagnostic::print_error;
use annotest::runner::{self, exit_codes};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing(env::log_filter().as_deref());

    let (cli, options) = match ClapOptions::try_parse_from(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    let invocation = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let config = cli.run_config(ExecutionMode::from_options(&options));

    let result = runner::launch(config, &cli.test_file, &invocation, &options, &ProcessEnv).await;
    let code = match result {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            print_error(&e);
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}
