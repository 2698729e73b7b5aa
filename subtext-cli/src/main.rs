//! subtext
//!
//! Prints the subtitles of a video as plain text. Only subtitle text is
//! written to stdout, so the output can be redirected to a file; logs and
//! errors go to stderr.

mod cli;

use clap::Parser;
use std::io;
use std::process::ExitCode;

use crate::cli::{build_extractor, run, Cli};

fn main() -> ExitCode {
    // clap prints usage errors to stderr and exits with status 2
    let cli = Cli::try_parse().unwrap_or_else(|e| e.exit());

    init_logging(cli.verbose);

    let code = run(
        &cli,
        build_extractor,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}

/// Initialize logging on stderr. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "subtext=debug,subtext_lib=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
