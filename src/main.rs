use clap::Parser;
use posture_audit::{Cli, handlers::run_normal_mode, logging::init_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_normal_mode(&cli)
}
