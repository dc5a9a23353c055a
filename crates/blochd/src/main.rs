//! Binary entry point for the execution agent.

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = blochd::Cli::parse();
    let config = blochd::Config::from(cli);
    match blochd::run_agent(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("blochd: {error}");
            ExitCode::FAILURE
        }
    }
}
