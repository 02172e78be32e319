use clap::Parser;
use service_context::commands::synth::{target_environment, SynthCommand, DEFAULT_OUT_DIR};
use service_context::config_file::{ConfigFile, DEFAULT_PATH};
use service_context::logger::Logger;
use service_context::runner::{Runnable, Runner};
use std::path::PathBuf;
use std::process::ExitCode;

/// Render the deployment template of the service from its context
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration document to read
    #[arg(long, default_value = DEFAULT_PATH)]
    config: PathBuf,

    /// Directory for the template and its manifest
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    out: PathBuf,

    /// Print the template instead of writing it
    #[arg(long, action = clap::ArgAction::SetTrue)]
    stdout: bool,
}

fn main() -> ExitCode {
    Logger::init();
    let cli = Cli::parse();

    let command = SynthCommand {
        out_dir: cli.out,
        to_stdout: cli.stdout,
        environment: target_environment(),
    };

    let config = ConfigFile::new(cli.config);
    let result = command.runner(&config).run();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error.report();
            ExitCode::FAILURE
        }
    }
}
