use clap::Parser;
use service_context::commands::{Commands, USAGE};
use service_context::config_file::{ConfigFile, DEFAULT_PATH};
use service_context::logger::Logger;
use service_context::runner::{Runnable, Runner};
use std::path::PathBuf;
use std::process::ExitCode;

/// Initialize the service and switch its optional resources on and off
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration document to operate on
    #[arg(long, default_value = DEFAULT_PATH)]
    config: PathBuf,

    /// Nothing to show the status, `init <service-name>`, or `<key> <value>`
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

/// Derive a runner from the command and run it
fn run(command: impl Runnable, config: &ConfigFile) -> ExitCode {
    match command.runner(config).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error.report();
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    Logger::init();
    let cli = Cli::parse();
    let config = ConfigFile::new(cli.config);

    // Match all commands here, in one place
    match Commands::from_args(&cli.args) {
        Some(Commands::Status(cmd)) => run(cmd, &config),
        Some(Commands::Init(cmd)) => run(cmd, &config),
        Some(Commands::Set(cmd)) => run(cmd, &config),

        None => {
            println!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}
