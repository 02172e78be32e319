pub mod init;
pub mod set;
pub mod status;
pub mod synth;

use init::InitCommand;
use set::SetCommand;
use status::StatusCommand;

pub const USAGE: &str = "Usage:
  set-context                          - Show current status
  set-context init <service-name>      - Initialize service name
  set-context <KEY> [true|false]       - Set a context value";

/// A command recognized from the shape of the positional arguments
#[derive(Clone, Debug)]
pub enum Commands {
    Status(StatusCommand),
    Init(InitCommand),
    Set(SetCommand),
}

impl Commands {
    /// None for any shape other than the three supported ones
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args {
            [] => Some(Commands::Status(StatusCommand)),

            [command, name] if command == "init" => Some(Commands::Init(InitCommand {
                name: name.clone(),
            })),

            [key, value] => Some(Commands::Set(SetCommand {
                key: key.clone(),
                value: value.clone(),
            })),

            _ => None,
        }
    }
}
