use crate::config_file::ConfigFile;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use common::context::Assignment;
use common::Flag;

/// Store a boolean value under a context key
#[derive(Clone, Debug)]
pub struct SetCommand {
    pub key: String,
    pub value: String,
}

impl Runnable for SetCommand {
    fn runner(&self, config: &ConfigFile) -> impl Runner {
        SetRunner {
            command: self.clone(),
            config: config.clone(),
        }
    }
}

pub struct SetRunner {
    command: SetCommand,
    config: ConfigFile,
}

impl Runner for SetRunner {
    fn run(&mut self) -> Result<(), Error> {
        let key = self.command.key.as_str();
        let flag = Flag::coerce(&self.command.value);
        let outcome = self.config.update(|doc| doc.set(key, flag))?;

        match outcome {
            Assignment::Updated => println!(
                "{} {}: set '{key}' to '{flag}'",
                console::style("Updated").green().bold(),
                self.config.display_name(),
            ),

            Assignment::Unchanged => println!(
                "'{key}' is already set to '{flag}'. {}",
                console::style("No change needed.").dim()
            ),
        }

        Ok(())
    }
}
