use crate::config_file::ConfigFile;
use crate::error::Error;
use std::error::Error as StdError;

pub trait Runner {
    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    ///
    /// Without a title the origin's message is shown instead.
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = &origin {
            log::error!("{origin:?}");
        }

        match (title, origin) {
            (Some(title), _) => Error::new(title, description),
            (None, Some(origin)) => Error::new(&origin.to_string(), description),
            (None, None) => Error::new("Failed to run the command", description),
        }
    }
}

/// Return a runner for a command
pub trait Runnable {
    fn runner(&self, config: &ConfigFile) -> impl Runner;
}
