use crate::config_file::ConfigFile;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use common::context::{Initialization, DEFAULT_SERVICE_NAME};
use common::ServiceName;

/// Set the service name and derive the stack name from it
#[derive(Clone, Debug)]
pub struct InitCommand {
    pub name: String,
}

impl Runnable for InitCommand {
    fn runner(&self, config: &ConfigFile) -> impl Runner {
        InitRunner {
            command: self.clone(),
            config: config.clone(),
        }
    }
}

pub struct InitRunner {
    command: InitCommand,
    config: ConfigFile,
}

impl Runner for InitRunner {
    fn run(&mut self) -> Result<(), Error> {
        // Checked before the document is even read
        let name = ServiceName::new(self.command.name.as_str()).map_err(|e| {
            self.error(None, Some("Usage: set-context init <service-name>"), Some(Box::new(e)))
        })?;

        let outcome = self.config.update(|doc| doc.context.initialize(&name))?;
        let file = self.config.display_name();

        match outcome {
            Initialization::Initialized {
                service_name,
                stack_name,
            } => {
                println!(
                    "{} '{service_name}'",
                    console::style("Service initialized:").green().bold()
                );

                println!("Updated {file}:");
                println!("  - set 'service_name' to '{service_name}'");
                println!("  - set 'stack_name' to '{stack_name}'");
            }

            Initialization::AlreadySet { current } => {
                match current {
                    Some(current) => println!(
                        "{} '{current}'.",
                        console::style("Service name is already set to").yellow().bold()
                    ),

                    None => println!(
                        "{}",
                        console::style(format!("Service name is missing from {file}.")).yellow().bold()
                    ),
                }

                println!(
                    "{}",
                    console::style(format!(
                        "If you want to re-initialize, reset 'service_name' in {file} to '{DEFAULT_SERVICE_NAME}' first."
                    ))
                    .dim()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(config: &ConfigFile, name: &str) -> Result<(), Error> {
        InitCommand { name: name.into() }.runner(config).run()
    }

    fn scaffold(dir: &TempDir) -> ConfigFile {
        let path = dir.path().join("cdk.json");
        fs::write(&path, r#"{"context": {"service_name": "sample-ms"}}"#).unwrap();
        ConfigFile::new(path)
    }

    #[test]
    fn initializes_once() {
        let dir = TempDir::new().unwrap();
        let config = scaffold(&dir);

        run(&config, "order-api").unwrap();
        let after_first = fs::read_to_string(config.path()).unwrap();

        let context = config.read().unwrap().context;
        assert_eq!(context.service_name.as_deref(), Some("order-api"));
        assert_eq!(context.stack_name.as_deref(), Some("OrderApiStack"));

        run(&config, "billing").unwrap();
        assert_eq!(fs::read_to_string(config.path()).unwrap(), after_first);
    }

    #[test]
    fn missing_service_name_is_not_claimed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cdk.json");
        let original = r#"{"context": {"include_sqs": "true"}}"#;
        fs::write(&path, original).unwrap();
        let config = ConfigFile::new(path);

        run(&config, "order-api").unwrap();
        assert_eq!(fs::read_to_string(config.path()).unwrap(), original);
    }

    #[test]
    fn empty_name_fails_before_reading() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::new(dir.path().join("missing.json"));

        let error = run(&config, "").unwrap_err();
        assert!(error.message().contains("non-empty service name"));
    }
}
