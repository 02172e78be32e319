use crate::config_file::ConfigFile;
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use common::Context;

/// Print the service identity and the optional features
#[derive(Clone, Debug)]
pub struct StatusCommand;

impl Runnable for StatusCommand {
    fn runner(&self, config: &ConfigFile) -> impl Runner {
        StatusRunner {
            config: config.clone(),
        }
    }
}

pub struct StatusRunner {
    config: ConfigFile,
}

impl Runner for StatusRunner {
    fn run(&mut self) -> Result<(), Error> {
        let document = self.config.read()?;
        println!("{}", report(&document.context));
        Ok(())
    }
}

/// Human readable status of the context
pub fn report(context: &Context) -> String {
    let not_set = "Not Set";

    format!(
        "\n---\n{title}\n  Service Name:  {service}\n  Stack Name:    {stack}\n---\n  Optional Features:\n  DynamoDB:      {dynamodb}\n  SQS Queue:     {sqs}\n---\n",
        title = console::style("Service Configuration Status").bold(),
        service = context.service_name.as_deref().unwrap_or(not_set),
        stack = context.stack_name.as_deref().unwrap_or(not_set),
        dynamodb = feature(context.dynamodb_enabled()),
        sqs = feature(context.sqs_enabled()),
    )
}

fn feature(enabled: bool) -> console::StyledObject<&'static str> {
    if enabled {
        console::style("ENABLED").green()
    } else {
        console::style("DISABLED").dim()
    }
}
