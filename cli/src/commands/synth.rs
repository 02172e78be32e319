use crate::config_file::{write_atomic, ConfigFile};
use crate::error::Error;
use crate::runner::{Runnable, Runner};
use common::stack::Environment;
use common::template::{Template, IMAGE_URI_PARAMETER};
use common::{compose, Stack};
use eyre::WrapErr;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

/// Default directory for synthesized templates
pub const DEFAULT_OUT_DIR: &str = "synth.out";

/// Compose the resources from the context and render the deployment template
#[derive(Clone, Debug)]
pub struct SynthCommand {
    pub out_dir: PathBuf,

    /// Print the template instead of writing files
    pub to_stdout: bool,

    pub environment: Environment,
}

impl Runnable for SynthCommand {
    fn runner(&self, config: &ConfigFile) -> impl Runner {
        SynthRunner {
            command: self.clone(),
            config: config.clone(),
        }
    }
}

/// Account and region the stack targets, as exported by the deployment tooling
pub fn target_environment() -> Environment {
    Environment {
        account: std::env::var("CDK_DEFAULT_ACCOUNT").ok(),
        region: std::env::var("CDK_DEFAULT_REGION").ok(),
    }
}

pub struct SynthRunner {
    command: SynthCommand,
    config: ConfigFile,
}

impl Runner for SynthRunner {
    fn run(&mut self) -> Result<(), Error> {
        let document = self.config.read()?;
        let context = &document.context;

        let composed = Stack::from_context(context, self.command.environment.clone())
            .and_then(|stack| Ok((stack, compose(context)?)));

        let (stack, graph) = composed.map_err(|e| {
            self.error(
                None,
                Some("Initialize the service first: set-context init <service-name>"),
                Some(Box::new(e)),
            )
        })?;

        log::info!(
            "Composed {} resources and {} relations for {}",
            graph.resources().len(),
            graph.edges().len(),
            stack.environment.uri()
        );

        let template = Template::new(&graph, &stack)
            .to_string_pretty()
            .wrap_err("Failed to render the template")?;

        if self.command.to_stdout {
            println!("{template}");
            return Ok(());
        }

        let image_directory = graph
            .functions()
            .map(|function| function.image_directory.as_str())
            .next()
            .unwrap_or_default();

        self.write(&stack, &template, image_directory)
    }
}

impl SynthRunner {
    /// Write the template and a manifest describing it
    ///
    /// The manifest is not a cloud assembly. It tells the deployer where the
    /// template is and which parameters it has to supply.
    fn write(&self, stack: &Stack, template: &str, image_directory: &str) -> Result<(), Error> {
        let out_dir = &self.command.out_dir;
        let template_file = format!("{}.template.json", stack.name);

        let manifest = json!({
            "artifacts": {
                stack.name.as_str(): {
                    "type": "aws:cloudformation:stack",
                    "environment": stack.environment.uri(),
                    "properties": {
                        "templateFile": template_file,
                        "parameters": {
                            IMAGE_URI_PARAMETER: {
                                "imageDirectory": image_directory,
                            },
                        },
                    },
                },
            },
        });

        fs::create_dir_all(out_dir)
            .wrap_err_with(|| format!("Can't create {out_dir:?}"))
            .and_then(|_| write_atomic(&out_dir.join(&template_file), template))
            .and_then(|_| {
                let manifest = serde_json::to_string_pretty(&manifest)?;
                write_atomic(&out_dir.join("manifest.json"), &manifest)
            })
            .inspect_err(|e| log::error!("{e:?}"))
            .map_err(|e| {
                Error::new(
                    &format!("Failed to write the template to {}", out_dir.display()),
                    Some(&format!("{e:#}")),
                )
            })?;

        println!(
            "{} {} {}",
            console::style("Synthesized").green().bold(),
            console::style(&stack.name).bold(),
            console::style(format!("to {}", out_dir.join(&template_file).display())).dim(),
        );

        Ok(())
    }
}
