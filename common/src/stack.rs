use crate::context::Context;
use crate::template::ComposeError;

/// Deployment target
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl Environment {
    /// `aws://<account>/<region>`, with placeholders for unknown parts
    pub fn uri(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account.as_deref().unwrap_or("unknown-account"),
            self.region.as_deref().unwrap_or("unknown-region"),
        )
    }
}

/// The stack a service is deployed as
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    pub name: String,
    pub description: String,
    pub environment: Environment,
}

impl Stack {
    /// Both the service and the stack names must be present in the context
    pub fn from_context(context: &Context, environment: Environment) -> Result<Self, ComposeError> {
        let service_name = context
            .service_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ComposeError::MissingServiceName)?;

        let name = context
            .stack_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ComposeError::MissingStackName)?;

        Ok(Stack {
            name: name.to_string(),
            description: format!("Microservice stack for {service_name}"),
            environment,
        })
    }
}
