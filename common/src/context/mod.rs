mod flag;

pub use flag::Flag;

use crate::template::sanitize::stack_name;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::str::FromStr;

/// Placeholder service name a freshly scaffolded project starts with
pub const DEFAULT_SERVICE_NAME: &str = "sample-ms";

pub const SERVICE_NAME_KEY: &str = "service_name";
pub const STACK_NAME_KEY: &str = "stack_name";
pub const DYNAMODB_KEY: &str = "include_dynamodb";
pub const SQS_KEY: &str = "include_sqs";

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("A non-empty service name is required")]
    EmptyServiceName,

    #[error("Invalid value {value} for '{key}', expected \"true\" or \"false\"")]
    InvalidFlag { key: String, value: String },

    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A validated, non-empty service identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, ContextError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ContextError::EmptyServiceName);
        }

        Ok(ServiceName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stack name derived from the service name
    pub fn stack_name(&self) -> String {
        stack_name(&self.0)
    }
}

impl FromStr for ServiceName {
    type Err = ContextError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ServiceName::new(name)
    }
}

/// Settings driving the resource composition
///
/// Keys other than the recognized ones are kept as they are.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dynamodb: Option<Flag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_sqs: Option<Flag>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Result of `Context::initialize`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Initialization {
    Initialized {
        service_name: String,
        stack_name: String,
    },

    /// The service name is not the placeholder (or is missing), nothing changed
    AlreadySet { current: Option<String> },
}

/// Result of `Context::set`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assignment {
    Updated,
    Unchanged,
}

impl Context {
    /// Whether the service name has been moved off the scaffolding placeholder
    ///
    /// A scaffolded document always carries the placeholder, so a missing name
    /// does not count as one.
    pub fn is_initialized(&self) -> bool {
        self.service_name.as_deref() != Some(DEFAULT_SERVICE_NAME)
    }

    /// Set the service identity, unless it was set before
    pub fn initialize(&mut self, name: &ServiceName) -> Initialization {
        if self.is_initialized() {
            return Initialization::AlreadySet {
                current: self.service_name.clone(),
            };
        }

        let service_name = name.as_str().to_string();
        let stack_name = name.stack_name();
        self.service_name = Some(service_name.clone());
        self.stack_name = Some(stack_name.clone());

        Initialization::Initialized {
            service_name,
            stack_name,
        }
    }

    /// Current value of any key, as stored in the document
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            SERVICE_NAME_KEY => self.service_name.as_deref().map(Cow::Borrowed),
            STACK_NAME_KEY => self.stack_name.as_deref().map(Cow::Borrowed),
            DYNAMODB_KEY => self.include_dynamodb.map(|f| Cow::Borrowed(f.as_str())),
            SQS_KEY => self.include_sqs.map(|f| Cow::Borrowed(f.as_str())),
            _ => match self.other.get(key)? {
                Value::String(value) => Some(Cow::Borrowed(value.as_str())),
                value => Some(Cow::Owned(value.to_string())),
            },
        }
    }

    /// Store a flag value under any key
    ///
    /// Does nothing if the key already holds the same value. Use `Document::set`
    /// to also normalize how the value was stored.
    pub fn set(&mut self, key: &str, flag: Flag) -> Assignment {
        if self.get(key).as_deref() == Some(flag.as_str()) {
            return Assignment::Unchanged;
        }

        match key {
            SERVICE_NAME_KEY => self.service_name = Some(flag.to_string()),
            STACK_NAME_KEY => self.stack_name = Some(flag.to_string()),
            DYNAMODB_KEY => self.include_dynamodb = Some(flag),
            SQS_KEY => self.include_sqs = Some(flag),
            _ => {
                self.other
                    .insert(key.to_string(), Value::String(flag.to_string()));
            }
        }

        Assignment::Updated
    }

    pub fn dynamodb_enabled(&self) -> bool {
        self.include_dynamodb.is_some_and(Flag::is_enabled)
    }

    pub fn sqs_enabled(&self) -> bool {
        self.include_sqs.is_some_and(Flag::is_enabled)
    }
}

/// The whole configuration document
///
/// Only the `context` block is typed, other top-level keys are carried through untouched
/// and keep their order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub context: Context,
    rest: Map<String, Value>,
}

impl Document {
    /// Store a flag value under a context key
    ///
    /// A value equal to the flag but not stored as its canonical string (a JSON
    /// boolean, `"TRUE"`) is rewritten as well.
    pub fn set(&mut self, key: &str, flag: Flag) -> Assignment {
        let canonical = matches!(
            self.rest.get("context").and_then(|context| context.get(key)),
            Some(Value::String(stored)) if stored == flag.as_str()
        );

        if self.context.set(key, flag) == Assignment::Unchanged && canonical {
            return Assignment::Unchanged;
        }

        // Keep the raw copy in step, it is what tells a rewrite apart from a no-op
        if let Some(Value::Object(context)) = self.rest.get_mut("context") {
            context.insert(key.to_string(), Value::String(flag.to_string()));
        }

        Assignment::Updated
    }

    /// Serialize with 4-space indentation
    pub fn to_pretty_string(&self) -> Result<String, ContextError> {
        let mut document = self.rest.clone();
        document.insert("context".into(), serde_json::to_value(&self.context)?);

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document.serialize(&mut serializer)?;

        let mut text = String::from_utf8_lossy(&buffer).into_owned();
        text.push('\n');
        Ok(text)
    }
}

impl FromStr for Document {
    type Err = ContextError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rest: Map<String, Value> = serde_json::from_str(text)?;

        let context = match rest.get("context") {
            Some(context) => {
                validate_flags(context)?;
                Context::deserialize(context)?
            }
            None => Context::default(),
        };

        Ok(Document { context, rest })
    }
}

/// Reject recognized flags holding anything but a boolean
fn validate_flags(context: &Value) -> Result<(), ContextError> {
    for key in [DYNAMODB_KEY, SQS_KEY] {
        if let Some(value) = context.get(key).filter(|value| !value.is_null()) {
            Flag::deserialize(value).map_err(|_| ContextError::InvalidFlag {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        }
    }

    Ok(())
}
