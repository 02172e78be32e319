/// Runtime configuration of the function
///
/// Passed into the handler instead of reading the environment on every call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandlerConfig {
    pub service_name: Option<String>,
    pub table_name: Option<String>,
    pub queue_url: Option<String>,
}

impl HandlerConfig {
    pub const DEFAULT_SERVICE_NAME: &'static str = "default-service";
    pub const NOT_CONFIGURED: &'static str = "Not configured";

    /// Read the variables set at deploy time
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, e.g. a map in tests
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        HandlerConfig {
            service_name: lookup("SERVICE_NAME"),
            table_name: lookup("DYNAMO_TABLE_NAME"),
            queue_url: lookup("SQS_QUEUE_URL"),
        }
    }

    pub fn service_name(&self) -> &str {
        self.service_name
            .as_deref()
            .unwrap_or(Self::DEFAULT_SERVICE_NAME)
    }

    pub fn table_name(&self) -> &str {
        non_empty(&self.table_name).unwrap_or(Self::NOT_CONFIGURED)
    }

    pub fn queue_url(&self) -> &str {
        non_empty(&self.queue_url).unwrap_or(Self::NOT_CONFIGURED)
    }
}

/// An empty value is as good as a missing one
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
