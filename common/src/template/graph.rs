use std::collections::BTreeMap;
use std::time::Duration;

/// Logical ids of the resources within the stack
pub const FUNCTION_ID: &str = "ServiceLambda";
pub const TABLE_ID: &str = "ServiceTable";
pub const QUEUE_ID: &str = "ServiceQueue";

/// Environment variables the deployed function reads
pub const SERVICE_NAME_ENV: &str = "SERVICE_NAME";
pub const TABLE_NAME_ENV: &str = "DYNAMO_TABLE_NAME";
pub const QUEUE_URL_ENV: &str = "SQS_QUEUE_URL";

/// The function, always present in the graph
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionResource {
    pub id: String,
    pub function_name: String,
    pub memory_size: u32,
    pub timeout: Duration,

    /// Directory the container image is built from
    pub image_directory: String,
}

/// An on-demand key-value table, deleted with the stack
///
/// Keys are string-typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableResource {
    pub id: String,
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: Option<String>,
}

/// A message queue, deleted with the stack
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueResource {
    pub id: String,
    pub queue_name: String,
    pub fifo: bool,
    pub content_based_deduplication: bool,
    pub visibility_timeout: Duration,
    pub retention_period: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    Function(FunctionResource),
    Table(TableResource),
    Queue(QueueResource),
}

impl Resource {
    pub fn id(&self) -> &str {
        match self {
            Resource::Function(function) => &function.id,
            Resource::Table(table) => &table.id,
            Resource::Queue(queue) => &queue.id,
        }
    }
}

/// Permissions a grant gives to the principal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadWriteData,
    ConsumeMessages,
}

impl Access {
    pub fn actions(self) -> &'static [&'static str] {
        match self {
            Access::ReadWriteData => &[
                "dynamodb:BatchGetItem",
                "dynamodb:GetRecords",
                "dynamodb:GetShardIterator",
                "dynamodb:Query",
                "dynamodb:GetItem",
                "dynamodb:Scan",
                "dynamodb:ConditionCheckItem",
                "dynamodb:BatchWriteItem",
                "dynamodb:PutItem",
                "dynamodb:UpdateItem",
                "dynamodb:DeleteItem",
                "dynamodb:DescribeTable",
            ],

            Access::ConsumeMessages => &[
                "sqs:ReceiveMessage",
                "sqs:ChangeMessageVisibility",
                "sqs:GetQueueUrl",
                "sqs:DeleteMessage",
                "sqs:GetQueueAttributes",
            ],
        }
    }
}

/// Value of an environment variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvValue {
    Literal(String),

    /// Resolved at deploy time to the runtime identity of a resource,
    /// the table name for a table and the URL for a queue
    Reference(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Grant {
        principal: String,
        resource: String,
        access: Access,
    },

    EventSource {
        source: String,
        target: String,
        batch_size: u32,
    },

    Environment {
        function: String,
        key: String,
        value: EnvValue,
    },
}

/// Resources of a stack and the relations between them
///
/// Built once by `compose()` and not mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    edges: Vec<Edge>,
}

impl ResourceGraph {
    pub(crate) fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    pub(crate) fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionResource> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableResource> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn queues(&self) -> impl Iterator<Item = &QueueResource> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Queue(queue) => Some(queue),
            _ => None,
        })
    }

    /// Grants given to a principal, as (resource id, access) pairs
    pub fn grants(&self, principal: &str) -> impl Iterator<Item = (&str, Access)> {
        self.edges.iter().filter_map(move |edge| match edge {
            Edge::Grant {
                principal: p,
                resource,
                access,
            } if p == principal => Some((resource.as_str(), *access)),
            _ => None,
        })
    }

    /// Event sources bound to a function, as (source id, batch size) pairs
    pub fn event_sources(&self, target: &str) -> impl Iterator<Item = (&str, u32)> {
        self.edges.iter().filter_map(move |edge| match edge {
            Edge::EventSource {
                source,
                target: t,
                batch_size,
            } if t == target => Some((source.as_str(), *batch_size)),
            _ => None,
        })
    }

    /// Environment of a function; a later binding of the same key wins
    pub fn environment(&self, function: &str) -> BTreeMap<&str, &EnvValue> {
        self.edges
            .iter()
            .filter_map(|edge| match edge {
                Edge::Environment {
                    function: f,
                    key,
                    value,
                } if f == function => Some((key.as_str(), value)),
                _ => None,
            })
            .collect()
    }
}
