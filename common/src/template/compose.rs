use super::graph::*;
use crate::context::Context;
use std::time::Duration;

const FUNCTION_MEMORY_MB: u32 = 1024;
const FUNCTION_TIMEOUT: Duration = Duration::from_secs(10);
const QUEUE_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);
const QUEUE_RETENTION: Duration = Duration::from_secs(4 * 24 * 60 * 60);
const QUEUE_BATCH_SIZE: u32 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("service_name must be set in the context")]
    MissingServiceName,

    #[error("stack_name must be set in the context")]
    MissingStackName,
}

/// Build the resource graph for a context
///
/// The function is always there. A table and a queue are added on top of it,
/// each behind its own flag and independently of each other.
pub fn compose(context: &Context) -> Result<ResourceGraph, ComposeError> {
    let service_name = context
        .service_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(ComposeError::MissingServiceName)?;

    let mut graph = ResourceGraph::default();

    graph.add_resource(Resource::Function(FunctionResource {
        id: FUNCTION_ID.into(),
        function_name: format!("{service_name}-service"),
        memory_size: FUNCTION_MEMORY_MB,
        timeout: FUNCTION_TIMEOUT,
        image_directory: "function".into(),
    }));

    graph.add_edge(Edge::Environment {
        function: FUNCTION_ID.into(),
        key: SERVICE_NAME_ENV.into(),
        value: EnvValue::Literal(service_name.into()),
    });

    if context.dynamodb_enabled() {
        add_table(&mut graph, service_name);
    }

    if context.sqs_enabled() {
        add_queue(&mut graph, service_name);
    }

    Ok(graph)
}

fn add_table(graph: &mut ResourceGraph, service_name: &str) {
    graph.add_resource(Resource::Table(TableResource {
        id: TABLE_ID.into(),
        table_name: format!("{service_name}-data"),
        partition_key: "pk".into(),
        sort_key: Some("sk".into()),
    }));

    graph.add_edge(Edge::Grant {
        principal: FUNCTION_ID.into(),
        resource: TABLE_ID.into(),
        access: Access::ReadWriteData,
    });

    graph.add_edge(Edge::Environment {
        function: FUNCTION_ID.into(),
        key: TABLE_NAME_ENV.into(),
        value: EnvValue::Reference(TABLE_ID.into()),
    });
}

fn add_queue(graph: &mut ResourceGraph, service_name: &str) {
    graph.add_resource(Resource::Queue(QueueResource {
        id: QUEUE_ID.into(),
        queue_name: format!("{service_name}-queue.fifo"),
        fifo: true,
        content_based_deduplication: true,
        visibility_timeout: QUEUE_VISIBILITY_TIMEOUT,
        retention_period: QUEUE_RETENTION,
    }));

    graph.add_edge(Edge::EventSource {
        source: QUEUE_ID.into(),
        target: FUNCTION_ID.into(),
        batch_size: QUEUE_BATCH_SIZE,
    });

    graph.add_edge(Edge::Grant {
        principal: FUNCTION_ID.into(),
        resource: QUEUE_ID.into(),
        access: Access::ConsumeMessages,
    });

    graph.add_edge(Edge::Environment {
        function: FUNCTION_ID.into(),
        key: QUEUE_URL_ENV.into(),
        value: EnvValue::Reference(QUEUE_ID.into()),
    });
}
