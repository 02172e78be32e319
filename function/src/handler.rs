use crate::config::HandlerConfig;
use crate::event::{Invocation, Record};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A message body is not valid JSON
    ///
    /// Aborts the whole batch, so the queue redelivers it.
    #[error("Malformed message #{index} ({}): {source}", .message_id.as_deref().unwrap_or("no id"))]
    MalformedMessage {
        index: usize,
        message_id: Option<String>,
        #[source]
        source: serde_json::Error,
    },

    /// A record does not have the shape of a queue record at all
    #[error("Malformed record #{index}: {source}")]
    MalformedBatch {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize the response: {0}")]
    Response(#[from] serde_json::Error),
}

/// Value returned to the runtime
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Response {
    Direct {
        #[serde(rename = "statusCode")]
        status_code: u16,

        /// JSON encoded `DirectBody`
        body: String,
    },

    Processed { status: &'static str },
}

impl Response {
    pub const SQS_PROCESSED: &'static str = "sqs_processed";
}

/// Body of the direct invocation response
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct DirectBody {
    pub message: String,
    pub configured_dynamo_table: String,
    pub configured_sqs_queue: String,
}

/// Handle a single invocation
///
/// Holds no state between calls, all of the configuration comes in as an argument.
pub fn handle(event: &Value, config: &HandlerConfig) -> Result<Response, HandlerError> {
    tracing::info!(%event, "Event received");

    match Invocation::classify(event) {
        Invocation::Batch(records) => process_batch(records, config),
        Invocation::Direct => respond(config),
    }
}

/// Parse every message body, strictly one after another
///
/// The first malformed message stops processing of the rest of the batch.
fn process_batch(records: &[Value], config: &HandlerConfig) -> Result<Response, HandlerError> {
    tracing::info!(queue = config.queue_url(), count = records.len(), "Processing queue batch");

    for (index, raw) in records.iter().enumerate() {
        let record = Record::deserialize(raw)
            .inspect_err(|e| tracing::error!(index, "Unexpected record shape: {e}"))
            .map_err(|source| HandlerError::MalformedBatch { index, source })?;

        tracing::info!(index, message_id = ?record.message_id, "Processing message");

        let Some(body) = record.body.as_deref().filter(|body| !body.is_empty()) else {
            continue;
        };

        tracing::debug!(body, "Message body");

        // Only the fact that the body parses matters
        serde_json::from_str::<IgnoredAny>(body)
            .inspect_err(|e| tracing::error!(index, "Failed to parse message: {e}"))
            .map_err(|source| HandlerError::MalformedMessage {
                index,
                message_id: record.message_id.clone(),
                source,
            })?;
    }

    tracing::info!("Successfully processed queue messages");

    Ok(Response::Processed {
        status: Response::SQS_PROCESSED,
    })
}

fn respond(config: &HandlerConfig) -> Result<Response, HandlerError> {
    tracing::info!("Processing direct invocation");

    let body = DirectBody {
        message: format!("Hello from the {}!", config.service_name()),
        configured_dynamo_table: config.table_name().to_string(),
        configured_sqs_queue: config.queue_url().to_string(),
    };

    Ok(Response::Direct {
        status_code: 200,
        body: serde_json::to_string(&body)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sqs_event(body: &str) -> Value {
        json!({
            "Records": [{
                "messageId": "059f36b4-87a3-44ab-83d2-661975413000",
                "body": body,
                "eventSource": "aws:sqs",
            }]
        })
    }

    fn direct_body(response: Response) -> DirectBody {
        match response {
            Response::Direct { status_code, body } => {
                assert_eq!(status_code, 200);
                serde_json::from_str(&body).unwrap()
            }
            other => panic!("expected a direct response, got {other:?}"),
        }
    }

    #[test]
    fn direct_invoke_with_configuration() {
        let config = HandlerConfig {
            service_name: Some("test-service".into()),
            table_name: Some("test-table".into()),
            queue_url: Some("test-queue-url".into()),
        };

        let body = direct_body(handle(&json!({}), &config).unwrap());

        assert_eq!(body.message, "Hello from the test-service!");
        assert_eq!(body.configured_dynamo_table, "test-table");
        assert_eq!(body.configured_sqs_queue, "test-queue-url");
    }

    #[test]
    fn direct_invoke_without_configuration() {
        let body = direct_body(handle(&json!({}), &HandlerConfig::default()).unwrap());

        assert_eq!(body.message, "Hello from the default-service!");
        assert_eq!(body.configured_dynamo_table, "Not configured");
        assert_eq!(body.configured_sqs_queue, "Not configured");
    }

    #[test]
    fn direct_response_shape() {
        let response = handle(&json!({}), &HandlerConfig::default()).unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 200);
        assert!(value["body"].is_string());
    }

    #[test]
    fn processes_queue_batch() {
        let event = sqs_event("{\"message\": \"Hello from SQS!\"}");
        let response = handle(&event, &HandlerConfig::default()).unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status": "sqs_processed" })
        );
    }

    #[test]
    fn malformed_message_fails_the_batch() {
        let event = sqs_event("this is not json");
        let error = handle(&event, &HandlerConfig::default()).unwrap_err();

        match error {
            HandlerError::MalformedMessage {
                index, message_id, ..
            } => {
                assert_eq!(index, 0);
                assert_eq!(
                    message_id.as_deref(),
                    Some("059f36b4-87a3-44ab-83d2-661975413000")
                );
            }
            other => panic!("expected a malformed message, got {other:?}"),
        }
    }

    #[test]
    fn stops_at_first_malformed_message() {
        let event = json!({
            "Records": [
                { "messageId": "a", "body": "{}", "eventSource": "aws:sqs" },
                { "messageId": "b", "body": "{oops", "eventSource": "aws:sqs" },
                { "messageId": "c", "body": 42, "eventSource": "aws:sqs" },
            ]
        });

        let error = handle(&event, &HandlerConfig::default()).unwrap_err();
        assert!(matches!(error, HandlerError::MalformedMessage { index: 1, .. }));
    }

    #[test]
    fn messages_without_body_are_skipped() {
        let event = json!({
            "Records": [
                { "messageId": "a", "eventSource": "aws:sqs" },
                { "messageId": "b", "body": "", "eventSource": "aws:sqs" },
                { "messageId": "c", "body": "[1, 2]", "eventSource": "aws:sqs" },
            ]
        });

        assert_eq!(
            handle(&event, &HandlerConfig::default()).unwrap(),
            Response::Processed {
                status: "sqs_processed"
            }
        );
    }

    #[test]
    fn record_with_wrong_shape_is_a_malformed_batch() {
        let event = json!({
            "Records": [
                { "messageId": "a", "body": "{}", "eventSource": "aws:sqs" },
                "not a record",
            ]
        });

        let error = handle(&event, &HandlerConfig::default()).unwrap_err();
        assert!(matches!(error, HandlerError::MalformedBatch { index: 1, .. }));
    }

    #[test]
    fn records_from_other_sources_get_a_direct_response() {
        let event = json!({ "Records": [{ "eventSource": "aws:s3", "body": "not json" }] });
        let body = direct_body(handle(&event, &HandlerConfig::default()).unwrap());

        assert_eq!(body.message, "Hello from the default-service!");
    }
}
