use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event source tag of records delivered by the queue
pub const QUEUE_EVENT_SOURCE: &str = "aws:sqs";

/// A record received from a queue
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub event_source: Option<String>,
}

/// The two shapes an invocation can take
#[derive(Debug, PartialEq)]
pub enum Invocation<'a> {
    /// Messages delivered by the queue, in order
    Batch(&'a [Value]),

    /// Anything else: a test console call, a direct SDK invoke, etc.
    Direct,
}

impl<'a> Invocation<'a> {
    /// Look at the payload and decide how to handle it
    ///
    /// Only a non-empty `Records` list whose first record comes from the queue is a batch.
    pub fn classify(event: &'a Value) -> Self {
        let Some(records) = event.get("Records").and_then(Value::as_array) else {
            return Invocation::Direct;
        };

        let from_queue = records
            .first()
            .and_then(|record| record.get("eventSource"))
            .and_then(Value::as_str)
            == Some(QUEUE_EVENT_SOURCE);

        if from_queue {
            Invocation::Batch(records)
        } else {
            Invocation::Direct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_event_is_direct() {
        assert_eq!(Invocation::classify(&json!({})), Invocation::Direct);
        assert_eq!(Invocation::classify(&json!(null)), Invocation::Direct);
        assert_eq!(Invocation::classify(&json!("ping")), Invocation::Direct);
    }

    #[test]
    fn empty_or_foreign_records_are_direct() {
        assert_eq!(Invocation::classify(&json!({ "Records": [] })), Invocation::Direct);

        let event = json!({ "Records": [{ "eventSource": "aws:s3" }] });
        assert_eq!(Invocation::classify(&event), Invocation::Direct);

        let event = json!({ "Records": [{ "body": "{}" }] });
        assert_eq!(Invocation::classify(&event), Invocation::Direct);
    }

    #[test]
    fn queue_records_are_a_batch() {
        let event = json!({
            "Records": [
                { "messageId": "1", "body": "{}", "eventSource": "aws:sqs" },
                { "messageId": "2", "body": "[]", "eventSource": "aws:sqs" },
            ]
        });

        match Invocation::classify(&event) {
            Invocation::Batch(records) => assert_eq!(records.len(), 2),
            Invocation::Direct => panic!("expected a batch"),
        }
    }

    #[test]
    fn record_fields_are_optional() {
        let record: Record = serde_json::from_value(json!({ "eventSource": "aws:sqs" })).unwrap();
        assert_eq!(record.event_source.as_deref(), Some(QUEUE_EVENT_SOURCE));
        assert!(record.body.is_none());
    }
}
