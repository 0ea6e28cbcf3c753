use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::PipelineName;

pub const SNS_EVENT_SOURCE: &str = "aws:sns";
pub const UNKNOWN_EVENT_SOURCE: &str = "unknown";
pub const STATUS_STARTED: u16 = 200;

/// Inbound notification that triggers the relay.
///
/// Built from any JSON payload. The relay never rejects an event because of
/// its shape and never lets the payload choose which pipeline gets started;
/// the extracted attributes only feed logging and delivery deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRequest {
    pub source: String,
    /// Delivery timestamp text from the envelope, not validated.
    pub timestamp: Option<String>,
    pub message: Option<String>,
    /// Delivery metadata identifying this notification (SNS `MessageId`,
    /// EventBridge `id`). Redeliveries of the same notification share it.
    pub delivery_id: Option<String>,
    pub payload: Value,
}

impl TriggerRequest {
    pub fn from_event(event: Value) -> Self {
        if let Some(record) = first_sns_record(&event) {
            let notification = record.get("Sns").unwrap_or(&Value::Null);
            return Self {
                source: SNS_EVENT_SOURCE.to_string(),
                timestamp: string_field(notification, "Timestamp"),
                message: string_field(notification, "Message"),
                delivery_id: string_field(notification, "MessageId"),
                payload: event,
            };
        }

        if let Some(source) = eventbridge_source(&event) {
            return Self {
                source,
                timestamp: string_field(&event, "time"),
                message: event.get("detail").map(Value::to_string),
                delivery_id: string_field(&event, "id"),
                payload: event,
            };
        }

        Self {
            source: UNKNOWN_EVENT_SOURCE.to_string(),
            timestamp: None,
            message: None,
            delivery_id: None,
            payload: event,
        }
    }

    /// The delivery timestamp, when it is valid RFC 3339.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let text = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }
}

fn first_sns_record(event: &Value) -> Option<&Value> {
    event
        .get("Records")
        .and_then(Value::as_array)?
        .iter()
        .find(|record| {
            record
                .get("EventSource")
                .and_then(Value::as_str)
                .map(|source| source == SNS_EVENT_SOURCE)
                .unwrap_or(false)
        })
}

fn eventbridge_source(event: &Value) -> Option<String> {
    let source = event.get("source").and_then(Value::as_str)?;
    if event.get("detail-type").is_none() && event.get("detail").is_none() {
        return None;
    }
    Some(source.to_string())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Outcome of one successful relay invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerResult {
    pub status_code: u16,
    pub message: String,
    pub pipeline_execution_id: String,
}

impl TriggerResult {
    pub fn started(pipeline_name: &PipelineName, execution_id: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_STARTED,
            message: format!("Successfully triggered {pipeline_name}"),
            pipeline_execution_id: execution_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerResponseBody {
    pub message: String,
    pub pipeline_execution_id: String,
}

/// Synchronous response returned to the invoker. `body` holds the JSON text of
/// a [`TriggerResponseBody`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl TriggerResponse {
    pub fn body_json(&self) -> Result<TriggerResponseBody, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl From<TriggerResult> for TriggerResponse {
    fn from(result: TriggerResult) -> Self {
        Self {
            status_code: result.status_code,
            body: json!({
                "message": result.message,
                "pipeline_execution_id": result.pipeline_execution_id,
            })
            .to_string(),
        }
    }
}
