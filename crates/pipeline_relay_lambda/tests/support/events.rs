#![allow(dead_code)]

use serde_json::{json, Value};

/// SNS delivery of a CodePipeline notification, as Lambda receives it.
pub fn sns_notification(message_id: &str) -> Value {
    json!({
        "Records": [
            {
                "EventSource": "aws:sns",
                "EventVersion": "1.0",
                "Sns": {
                    "Type": "Notification",
                    "MessageId": message_id,
                    "TopicArn": "arn:aws:sns:ap-southeast-1:123456789012:PipelineTriggerTopic-dev",
                    "Message": "{\"detail\":{\"pipeline\":\"Tomcat-CDK-dev-pipeline\",\"state\":\"SUCCEEDED\"}}",
                    "Timestamp": "2026-02-14T08:30:00.000Z"
                }
            }
        ]
    })
}

/// A spread of well-formed and malformed payloads.
pub fn assorted_payloads() -> Vec<Value> {
    vec![
        sns_notification("5d2a7f8e-0000-4000-8000-000000000001"),
        json!({
            "id": "eb-1",
            "source": "aws.codepipeline",
            "detail-type": "CodePipeline Pipeline Execution State Change",
            "time": "2026-02-14T08:30:00Z",
            "detail": {"pipeline": "some-other-pipeline", "state": "SUCCEEDED"}
        }),
        json!({"pipeline_name": "attacker-chosen-pipeline"}),
        json!({}),
        json!([]),
        json!("raw string"),
        json!(42),
        Value::Null,
    ]
}
