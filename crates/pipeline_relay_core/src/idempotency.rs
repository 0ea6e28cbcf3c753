use sha2::{Digest, Sha256};

use crate::config::{PipelineName, RelayConfig};
use crate::contract::TriggerRequest;

/// Derives the client request token for one delivery of one pipeline.
///
/// The token is lowercase hex, so it satisfies CodePipeline's
/// `^[a-zA-Z0-9-]+$` pattern and stays under its 128 character limit.
pub fn client_request_token(pipeline_name: &PipelineName, delivery_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pipeline_name.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(delivery_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Token to attach to the start call, if any. `None` keeps at-least-once
/// behavior: every delivery starts a fresh execution.
pub fn token_for_request(config: &RelayConfig, request: &TriggerRequest) -> Option<String> {
    if !config.deduplicate_deliveries {
        return None;
    }
    request
        .delivery_id
        .as_deref()
        .map(|delivery_id| client_request_token(&config.pipeline_name, delivery_id))
}
