//! Runs the relay handler against an event file without calling AWS.
//!
//! Usage: `PIPELINE_NAME=<name> invoke_local <event.json>`

use std::error::Error;
use std::fs;

use pipeline_relay_core::config::RelayConfig;
use pipeline_relay_lambda::adapters::execution::{
    ExecutionStarter, StartExecutionError, StartExecutionRequest,
};
use pipeline_relay_lambda::handlers::relay::handle_event;
use pipeline_relay_lambda::telemetry::{init_tracing, LogFormat};
use serde_json::Value;

struct DryRunStarter;

impl ExecutionStarter for DryRunStarter {
    fn start_execution(
        &self,
        request: &StartExecutionRequest,
    ) -> Result<String, StartExecutionError> {
        let execution_id = match &request.client_request_token {
            Some(token) => format!("dry-run-{}", &token[..token.len().min(12)]),
            None => "dry-run-execution".to_string(),
        };
        tracing::info!(
            component = "dry_run_starter",
            event = "execution_start_skipped",
            pipeline_name = %request.pipeline_name,
            client_request_token = request.client_request_token.as_deref().unwrap_or(""),
            pipeline_execution_id = %execution_id,
            "dry run, no pipeline execution started"
        );
        Ok(execution_id)
    }
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    init_tracing("info", LogFormat::Text);

    let event_path = std::env::args()
        .nth(1)
        .ok_or("usage: invoke_local <event.json>")?;
    let event: Value = serde_json::from_slice(&fs::read(&event_path)?)?;
    let config = RelayConfig::from_env()?;

    let response = handle_event(event, &config, &DryRunStarter)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
