use pipeline_relay_core::config::{ConfigError, PipelineName, RelayConfig};
use pipeline_relay_core::contract::{TriggerRequest, TriggerResponse, TriggerResult};
use pipeline_relay_core::idempotency::token_for_request;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::adapters::execution::{
    ExecutionStarter, StartExecutionError, StartExecutionRequest, StartFailureKind,
};

const COMPONENT: &str = "relay_handler";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay is misconfigured: {0}")]
    Configuration(#[from] ConfigError),
    #[error("failed to start pipeline {pipeline_name}: {source}")]
    ExternalService {
        pipeline_name: PipelineName,
        #[source]
        source: StartExecutionError,
    },
}

impl RelayError {
    /// Whether re-running the same invocation can reasonably succeed without
    /// risking a duplicate start.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Configuration(_) => false,
            Self::ExternalService { source, .. } => matches!(
                source.kind,
                StartFailureKind::Throttled | StartFailureKind::Transport
            ),
        }
    }
}

/// Starts exactly one execution of the configured pipeline for `request`.
///
/// The request content never selects the target. No retry happens here; a
/// failed start is returned to the invoker with its cause attached.
pub fn handle_trigger(
    request: &TriggerRequest,
    config: &RelayConfig,
    starter: &dyn ExecutionStarter,
) -> Result<TriggerResult, RelayError> {
    info!(
        component = COMPONENT,
        event = "trigger_received",
        source = %request.source,
        delivery_id = request.delivery_id.as_deref().unwrap_or(""),
        has_message = request.message.is_some(),
        pipeline_name = %config.pipeline_name,
        "notification received"
    );

    let start_request = StartExecutionRequest {
        pipeline_name: config.pipeline_name.clone(),
        client_request_token: token_for_request(config, request),
    };

    match starter.start_execution(&start_request) {
        Ok(execution_id) => {
            info!(
                component = COMPONENT,
                event = "execution_started",
                pipeline_name = %config.pipeline_name,
                pipeline_execution_id = %execution_id,
                deduplicated = start_request.client_request_token.is_some(),
                "pipeline execution started"
            );
            Ok(TriggerResult::started(&config.pipeline_name, execution_id))
        }
        Err(start_error) => {
            error!(
                component = COMPONENT,
                event = "execution_start_failed",
                pipeline_name = %config.pipeline_name,
                failure_kind = %start_error.kind,
                outcome_known = start_error.outcome_known(),
                error = %start_error,
                "pipeline execution start failed"
            );
            Err(RelayError::ExternalService {
                pipeline_name: config.pipeline_name.clone(),
                source: start_error,
            })
        }
    }
}

pub fn handle_event(
    event: Value,
    config: &RelayConfig,
    starter: &dyn ExecutionStarter,
) -> Result<TriggerResponse, RelayError> {
    let request = TriggerRequest::from_event(event);
    handle_trigger(&request, config, starter).map(TriggerResponse::from)
}
