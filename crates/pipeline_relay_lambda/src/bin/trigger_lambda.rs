use aws_sdk_codepipeline::config::retry::RetryConfig;
use aws_sdk_codepipeline::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_codepipeline::operation::start_pipeline_execution::StartPipelineExecutionError;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use pipeline_relay_core::config::RelayConfig;
use pipeline_relay_core::contract::TriggerResponse;
use pipeline_relay_lambda::adapters::execution::{
    ExecutionStarter, StartExecutionError, StartExecutionRequest, StartFailureKind,
};
use pipeline_relay_lambda::handlers::relay::{handle_event, RelayError};
use pipeline_relay_lambda::telemetry::{init_tracing, LogFormat};
use serde_json::Value;

struct CodePipelineExecutionStarter {
    client: aws_sdk_codepipeline::Client,
}

impl ExecutionStarter for CodePipelineExecutionStarter {
    fn start_execution(
        &self,
        request: &StartExecutionRequest,
    ) -> Result<String, StartExecutionError> {
        let client = self.client.clone();
        let pipeline_name = request.pipeline_name.to_string();
        let client_request_token = request.client_request_token.clone();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .start_pipeline_execution()
                    .name(pipeline_name)
                    .set_client_request_token(client_request_token)
                    .send()
                    .await
            })
        })
        .map_err(classify_start_error)?;

        output
            .pipeline_execution_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                StartExecutionError::new(
                    StartFailureKind::OutcomeUnknown,
                    "StartPipelineExecution response carried no pipelineExecutionId",
                )
            })
    }
}

fn classify_start_error(error: SdkError<StartPipelineExecutionError>) -> StartExecutionError {
    let message = DisplayErrorContext(&error).to_string();
    let kind = match &error {
        SdkError::ServiceError(context) => classify_service_error(
            context.err(),
            context.raw().status().is_server_error(),
        ),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            StartFailureKind::OutcomeUnknown
        }
        SdkError::ConstructionFailure(_) | SdkError::DispatchFailure(_) => {
            StartFailureKind::Transport
        }
        // Timeouts and unreadable responses happen after the request left.
        _ => StartFailureKind::OutcomeUnknown,
    };
    StartExecutionError::new(kind, message).with_cause(error)
}

fn classify_service_error(
    error: &StartPipelineExecutionError,
    server_fault: bool,
) -> StartFailureKind {
    if error.is_pipeline_not_found_exception() {
        return StartFailureKind::NotFound;
    }
    match error.code() {
        Some(
            "ThrottlingException"
            | "TooManyRequestsException"
            | "ConcurrentPipelineExecutionsLimitExceededException",
        ) => StartFailureKind::Throttled,
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "ExpiredTokenException"
            | "InvalidSignatureException",
        ) => StartFailureKind::Unauthorized,
        // The service may have accepted the start before failing.
        Some("InternalFailure" | "InternalServerError" | "ServiceUnavailable") => {
            StartFailureKind::OutcomeUnknown
        }
        _ if server_fault => StartFailureKind::OutcomeUnknown,
        _ => StartFailureKind::Rejected,
    }
}

/// Builds the CodePipeline client with SDK retries off, so one
/// `start_execution` call sends exactly one `StartPipelineExecution` request.
fn codepipeline_client(
    config: aws_sdk_codepipeline::config::Builder,
) -> aws_sdk_codepipeline::Client {
    aws_sdk_codepipeline::Client::from_conf(config.retry_config(RetryConfig::disabled()).build())
}

fn handle_request(
    event: LambdaEvent<Value>,
    config: &RelayConfig,
    starter: &dyn ExecutionStarter,
) -> Result<TriggerResponse, Error> {
    handle_event(event.payload, config, starter).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing("info", LogFormat::from_env());

    let config = RelayConfig::from_env().map_err(|error| {
        tracing::error!(
            component = "trigger_lambda",
            event = "configuration_invalid",
            error = %error,
            "refusing to serve invocations"
        );
        Error::from(RelayError::from(error))
    })?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let starter = CodePipelineExecutionStarter {
        client: codepipeline_client(aws_sdk_codepipeline::config::Builder::from(&aws_config)),
    };

    let config = &config;
    let starter = &starter;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, config, starter)
    }))
    .await
}
