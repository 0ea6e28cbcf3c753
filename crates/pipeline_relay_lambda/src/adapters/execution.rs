use std::error::Error as StdError;
use std::fmt;

use pipeline_relay_core::config::PipelineName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartExecutionRequest {
    pub pipeline_name: PipelineName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_request_token: Option<String>,
}

/// Capability that starts one execution of a named pipeline and returns the
/// execution id assigned by the control plane.
pub trait ExecutionStarter: Send + Sync {
    fn start_execution(&self, request: &StartExecutionRequest)
        -> Result<String, StartExecutionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartFailureKind {
    NotFound,
    Throttled,
    Unauthorized,
    Rejected,
    /// The request never reached the control plane.
    Transport,
    /// The request may have been accepted; whether an execution started is unknown.
    OutcomeUnknown,
}

impl StartFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Throttled => "throttled",
            Self::Unauthorized => "unauthorized",
            Self::Rejected => "rejected",
            Self::Transport => "transport",
            Self::OutcomeUnknown => "outcome_unknown",
        }
    }
}

impl fmt::Display for StartFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct StartExecutionError {
    pub kind: StartFailureKind,
    pub message: String,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StartExecutionError {
    pub fn new(kind: StartFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn outcome_known(&self) -> bool {
        self.kind != StartFailureKind::OutcomeUnknown
    }
}
