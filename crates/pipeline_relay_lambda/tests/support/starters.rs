#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use pipeline_relay_lambda::adapters::execution::{
    ExecutionStarter, StartExecutionError, StartExecutionRequest, StartFailureKind,
};

/// Records every start call and hands out `exec-<n>` ids in call order.
pub struct RecordingStarter {
    calls: Mutex<Vec<StartExecutionRequest>>,
    next_id: AtomicUsize,
}

impl Default for RecordingStarter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingStarter {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn calls(&self) -> Vec<StartExecutionRequest> {
        self.calls.lock().expect("poisoned mutex").clone()
    }
}

impl ExecutionStarter for RecordingStarter {
    fn start_execution(
        &self,
        request: &StartExecutionRequest,
    ) -> Result<String, StartExecutionError> {
        self.calls
            .lock()
            .expect("poisoned mutex")
            .push(request.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("exec-{id}"))
    }
}

/// Always answers with the same execution id.
pub struct FixedIdStarter {
    pub execution_id: &'static str,
    calls: AtomicUsize,
}

impl FixedIdStarter {
    pub fn new(execution_id: &'static str) -> Self {
        Self {
            execution_id,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExecutionStarter for FixedIdStarter {
    fn start_execution(
        &self,
        _request: &StartExecutionRequest,
    ) -> Result<String, StartExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.execution_id.to_string())
    }
}

/// Fails every call with the given kind.
pub struct FailingStarter {
    pub kind: StartFailureKind,
    calls: AtomicUsize,
}

impl FailingStarter {
    pub fn new(kind: StartFailureKind) -> Self {
        Self {
            kind,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExecutionStarter for FailingStarter {
    fn start_execution(
        &self,
        request: &StartExecutionRequest,
    ) -> Result<String, StartExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StartExecutionError::new(
            self.kind,
            format!("control plane refused {}", request.pipeline_name),
        ))
    }
}
