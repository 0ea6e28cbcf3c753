//! AWS-oriented adapters and handlers for the pipeline-trigger relay.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! execution-start capability, and logging setup). Event and response
//! contracts live in `pipeline_relay_core`.

pub mod adapters;
pub mod handlers;
pub mod telemetry;
