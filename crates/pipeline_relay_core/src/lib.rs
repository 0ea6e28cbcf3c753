//! Shared pipeline-trigger relay primitives.
//!
//! This crate owns the inbound event and response contracts, relay
//! configuration, and delivery-based idempotency tokens. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
pub mod idempotency;
