use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PIPELINE_NAME_ENV: &str = "PIPELINE_NAME";
pub const DEDUPLICATE_DELIVERIES_ENV: &str = "RELAY_DEDUPLICATE_DELIVERIES";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("PIPELINE_NAME must be configured with a non-empty pipeline name")]
    MissingPipelineName,
    #[error("PIPELINE_NAME must not carry surrounding whitespace, got '{value}'")]
    PipelineNameWhitespace { value: String },
    #[error("{key} must be one of true/false/1/0/yes/no, got '{value}'")]
    InvalidFlag { key: &'static str, value: String },
}

/// Name of the downstream pipeline the relay starts. Never empty and passed
/// to the control plane exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PipelineName(String);

impl PipelineName {
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::MissingPipelineName);
        }
        if value.trim() != value {
            return Err(ConfigError::PipelineNameWhitespace { value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PipelineName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PipelineName> for String {
    fn from(value: PipelineName) -> Self {
        value.0
    }
}

impl fmt::Display for PipelineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relay settings resolved once at cold start and injected into the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub pipeline_name: PipelineName,
    /// When set, deliveries carrying an id are started with a client request
    /// token so redelivered notifications do not start a second execution.
    #[serde(default)]
    pub deduplicate_deliveries: bool,
}

impl RelayConfig {
    pub fn new(pipeline_name: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline_name: PipelineName::new(pipeline_name)?,
            deduplicate_deliveries: false,
        })
    }

    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate_deliveries = enabled;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let pipeline_name = lookup(PIPELINE_NAME_ENV).ok_or(ConfigError::MissingPipelineName)?;
        let deduplicate_deliveries = match lookup(DEDUPLICATE_DELIVERIES_ENV) {
            Some(value) => parse_flag(DEDUPLICATE_DELIVERIES_ENV, &value)?,
            None => false,
        };

        Ok(Self::new(pipeline_name)?.with_deduplication(deduplicate_deliveries))
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn reads_pipeline_name_and_defaults_deduplication_off() {
        let config =
            RelayConfig::from_lookup(lookup_from(&[(PIPELINE_NAME_ENV, "release-pipeline")]))
                .expect("config should load");

        assert_eq!(config.pipeline_name.as_str(), "release-pipeline");
        assert!(!config.deduplicate_deliveries);
    }

    #[test]
    fn missing_pipeline_name_is_a_configuration_error() {
        let error = RelayConfig::from_lookup(lookup_from(&[])).expect_err("should fail");
        assert_eq!(error, ConfigError::MissingPipelineName);
    }

    #[test]
    fn blank_pipeline_name_is_rejected() {
        let error = RelayConfig::from_lookup(lookup_from(&[(PIPELINE_NAME_ENV, "   ")]))
            .expect_err("should fail");
        assert_eq!(error, ConfigError::MissingPipelineName);
    }

    #[test]
    fn pipeline_name_is_kept_verbatim() {
        let name = PipelineName::new("Tomcat-dev-Pipeline").expect("name should pass");
        assert_eq!(name.to_string(), "Tomcat-dev-Pipeline");
    }

    #[test]
    fn pipeline_name_with_surrounding_whitespace_is_rejected() {
        let error =
            RelayConfig::from_lookup(lookup_from(&[(PIPELINE_NAME_ENV, "release-pipeline ")]))
                .expect_err("should fail");

        assert_eq!(
            error,
            ConfigError::PipelineNameWhitespace {
                value: "release-pipeline ".to_string(),
            }
        );
    }

    #[test]
    fn parses_deduplication_flag_case_insensitively() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            (PIPELINE_NAME_ENV, "release-pipeline"),
            (DEDUPLICATE_DELIVERIES_ENV, "YES"),
        ]))
        .expect("config should load");
        assert!(config.deduplicate_deliveries);
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let error = RelayConfig::from_lookup(lookup_from(&[
            (PIPELINE_NAME_ENV, "release-pipeline"),
            (DEDUPLICATE_DELIVERIES_ENV, "sometimes"),
        ]))
        .expect_err("should fail");

        assert_eq!(
            error,
            ConfigError::InvalidFlag {
                key: DEDUPLICATE_DELIVERIES_ENV,
                value: "sometimes".to_string(),
            }
        );
    }

    #[test]
    fn deserializing_empty_pipeline_name_fails() {
        let result = serde_json::from_str::<RelayConfig>(r#"{"pipeline_name": ""}"#);
        assert!(result.is_err());
    }
}
