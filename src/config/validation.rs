//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected rather than stopping at the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{ClientConfig, ObservabilityConfig, ServerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Configurations that can check themselves.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        check_socket_addr(&mut errors, "listener.bind_address", &self.listener.bind_address);
        check_http_url(&mut errors, "upstream.url", &self.upstream.url);
        if !self.storage.database_url.starts_with("sqlite:") {
            errors.push(ValidationError::new(
                "storage.database_url",
                format!("'{}' is not a sqlite: URL", self.storage.database_url),
            ));
        }
        check_observability(&mut errors, &self.observability);

        finish(errors)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        check_http_url(&mut errors, "server_url", &self.server_url);
        if self.artifact_path.trim().is_empty() {
            errors.push(ValidationError::new("artifact_path", "must not be empty"));
        }
        check_observability(&mut errors, &self.observability);

        finish(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = value.parse::<SocketAddr>() {
        errors.push(ValidationError::new(field, format!("'{}': {}", value, e)));
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}

fn check_observability(errors: &mut Vec<ValidationError>, config: &ObservabilityConfig) {
    if !matches!(
        config.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.log_level),
        ));
    }
    if config.metrics_enabled {
        check_socket_addr(errors, "observability.metrics_address", &config.metrics_address);
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "localhost".into();
        config.upstream.url = "ftp://example.com/rates".into();
        config.storage.database_url = "postgres://db".into();

        let errors = config.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "upstream.url", "storage.database_url"]
        );
    }

    #[test]
    fn test_client_rejects_empty_artifact_path() {
        let config = ClientConfig {
            artifact_path: "  ".into(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "artifact_path");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ClientConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(config.validate().is_ok());

        config.observability.metrics_enabled = true;
        assert!(config.validate().is_err());
    }
}
