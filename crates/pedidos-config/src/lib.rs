//! Configuration module for the pedidos order tracker.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required configuration values are
//! properly set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the pedidos tracker.
///
/// This structure contains all configuration sections required for the
/// service to operate: service identity, the storage backend, and the
/// HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this service instance.
	pub service: ServiceConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this tracker instance.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server should be started.
	#[serde(default = "default_api_enabled")]
	pub enabled: bool,
	/// Host address to bind to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to listen on.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

/// Returns the default enabled flag for the API server.
fn default_api_enabled() -> bool {
	true
}

/// Returns the default bind host for the API server.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default bind port for the API server.
fn default_api_port() -> u16 {
	8080
}

impl Config {
	/// Loads configuration from a TOML file.
	pub fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		content.parse()
	}

	/// Loads configuration from a TOML file without blocking the runtime.
	pub async fn from_file_async(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates that the loaded configuration is internally consistent.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"service.id must not be empty".to_string(),
			));
		}

		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"storage.primary '{}' has no matching entry in storage.implementations",
				self.storage.primary
			)));
		}

		if let Some(api) = &self.api {
			if api.port == 0 {
				return Err(ConfigError::Validation(
					"api.port must be non-zero".to_string(),
				));
			}
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VALID: &str = r#"
		[service]
		id = "pedidos-test"

		[storage]
		primary = "memory"

		[storage.implementations.memory]

		[api]
		port = 3000
	"#;

	#[test]
	fn parses_valid_config() {
		let config: Config = VALID.parse().unwrap();
		assert_eq!(config.service.id, "pedidos-test");
		assert_eq!(config.storage.primary, "memory");

		let api = config.api.unwrap();
		assert!(api.enabled);
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 3000);
	}

	#[test]
	fn rejects_unknown_primary_backend() {
		let raw = r#"
			[service]
			id = "pedidos-test"

			[storage]
			primary = "redis"

			[storage.implementations.memory]
		"#;
		let err = raw.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn rejects_blank_service_id() {
		let raw = r#"
			[service]
			id = "  "

			[storage]
			primary = "memory"

			[storage.implementations.memory]
		"#;
		let err = raw.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[tokio::test]
	async fn loads_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, VALID).unwrap();

		let config = Config::from_file_async(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.service.id, "pedidos-test");
	}
}
