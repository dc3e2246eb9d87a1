//! Main entry point for the pedidos order tracker service.
//!
//! This binary wires the configured storage backend to the order engine
//! and exposes the order lifecycle, filtering, and statistics operations
//! over an HTTP API.

use clap::Parser;
use pedidos_config::Config;
use pedidos_core::OrderEngine;
use pedidos_storage::{get_all_implementations, StorageFactory, StorageService};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod server;

/// Command-line arguments for the tracker service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the tracker service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order engine on the configured storage backend
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started pedidos tracker");

	// Load configuration
	let config = Config::from_file_async(
		args.config
			.to_str()
			.ok_or("Configuration path is not valid UTF-8")?,
	)
	.await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	// Build the engine on the configured storage backend
	let storage = build_storage(&config)?;
	let engine = Arc::new(OrderEngine::new(storage).await?);

	let api_enabled = config.api.as_ref().is_none_or(|api| api.enabled);

	if api_enabled {
		let api_config = config.api.clone().unwrap_or(pedidos_config::ApiConfig {
			enabled: true,
			host: "127.0.0.1".to_string(),
			port: 8080,
		});
		server::start_server(api_config, engine).await?;
	} else {
		tracing::warn!("API server disabled by configuration; nothing to serve");
	}

	tracing::info!("Stopped pedidos tracker");
	Ok(())
}

/// Resolves the configured storage backend through the factory registry.
fn build_storage(config: &Config) -> Result<Arc<StorageService>, Box<dyn std::error::Error>> {
	let factories: HashMap<&'static str, StorageFactory> =
		get_all_implementations().into_iter().collect();

	let primary = config.storage.primary.as_str();
	let factory = factories
		.get(primary)
		.ok_or_else(|| format!("Unknown storage backend '{}'", primary))?;

	let backend_config = config
		.storage
		.implementations
		.get(primary)
		.ok_or_else(|| format!("Missing configuration for storage backend '{}'", primary))?;

	let backend = factory(backend_config)?;
	tracing::info!("Using '{}' storage backend", primary);

	Ok(Arc::new(StorageService::new(backend)))
}
