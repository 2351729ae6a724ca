//! # Seder
//!
//! HTTP ingest service for binary sensor telemetry uploads.
//!
//! Devices POST V0 upload bodies to `/v0/data`; each upload is decoded into
//! timestamped samples and appended to an hourly CSV file below the
//! configured data directory.

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, info};

use seder::config::Config;
use seder::server;
use seder::storage::SampleWriter;

/// Configuration file used when none is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the configuration file
const CONFIG_ENV_VAR: &str = "SEDER_CONFIG";

/// Pick the configuration file: first argument, then environment, then default
fn config_path(arg: Option<String>, env: Option<String>) -> String {
    arg.or(env).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Main entry point for Seder
///
/// Loads configuration, binds the listener and serves uploads until Ctrl+C.
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be read or is invalid
/// - The listener address cannot be bound
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO seder: Seder v0.1.0 starting...
/// INFO seder: Loaded configuration from config/default.toml
/// INFO seder: Listening on http://0.0.0.0:3000
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Seder v{} starting...", env!("CARGO_PKG_VERSION"));

    let path = config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV_VAR).ok());
    let config = Config::load(&path)?;
    info!("Loaded configuration from {}", path);
    debug!("{:?}", config);

    let writer = SampleWriter::new(&config.storage.data_dir);
    info!("Storing samples under {}", writer.root_dir().display());

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    info!("Press Ctrl+C to exit");

    server::serve(listener, writer).await?;

    info!("Seder stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_default() {
        assert_eq!(config_path(None, None), "config/default.toml");
    }

    #[test]
    fn test_config_path_from_env() {
        assert_eq!(config_path(None, Some("/etc/seder.toml".into())), "/etc/seder.toml");
    }

    #[test]
    fn test_config_path_argument_wins() {
        assert_eq!(
            config_path(Some("local.toml".into()), Some("/etc/seder.toml".into())),
            "local.toml"
        );
    }
}
