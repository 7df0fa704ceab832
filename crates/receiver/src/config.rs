use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_ADDR: &str = "0.0.0.0:5001";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `webhook_receiver=debug`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Reads `.env` (if present) and the process environment. Call
    /// [`Config::validate`] once command-line overrides have been applied.
    pub fn load() -> Self {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        Config {
            server: ServerConfig {
                addr: std::env::var("SERVER_ADDR")
                    .unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            },
            logging: LoggingConfig {
                filter: std::env::var("RUST_LOG")
                    .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            },
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        self.server.addr.parse().map_err(|e| {
            crate::Error::Config(format!(
                "SERVER_ADDR '{}' is not a valid socket address: {}",
                self.server.addr, e
            ))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: DEFAULT_ADDR.to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }
}
