pub mod config;
pub mod format;
pub mod server;
pub mod sinks;
pub mod sources;

use thiserror::Error;

pub use format::{format_alert, format_alert_at};
pub use sources::{AlertBatch, AlertRecord, Severity};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, Error>;
