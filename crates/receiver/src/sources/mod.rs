pub mod webhook;

pub use webhook::{AlertBatch, AlertRecord, Severity, WebhookHandler};
