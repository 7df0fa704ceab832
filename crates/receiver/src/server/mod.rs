mod error;
mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{sinks::AlertSink, sources::WebhookHandler, Result};

pub use error::ApiError;

pub const SERVICE_NAME: &str = "webhook-receiver";

const ENDPOINTS: [(&str, &str); 4] = [
    ("POST /alerts", "all alerts"),
    ("POST /alerts/critical", "critical alerts"),
    ("POST /alerts/warning", "warning alerts"),
    ("GET /health", "health check"),
];

pub struct Server {
    handler: Arc<WebhookHandler>,
}

impl Server {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self {
            handler: Arc::new(WebhookHandler::new(sink)),
        }
    }

    pub fn build_router(self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/alerts", post(routes::receive_alerts))
            .route("/alerts/critical", post(routes::receive_critical))
            .route("/alerts/warning", post(routes::receive_warning))
            .layer(TraceLayer::new_for_http())
            .with_state(self.handler)
    }

    /// Serve until SIGINT/SIGTERM, letting in-flight requests finish.
    pub async fn start(self, addr: SocketAddr) -> Result<()> {
        let app = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Startup banner listing the listening address and the endpoints.
pub fn banner(addr: &str) -> String {
    let rule = "=".repeat(80);
    let mut lines = vec![
        rule.clone(),
        "🚀 Alertmanager webhook receiver".to_string(),
        rule.clone(),
        format!("📡 Listening on {}", addr),
        "🔗 Available endpoints:".to_string(),
    ];
    lines.extend(
        ENDPOINTS
            .iter()
            .map(|(route, what)| format!("   - {} ({})", route, what)),
    );
    lines.push(rule);
    lines.join("\n")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
