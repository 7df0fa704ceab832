use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{Local, SecondsFormat};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{ApiError, SERVICE_NAME};
use crate::sources::{AlertBatch, WebhookHandler};

type Payload = Result<Json<Value>, JsonRejection>;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

pub async fn receive_alerts(
    State(handler): State<Arc<WebhookHandler>>,
    payload: Payload,
) -> Result<Json<Value>, ApiError> {
    process_alerts(&handler, payload)
}

pub async fn receive_critical(
    State(handler): State<Arc<WebhookHandler>>,
    payload: Payload,
) -> Result<Json<Value>, ApiError> {
    error!("🚨 CRITICAL ALERT RECEIVED");
    process_alerts(&handler, payload)
}

pub async fn receive_warning(
    State(handler): State<Arc<WebhookHandler>>,
    payload: Payload,
) -> Result<Json<Value>, ApiError> {
    warn!("⚠️ WARNING ALERT RECEIVED");
    process_alerts(&handler, payload)
}

fn process_alerts(handler: &WebhookHandler, payload: Payload) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Unreadable request body: {}", rejection);
        ApiError::NoData
    })?;

    if body.is_null() {
        return Err(ApiError::NoData);
    }

    let batch = AlertBatch::from_value(body)?;
    let count = handler.handle_batch(&batch)?;

    if count == 0 {
        return Ok(Json(json!({ "status": "received", "count": 0 })));
    }

    Ok(Json(json!({
        "status": "received",
        "count": count,
        "timestamp": Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
    })))
}
