use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{format::format_alert, sinks::AlertSink, Error, Result};

/// AlertManager webhook payload. Only `alerts` is read; the group-level keys
/// (`receiver`, `groupLabels`, `commonAnnotations`, ...) are ignored.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AlertBatch {
    #[serde(default)]
    pub alerts: Option<Vec<AlertRecord>>,
}

impl AlertBatch {
    /// Decode a request body. The body and every entry of `alerts` must be
    /// JSON objects; serde would otherwise fill struct fields from arrays by
    /// position.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(body) = &value else {
            return Err(Error::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        };

        if let Some(Value::Array(alerts)) = body.get("alerts") {
            if let Some((index, alert)) = alerts.iter().enumerate().find(|(_, a)| !a.is_object()) {
                return Err(Error::InvalidPayload(format!(
                    "alert #{} is not a JSON object (got {})",
                    index,
                    json_kind(alert)
                )));
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn alerts(&self) -> &[AlertRecord] {
        self.alerts.as_deref().unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A single alert as sent by AlertManager. Every field is optional and `null`
/// is treated as absent; accessors substitute defaults.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AlertRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub labels: Option<HashMap<String, String>>,
    #[serde(default)]
    pub annotations: Option<HashMap<String, String>>,
    #[serde(rename = "startsAt", default)]
    pub starts_at: Option<String>,
    #[serde(rename = "endsAt", default)]
    pub ends_at: Option<String>,
}

impl AlertRecord {
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.as_ref()?.get(key).map(String::as_str)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.as_ref()?.get(key).map(String::as_str)
    }

    pub fn alert_name(&self) -> Option<&str> {
        self.label("alertname")
    }

    /// Raw severity label; alerts without one are treated as `info`.
    pub fn severity_label(&self) -> &str {
        self.label("severity").unwrap_or("info")
    }

    pub fn severity(&self) -> Severity {
        Severity::parse(self.severity_label())
    }

    /// Recommended actions, only when the annotation is present and non-empty.
    pub fn action(&self) -> Option<&str> {
        self.annotation("action").filter(|a| !a.is_empty())
    }

    /// End timestamp; its presence means the alert has resolved.
    pub fn ends_at(&self) -> Option<&str> {
        self.ends_at.as_deref().filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Other(String),
}

impl Severity {
    /// Exact match; any other spelling (`CRITICAL`, `Warning`) falls back to
    /// [`Severity::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "critical" => Severity::Critical,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            _ => Severity::Other(raw.to_string()),
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Critical => "🚨",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
            Severity::Other(_) => "📢",
        }
    }
}

/// Formats every alert of a batch and hands the blocks to the sink, in
/// input order.
pub struct WebhookHandler {
    sink: Arc<dyn AlertSink>,
}

impl WebhookHandler {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self { sink }
    }

    /// Returns the number of alerts processed. The first sink failure aborts
    /// the rest of the batch.
    pub fn handle_batch(&self, batch: &AlertBatch) -> Result<usize> {
        let alerts = batch.alerts();

        if alerts.is_empty() {
            warn!("Received payload without alerts");
            return Ok(0);
        }

        info!("Received {} alert(s)", alerts.len());

        for alert in alerts {
            let formatted = format_alert(alert);
            self.sink.emit(&formatted)?;
            info!("Alert processed: {}", alert.alert_name().unwrap_or("unknown"));
        }

        Ok(alerts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MockAlertSink;
    use mockall::Sequence;
    use serde_json::json;

    fn batch(value: Value) -> AlertBatch {
        AlertBatch::from_value(value).unwrap()
    }

    #[test]
    fn ignores_unknown_top_level_keys() {
        let batch = batch(json!({
            "receiver": "webhook",
            "status": "firing",
            "groupLabels": {"alertname": "DiskFull"},
            "alerts": [{"labels": {"alertname": "DiskFull"}, "fingerprint": "abc"}]
        }));
        assert_eq!(batch.alerts().len(), 1);
        assert_eq!(batch.alerts()[0].alert_name(), Some("DiskFull"));
    }

    #[test]
    fn missing_or_null_alerts_is_an_empty_batch() {
        assert!(batch(json!({})).alerts().is_empty());
        assert!(batch(json!({"alerts": null})).alerts().is_empty());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let batch = batch(json!({
            "alerts": [{"status": null, "labels": null, "annotations": null, "endsAt": null}]
        }));
        let alert = &batch.alerts()[0];
        assert_eq!(alert.status(), "unknown");
        assert_eq!(alert.alert_name(), None);
        assert_eq!(alert.severity(), Severity::Info);
        assert_eq!(alert.action(), None);
        assert_eq!(alert.ends_at(), None);
    }

    #[test]
    fn rejects_structurally_invalid_payloads() {
        assert!(AlertBatch::from_value(json!([1, 2])).is_err());
        assert!(AlertBatch::from_value(json!({"alerts": "DiskFull"})).is_err());
        assert!(AlertBatch::from_value(json!({"alerts": [42]})).is_err());
        assert!(AlertBatch::from_value(json!({"alerts": [{"labels": {"severity": 3}}]})).is_err());
    }

    #[test]
    fn array_shaped_json_is_not_an_alert() {
        let err = AlertBatch::from_value(json!({"alerts": [{}, ["firing"]]})).unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
        assert_eq!(err.to_string(), "Invalid payload: alert #1 is not a JSON object (got an array)");

        let err = AlertBatch::from_value(json!([[{"labels": {"alertname": "X"}}]])).unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
        assert!(err.to_string().contains("got an array"));
    }

    #[test]
    fn empty_action_and_end_are_treated_as_absent() {
        let batch = batch(json!({
            "alerts": [{"annotations": {"action": ""}, "endsAt": ""}]
        }));
        assert_eq!(batch.alerts()[0].action(), None);
        assert_eq!(batch.alerts()[0].ends_at(), None);
    }

    #[test]
    fn severity_parsing() {
        assert_eq!(Severity::parse("critical"), Severity::Critical);
        assert_eq!(Severity::parse("warning"), Severity::Warning);
        assert_eq!(Severity::parse("info"), Severity::Info);
        assert_eq!(Severity::parse("CRITICAL"), Severity::Other("CRITICAL".to_string()));
        assert_eq!(Severity::parse("Warning").marker(), "📢");
        assert_eq!(Severity::parse("page"), Severity::Other("page".to_string()));
        assert_eq!(Severity::parse("page").marker(), "📢");
    }

    #[test]
    fn handles_alerts_in_input_order() {
        let mut sink = MockAlertSink::new();
        let mut seq = Sequence::new();
        for name in ["First", "Second", "Third"] {
            sink.expect_emit()
                .withf(move |block| block.contains(name))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let handler = WebhookHandler::new(Arc::new(sink));
        let batch = batch(json!({
            "alerts": [
                {"labels": {"alertname": "First"}},
                {"labels": {"alertname": "Second"}},
                {"labels": {"alertname": "Third"}}
            ]
        }));

        assert_eq!(handler.handle_batch(&batch).unwrap(), 3);
    }

    #[test]
    fn empty_batch_never_touches_the_sink() {
        let mut sink = MockAlertSink::new();
        sink.expect_emit().never();

        let handler = WebhookHandler::new(Arc::new(sink));
        assert_eq!(handler.handle_batch(&AlertBatch::default()).unwrap(), 0);
    }

    #[test]
    fn sink_failure_aborts_the_batch() {
        let mut sink = MockAlertSink::new();
        sink.expect_emit()
            .times(1)
            .returning(|_| Err(std::io::Error::other("stdout closed").into()));

        let handler = WebhookHandler::new(Arc::new(sink));
        let batch = batch(json!({"alerts": [{}, {}]}));

        let err = handler.handle_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("stdout closed"));
    }
}
