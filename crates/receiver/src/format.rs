//! Human-readable rendering of a single alert.
//!
//! The block is bordered by a rule of `=` characters and always has the same
//! layout; fields missing from the alert are rendered as `N/A`. The optional
//! "Recommended Actions" section and the end timestamp only appear when the
//! alert carries them.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use crate::sources::AlertRecord;

/// Placeholder rendered for absent alert fields.
pub const NOT_AVAILABLE: &str = "N/A";

const RULE_WIDTH: usize = 80;
const HEADER_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Render `alert` stamped with the current local time.
pub fn format_alert(alert: &AlertRecord) -> String {
    format_alert_at(alert, Local::now())
}

/// Render `alert` stamped with `now` instead of reading the clock.
pub fn format_alert_at<Tz>(alert: &AlertRecord, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rule = "=".repeat(RULE_WIDTH);
    let severity = alert.severity();
    let or_na = |value: Option<&str>| value.unwrap_or(NOT_AVAILABLE).to_string();

    let mut output = vec![
        format!("\n{}", rule),
        format!(
            "{} ALERT {} - {}",
            severity.marker(),
            alert.status().to_uppercase(),
            now.format(HEADER_TIME_FORMAT)
        ),
        rule.clone(),
        format!("\n📊 Name: {}", or_na(alert.alert_name())),
        format!("⚠️  Severity: {}", alert.severity_label().to_uppercase()),
        format!("🔧 Service: {}", or_na(alert.label("service"))),
        format!("🏷️  Category: {}", or_na(alert.label("category"))),
        format!("📝 Description: {}", or_na(alert.annotation("description"))),
    ];

    if let Some(action) = alert.action() {
        output.push("\n💡 Recommended Actions:".to_string());
        output.push(action.to_string());
    }

    output.push(format!("\n🔗 Runbook: {}", or_na(alert.annotation("runbook_url"))));
    output.push(format!("⏰ Started: {}", or_na(alert.starts_at.as_deref())));

    if let Some(ends_at) = alert.ends_at() {
        output.push(format!("✅ Ended: {}", ends_at));
    }

    output.push(format!("{}\n", rule));

    output.join("\n")
}
