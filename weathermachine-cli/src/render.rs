//! Human-friendly formatting of forecast sections.

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use weathermachine_core::entry_time;

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize forecast as JSON")
}

pub fn series(entries: &[Value], raw: bool) -> anyhow::Result<String> {
    if raw {
        return json(&entries);
    }
    if entries.is_empty() {
        return Ok("(no entries)".to_string());
    }

    Ok(entries.iter().map(entry).collect::<Vec<_>>().join("\n"))
}

/// One line: time, summary (or alert title) and temperature when present.
pub fn entry(value: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(ts) = entry_time(value) {
        parts.push(ts.format("%Y-%m-%d %H:%M UTC").to_string());
    }

    let label = value
        .get("summary")
        .or_else(|| value.get("title"))
        .and_then(Value::as_str);
    if let Some(label) = label {
        parts.push(label.to_string());
    }

    if let Some(temp) = value.get("temperature").and_then(Value::as_f64) {
        parts.push(format!("{temp:.1}°"));
    }

    if parts.is_empty() { value.to_string() } else { parts.join("  ") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_with_time_summary_and_temperature() {
        let line = entry(&json!({
            "time": 1_700_000_000,
            "summary": "Clear",
            "temperature": 41.2
        }));

        assert_eq!(line, "2023-11-14 22:13 UTC  Clear  41.2°");
    }

    #[test]
    fn alert_uses_title() {
        let line = entry(&json!({ "title": "Wind Advisory" }));
        assert_eq!(line, "Wind Advisory");
    }

    #[test]
    fn unknown_entry_falls_back_to_json() {
        let line = entry(&json!({ "foo": 1 }));
        assert_eq!(line, r#"{"foo":1}"#);
    }

    #[test]
    fn empty_series() {
        assert_eq!(series(&[], false).unwrap(), "(no entries)");
        assert_eq!(series(&[], true).unwrap(), "[]");
    }
}
