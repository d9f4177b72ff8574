use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Decoded forecast payload.
///
/// Sections stay untyped JSON because their shape depends on the provider;
/// only the projection methods look inside them. Keys not named here are
/// kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currently: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutely: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ForecastResponse {
    pub fn into_currently(self) -> Result<Value, Error> {
        self.currently.ok_or(Error::MissingField("currently"))
    }

    pub fn into_minutely(self) -> Result<Vec<Value>, Error> {
        series(self.minutely, "minutely", "minutely.data")
    }

    pub fn into_hourly(self) -> Result<Vec<Value>, Error> {
        series(self.hourly, "hourly", "hourly.data")
    }

    pub fn into_daily(self) -> Result<Vec<Value>, Error> {
        series(self.daily, "daily", "daily.data")
    }

    /// Alerts are frequently omitted, so anything other than an `alerts.data`
    /// array yields an empty list.
    pub fn into_alerts(self) -> Vec<Value> {
        self.alerts.and_then(take_data).unwrap_or_default()
    }
}

fn series(
    section: Option<Value>,
    field: &'static str,
    data_path: &'static str,
) -> Result<Vec<Value>, Error> {
    take_data(section.ok_or(Error::MissingField(field))?).ok_or(Error::MissingField(data_path))
}

/// Pulls the `data` array out of a section object.
fn take_data(section: Value) -> Option<Vec<Value>> {
    match section {
        Value::Object(mut map) => match map.remove("data")? {
            Value::Array(entries) => Some(entries),
            _ => None,
        },
        _ => None,
    }
}

/// Reads the unix `time` stamp of a forecast entry.
pub fn entry_time(entry: &Value) -> Option<DateTime<Utc>> {
    let ts = entry.get("time")?.as_i64()?;
    DateTime::from_timestamp(ts, 0)
}
