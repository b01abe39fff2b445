use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const FIELD_TOTAL_DOWNTIME_HOURS: &str = "total_downtime_hours";
pub const FIELD_FAILURE_COUNT: &str = "failure_count";

/// Pre-aggregated row for one dimension value at one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Cause / equipment / mechanism name
    pub dimension_label: String,
    /// Суммарное время простоя, часы
    pub total_downtime_hours: f64,
    /// Количество заявок
    pub failure_count: u64,
}

impl AggregateRow {
    pub fn new(label: impl Into<String>, total_downtime_hours: f64, failure_count: u64) -> Self {
        Self {
            dimension_label: label.into(),
            total_downtime_hours,
            failure_count,
        }
    }

    /// Grouping dimension is not recorded (empty or whitespace)
    pub fn is_blank(&self) -> bool {
        self.dimension_label.trim().is_empty()
    }

    /// Reads one row of a reporting response.
    ///
    /// `label_field` names the grouping column (`cause`, `machine_name`, ...).
    /// A `null` label is treated as blank; a missing label or a missing or
    /// negative number is an error.
    pub fn from_json(row: &Value, label_field: &str) -> anyhow::Result<Self> {
        let obj = row
            .as_object()
            .ok_or_else(|| anyhow!("row is not an object: {}", row))?;

        let label = match obj.get(label_field) {
            None => bail!("missing field '{}'", label_field),
            Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        };

        let hours = number_field(obj.get(FIELD_TOTAL_DOWNTIME_HOURS), FIELD_TOTAL_DOWNTIME_HOURS)?;
        if hours < 0.0 {
            bail!("negative {} for '{}': {}", FIELD_TOTAL_DOWNTIME_HOURS, label, hours);
        }

        let count = number_field(obj.get(FIELD_FAILURE_COUNT), FIELD_FAILURE_COUNT)?;
        if count < 0.0 || count.fract() != 0.0 {
            bail!("invalid {} for '{}': {}", FIELD_FAILURE_COUNT, label, count);
        }

        Ok(Self::new(label, hours, count as u64))
    }
}

/// Numbers arrive either as JSON numbers or as numeric strings (SQL DECIMAL)
fn number_field(value: Option<&Value>, name: &str) -> anyhow::Result<f64> {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| anyhow!("field '{}' is out of range", name)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("field '{}' is not a number: '{}'", name, s)),
        Some(Value::Null) | None => bail!("missing field '{}'", name),
        Some(other) => bail!("field '{}' has unexpected type: {}", name, other),
    }
}

/// Parses an aggregate-level response body
pub fn parse_aggregate_rows(body: &Value, label_field: &str) -> anyhow::Result<Vec<AggregateRow>> {
    let rows = body
        .as_array()
        .ok_or_else(|| anyhow!("response is not an array"))?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            AggregateRow::from_json(row, label_field).with_context(|| format!("row {}", i))
        })
        .collect()
}

/// Parses a terminal-level (events) response body
pub fn parse_events(body: &Value) -> anyhow::Result<Vec<EventRecord>> {
    if !body.is_array() {
        bail!("response is not an array");
    }
    serde_json::from_value(body.clone()).context("malformed event list")
}

/// Событие простоя (терминальный уровень)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(
        default,
        rename = "machine_downtime",
        alias = "downtimeDuration",
        deserialize_with = "lenient_string"
    )]
    pub downtime_duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cause: Option<String>,
    #[serde(
        default,
        rename = "start_bd_t1",
        alias = "startTimestamp",
        deserialize_with = "lenient_string"
    )]
    pub start_timestamp: Option<String>,
}

impl EventRecord {
    /// Start of the breakdown, if the timestamp is in one of the known formats
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.start_timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Accepts the timestamp shapes the reporting endpoints emit
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%d.%m.%Y %H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Rows of one drill level
#[derive(Debug, Clone, PartialEq)]
pub enum LevelData {
    Aggregates(Vec<AggregateRow>),
    Events(Vec<EventRecord>),
}

impl LevelData {
    pub fn len(&self) -> usize {
        match self {
            LevelData::Aggregates(rows) => rows.len(),
            LevelData::Events(events) => events.len(),
        }
    }

    /// Zero rows: rendered as an empty state, not an error
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn aggregates(&self) -> Option<&[AggregateRow]> {
        match self {
            LevelData::Aggregates(rows) => Some(rows),
            LevelData::Events(_) => None,
        }
    }

    /// Every row lacks a grouping label. False for an empty level.
    pub fn all_blank(&self) -> bool {
        match self {
            LevelData::Aggregates(rows) => !rows.is_empty() && rows.iter().all(AggregateRow::is_blank),
            LevelData::Events(_) => false,
        }
    }

    /// Same data with blank-label rows removed
    pub fn without_blank(self) -> Self {
        match self {
            LevelData::Aggregates(rows) => {
                LevelData::Aggregates(rows.into_iter().filter(|r| !r.is_blank()).collect())
            }
            events => events,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.aggregates()
            .map(|rows| rows.iter().any(|r| r.dimension_label == label))
            .unwrap_or(false)
    }
}
