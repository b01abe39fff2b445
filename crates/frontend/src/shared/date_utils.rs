/// Date helpers for the filter inputs and the events table
use chrono::NaiveDate;
use contracts::dashboards::d410_breakdowns::dto::parse_timestamp;

/// Event start as DD.MM.YYYY HH:MM:SS.
/// Example: "2024-03-15T14:02:26.123Z" -> "15.03.2024 14:02:26"
///
/// Unrecognised input is shown unchanged.
pub fn format_event_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d.%m.%Y %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Value for `<input type="date">`, empty when unset
pub fn to_input_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
