//! Option lists for the filter selects (areas, equipment, failure types, weeks)

use anyhow::anyhow;
use serde_json::Value;

pub const FIELD_AREA: &str = "area";
pub const FIELD_MACHINE_NAME: &str = "machine_name";
pub const FIELD_FAILURE_TYPE: &str = "failure_type";
pub const FIELD_WEEK_NUMBER: &str = "week_number";

/// Extracts `field` from every row of a lookup response.
///
/// Blank and duplicate values are dropped, order is preserved. Numbers (week
/// numbers) are rendered as text.
pub fn parse_options(body: &Value, field: &str) -> anyhow::Result<Vec<String>> {
    let rows = body
        .as_array()
        .ok_or_else(|| anyhow!("lookup response is not an array"))?;

    let mut options: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        let value = match row.get(field) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        if !value.is_empty() && !options.contains(&value) {
            options.push(value);
        }
    }
    Ok(options)
}

/// `(value, label)` pairs for a select, "all" entry first
pub fn with_all_option(options: &[String], all_label: &str) -> Vec<(String, String)> {
    std::iter::once((super::filter::ALL.to_string(), all_label.to_string()))
        .chain(options.iter().map(|o| (o.clone(), o.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_options() {
        let body = json!([
            { "area": "Press shop" },
            { "area": "" },
            { "area": null },
            { "area": "Press shop" },
            { "area": "Assembly" }
        ]);
        assert_eq!(
            parse_options(&body, FIELD_AREA).unwrap(),
            vec!["Press shop".to_string(), "Assembly".to_string()]
        );
    }

    #[test]
    fn test_week_numbers() {
        let body = json!([{ "week_number": 12 }, { "week_number": 13 }]);
        assert_eq!(parse_options(&body, FIELD_WEEK_NUMBER).unwrap(), vec!["12", "13"]);
        assert!(parse_options(&json!({}), FIELD_WEEK_NUMBER).is_err());
    }

    #[test]
    fn test_with_all_option() {
        let opts = with_all_option(&["A".to_string()], "Все");
        assert_eq!(opts[0], ("all".to_string(), "Все".to_string()));
        assert_eq!(opts[1], ("A".to_string(), "A".to_string()));
    }
}
