use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel used by the filter selects for "no restriction"
pub const ALL: &str = "all";

/// Значение фильтра: либо "все", либо конкретное значение
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Value(String),
}

impl Selector {
    /// Coerces a raw select/input value. Blank input and "all" (any case) map to `All`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Selector::All
        } else {
            Selector::Value(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Value(v) => Some(v.as_str()),
        }
    }

    /// Value as shown in a `<select>`: the concrete value or "all"
    pub fn as_str(&self) -> &str {
        self.value().unwrap_or(ALL)
    }
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Selector::parse(&raw)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.as_str().to_string()
    }
}

/// Фильтры верхнего уровня дашборда
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub area: Selector,
    #[serde(default)]
    pub equipment: Selector,
    #[serde(default)]
    pub failure_type: Selector,
    #[serde(default)]
    pub week: Selector,
}

impl FilterState {
    /// Applies every field present in `patch`, leaving the others untouched
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(date_from) = patch.date_from {
            self.date_from = date_from;
        }
        if let Some(date_to) = patch.date_to {
            self.date_to = date_to;
        }
        if let Some(area) = patch.area {
            self.area = area;
        }
        if let Some(equipment) = patch.equipment {
            self.equipment = equipment;
        }
        if let Some(failure_type) = patch.failure_type {
            self.failure_type = failure_type;
        }
        if let Some(week) = patch.week {
            self.week = week;
        }
    }

    /// Number of fields that restrict the query (filter bar badge)
    pub fn active_count(&self) -> usize {
        let dates = [self.date_from.is_some(), self.date_to.is_some()];
        let selectors = [&self.area, &self.equipment, &self.failure_type, &self.week];
        dates.iter().filter(|set| **set).count()
            + selectors.iter().filter(|s| !s.is_all()).count()
    }
}

/// Partial update of [`FilterState`]. `None` means "leave as is".
///
/// Dates are doubly optional: `Some(None)` clears the bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub date_from: Option<Option<NaiveDate>>,
    pub date_to: Option<Option<NaiveDate>>,
    pub area: Option<Selector>,
    pub equipment: Option<Selector>,
    pub failure_type: Option<Selector>,
    pub week: Option<Selector>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower date bound from a `YYYY-MM-DD` input value
    pub fn date_from(mut self, raw: &str) -> anyhow::Result<Self> {
        self.date_from = Some(parse_date(raw)?);
        Ok(self)
    }

    /// Sets the upper date bound from a `YYYY-MM-DD` input value
    pub fn date_to(mut self, raw: &str) -> anyhow::Result<Self> {
        self.date_to = Some(parse_date(raw)?);
        Ok(self)
    }

    pub fn area(mut self, raw: &str) -> Self {
        self.area = Some(Selector::parse(raw));
        self
    }

    pub fn equipment(mut self, raw: &str) -> Self {
        self.equipment = Some(Selector::parse(raw));
        self
    }

    pub fn failure_type(mut self, raw: &str) -> Self {
        self.failure_type = Some(Selector::parse(raw));
        self
    }

    pub fn week(mut self, raw: &str) -> Self {
        self.week = Some(Selector::parse(raw));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parses a date input. Empty input clears the bound.
pub fn parse_date(raw: &str) -> anyhow::Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{}': {}", trimmed, e))?;
    Ok(Some(date))
}
