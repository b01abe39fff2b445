use super::filter::FilterState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const KEY_DATE_FROM: &str = "dateFrom";
pub const KEY_DATE_TO: &str = "dateTo";
pub const KEY_AREA: &str = "area";
pub const KEY_EQUIPMENT: &str = "equipment";
pub const KEY_FAILURE_TYPE: &str = "failureType";
pub const KEY_WEEK: &str = "week";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_CAUSE: &str = "cause";
pub const KEY_MECHANISM: &str = "mechanism";

/// Upper bound on drill transitions below the root level
pub const MAX_DRILL_DEPTH: usize = 4;

/// Constraint set: top-level filters plus every drill selection made so far.
///
/// Keys are canonical dimension names (`equipment`, `cause`, ...). The map is
/// ordered so it can double as a cache key and serializes deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet(BTreeMap<String, String>);

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters that are not "all" become constraints; dates use `YYYY-MM-DD`
    pub fn from_filter(filter: &FilterState) -> Self {
        let mut set = Self::new();
        if let Some(date) = filter.date_from {
            set.insert(KEY_DATE_FROM, date.format("%Y-%m-%d").to_string());
        }
        if let Some(date) = filter.date_to {
            set.insert(KEY_DATE_TO, date.format("%Y-%m-%d").to_string());
        }
        let selectors = [
            (KEY_AREA, &filter.area),
            (KEY_EQUIPMENT, &filter.equipment),
            (KEY_FAILURE_TYPE, &filter.failure_type),
            (KEY_WEEK, &filter.week),
        ];
        for (key, selector) in selectors {
            if let Some(value) = selector.value() {
                set.insert(key, value);
            }
        }
        set
    }

    /// Filter constraints extended with the whole drill path.
    ///
    /// A drill selection overrides a filter on the same dimension. Blank labels
    /// are kept: a skipped level still narrows the query (`cause=`).
    pub fn for_path(filter: &FilterState, path: &DrillPath) -> Self {
        let mut set = Self::from_filter(filter);
        for step in path.steps() {
            set.insert(step.level.as_str(), step.label.as_str());
        }
        set
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy with keys renamed for the wire (e.g. `equipment` -> `machine`)
    pub fn renamed<F>(&self, wire_name: F) -> BTreeMap<String, String>
    where
        F: Fn(&str) -> String,
    {
        self.0
            .iter()
            .map(|(k, v)| (wire_name(k.as_str()), v.clone()))
            .collect()
    }
}

/// One selection on the drill path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillStep {
    /// Canonical key of the level the selection was made on
    pub level: String,
    /// Selected label; empty for a skipped level
    pub label: String,
    /// Appended by the empty-level skip, not by a click
    #[serde(default)]
    pub auto: bool,
}

impl DrillStep {
    pub fn selected(level: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            label: label.into(),
            auto: false,
        }
    }

    pub fn skipped(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            label: String::new(),
            auto: true,
        }
    }
}

/// Ordered drill selections leading to the active level
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillPath {
    steps: Vec<DrillStep>,
}

impl DrillPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: DrillStep) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.steps.len() < MAX_DRILL_DEPTH,
            "drill path is full ({} levels)",
            MAX_DRILL_DEPTH
        );
        self.steps.push(step);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<DrillStep> {
        self.steps.pop()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[DrillStep] {
        &self.steps
    }

    pub fn last(&self) -> Option<&DrillStep> {
        self.steps.last()
    }

    /// Labels chosen by the user, for titles ("Mixer-12 / Bearing failure")
    pub fn selected_labels(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| !s.auto)
            .map(|s| s.label.as_str())
            .collect()
    }
}
