use super::constraints::MAX_DRILL_DEPTH;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One level of a drill-down hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Canonical constraint key selected on this level (`cause`, `equipment`, ...)
    pub key: String,
    /// Заголовок уровня в UI
    pub title: String,
    /// Response column holding the grouping label; unused on the terminal level
    #[serde(default)]
    pub label_field: String,
    /// Path of the reporting endpoint, relative to the dashboard api prefix
    pub endpoint: String,
    /// Raw event list instead of aggregates
    #[serde(default)]
    pub terminal: bool,
    /// Row cap sent as `limit` (root aggregates only, in practice)
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Ordered levels: root aggregate first, terminal event list last
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    levels: Vec<LevelSpec>,
}

impl Hierarchy {
    pub fn new(levels: Vec<LevelSpec>) -> anyhow::Result<Self> {
        ensure!(levels.len() >= 2, "hierarchy needs a root and at least one drill level");
        ensure!(
            levels.len() - 1 <= MAX_DRILL_DEPTH,
            "hierarchy has {} drill levels, at most {} are supported",
            levels.len() - 1,
            MAX_DRILL_DEPTH
        );

        let mut keys = HashSet::new();
        let last = levels.len() - 1;
        for (i, level) in levels.iter().enumerate() {
            ensure!(!level.key.trim().is_empty(), "level {} has an empty key", i);
            ensure!(keys.insert(level.key.as_str()), "duplicate level key '{}'", level.key);
            if i == last {
                ensure!(level.terminal, "last level '{}' must be terminal", level.key);
            } else if level.terminal {
                bail!("only the last level may be terminal, '{}' is at {}", level.key, i);
            } else {
                ensure!(
                    !level.label_field.trim().is_empty(),
                    "aggregate level '{}' has no label_field",
                    level.key
                );
            }
        }

        Ok(Self { levels })
    }

    pub fn level(&self, index: usize) -> Option<&LevelSpec> {
        self.levels.get(index)
    }

    /// Event list level; `new` guarantees at least two levels
    pub fn terminal(&self) -> &LevelSpec {
        &self.levels[self.levels.len() - 1]
    }

    /// Number of drill transitions below the root
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        self.levels.get(index).map(|l| l.terminal).unwrap_or(false)
    }
}
