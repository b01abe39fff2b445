//! Dashboard configuration: endpoints, hierarchies and filter lookups.
//!
//! The configuration is embedded in the bundle as TOML and parsed once at
//! start-up. Every hierarchy is validated while loading so a broken entry is
//! reported before any dashboard is mounted.

use anyhow::{ensure, Context};
use contracts::dashboards::d410_breakdowns::{Hierarchy, LevelSpec};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    pub dashboards: Vec<DashboardConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

/// One drill-down dashboard
#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub id: String,
    pub title: String,
    /// Prefix of every endpoint of this dashboard, e.g. `/top-causes`
    pub api_prefix: String,
    /// Root bars ordered by downtime, longest first
    #[serde(default)]
    pub sort_root_by_downtime: bool,
    /// Date range inputs shown in the filter bar
    #[serde(default = "default_true")]
    pub date_range: bool,
    /// Canonical constraint key -> query parameter name
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Select filters backed by lookup endpoints
    #[serde(default)]
    pub lookups: Vec<LookupSpec>,
    pub levels: Vec<LevelSpec>,
}

/// Select filter whose options come from a lookup endpoint
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LookupSpec {
    /// Filter key (`area`, `equipment`, `failureType`, `week`)
    pub key: String,
    pub title: String,
    pub endpoint: String,
    /// Column of the lookup response holding the option value
    pub field: String,
    /// Another filter whose value narrows this list (equipment by area)
    #[serde(default)]
    pub scoped_by: Option<String>,
}

impl DashboardConfig {
    pub fn hierarchy(&self) -> anyhow::Result<Hierarchy> {
        Hierarchy::new(self.levels.clone())
            .with_context(|| format!("dashboard '{}'", self.id))
    }

    /// Query parameter name for a canonical key
    pub fn wire_param(&self, key: &str) -> String {
        self.params
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn lookup(&self, key: &str) -> Option<&LookupSpec> {
        self.lookups.iter().find(|l| l.key == key)
    }

    /// Lookups to reload when `key` changes
    pub fn dependents_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a LookupSpec> + 'a {
        self.lookups
            .iter()
            .filter(move |l| l.scoped_by.as_deref() == Some(key))
    }
}

impl AppConfig {
    pub fn dashboard(&self, id: &str) -> Option<&DashboardConfig> {
        self.dashboards.iter().find(|d| d.id == id)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.dashboards.is_empty(), "no dashboards configured");
        let mut ids = HashSet::new();
        for dashboard in &self.dashboards {
            ensure!(ids.insert(dashboard.id.as_str()), "duplicate dashboard id '{}'", dashboard.id);
            dashboard.hierarchy()?;
            for lookup in &dashboard.lookups {
                if let Some(scope) = &lookup.scoped_by {
                    ensure!(
                        dashboard.lookup(scope).is_some(),
                        "dashboard '{}': lookup '{}' is scoped by unknown filter '{}'",
                        dashboard.id,
                        lookup.key,
                        scope
                    );
                }
            }
        }
        Ok(())
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
port = 8080

[[dashboards]]
id = "top_causes"
title = "Топ причин простоев"
api_prefix = "/top-causes"

[dashboards.params]
equipment = "machine"

[[dashboards.lookups]]
key = "area"
title = "Участок"
endpoint = "/areas"
field = "area"

[[dashboards.lookups]]
key = "equipment"
title = "Оборудование"
endpoint = "/machines"
field = "machine_name"
scoped_by = "area"

[[dashboards.lookups]]
key = "failureType"
title = "Тип отказа"
endpoint = "/failure-types"
field = "failure_type"

[[dashboards.levels]]
key = "cause"
title = "Причины"
label_field = "cause"
endpoint = "/data"
limit = 30

[[dashboards.levels]]
key = "equipment"
title = "Оборудование"
label_field = "machine_name"
endpoint = "/drilldown/machines"

[[dashboards.levels]]
key = "mechanism"
title = "Механизмы"
label_field = "mechanism_node"
endpoint = "/drilldown/mechanisms"

[[dashboards.levels]]
key = "events"
title = "Заявки"
endpoint = "/drilldown/events"
terminal = true

[[dashboards]]
id = "top_equipment"
title = "Топ оборудования по простоям"
api_prefix = "/top-equipment"
sort_root_by_downtime = true

[dashboards.params]
equipment = "machine"

[[dashboards.lookups]]
key = "week"
title = "Неделя"
endpoint = "/weeks"
field = "week_number"

[[dashboards.lookups]]
key = "area"
title = "Участок"
endpoint = "/areas"
field = "area"

[[dashboards.lookups]]
key = "failureType"
title = "Тип отказа"
endpoint = "/failure-types"
field = "failure_type"

[[dashboards.levels]]
key = "equipment"
title = "Оборудование"
label_field = "machine_name"
endpoint = "/data"
limit = 30

[[dashboards.levels]]
key = "cause"
title = "Причины"
label_field = "cause"
endpoint = "/drilldown/causes"

[[dashboards.levels]]
key = "mechanism"
title = "Механизмы"
label_field = "mechanism_node"
endpoint = "/drilldown/mechanisms"

[[dashboards.levels]]
key = "events"
title = "Заявки"
endpoint = "/drilldown/events"
terminal = true

[[dashboards]]
id = "top_areas"
title = "Топ участков по простоям"
api_prefix = "/top-areas"

[[dashboards.lookups]]
key = "week"
title = "Неделя"
endpoint = "/weeks"
field = "week_number"

[[dashboards.lookups]]
key = "failureType"
title = "Тип отказа"
endpoint = "/failure-types"
field = "failure_type"

[[dashboards.levels]]
key = "area"
title = "Участки"
label_field = "area"
endpoint = "/data"
limit = 30

[[dashboards.levels]]
key = "category"
title = "Категории отказов"
label_field = "category"
endpoint = "/drilldown/categories"

[[dashboards.levels]]
key = "cause"
title = "Причины"
label_field = "cause"
endpoint = "/drilldown/causes"

[[dashboards.levels]]
key = "events"
title = "Заявки"
endpoint = "/drilldown/events"
terminal = true
"#;

/// Parses and validates the embedded configuration
pub fn load_config() -> anyhow::Result<AppConfig> {
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(raw: &str) -> anyhow::Result<AppConfig> {
    let config: AppConfig = toml::from_str(raw).context("invalid dashboard configuration")?;
    config.validate()?;
    log::info!("loaded {} dashboards", config.dashboards.len());
    Ok(config)
}
