use super::error::DrillError;
use async_trait::async_trait;
use contracts::dashboards::d410_breakdowns::dto::{parse_aggregate_rows, parse_events};
use contracts::dashboards::d410_breakdowns::{ConstraintSet, LevelData, LevelSpec};
use gloo_net::http::Request;
use serde_json::Value;
use std::collections::BTreeMap;

pub const PARAM_LIMIT: &str = "limit";

/// Источник данных уровня детализации
#[async_trait(?Send)]
pub trait LevelSource {
    async fn fetch_level(
        &self,
        level: &LevelSpec,
        constraints: &ConstraintSet,
    ) -> Result<LevelData, DrillError>;
}

/// Reporting endpoints over HTTP.
///
/// `params` maps canonical constraint keys to wire parameter names; keys
/// without an entry are sent as is.
#[derive(Debug, Clone)]
pub struct HttpLevelSource {
    base_url: String,
    api_prefix: String,
    params: BTreeMap<String, String>,
}

impl HttpLevelSource {
    pub fn new(
        base_url: impl Into<String>,
        api_prefix: impl Into<String>,
        params: BTreeMap<String, String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_prefix: api_prefix.into(),
            params,
        }
    }

    pub fn url(&self, endpoint: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}{}", self.base_url, self.api_prefix, endpoint)
        } else {
            format!("{}{}{}?{}", self.base_url, self.api_prefix, endpoint, query)
        }
    }

    /// GET returning raw JSON; lookups use it directly
    pub async fn get_json(&self, endpoint: &str, query: &str) -> Result<Value, DrillError> {
        let url = self.url(endpoint, query);
        log::debug!("GET {}", url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| DrillError::Network(format!("Request failed: {}", e)))?;

        if !response.ok() {
            return Err(DrillError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                endpoint
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DrillError::Network(format!("Failed to read response: {}", e)))?;
        serde_json::from_str(&text).map_err(|e| DrillError::Malformed(e.to_string()))
    }

    pub fn query_for(
        &self,
        level: &LevelSpec,
        constraints: &ConstraintSet,
    ) -> Result<String, DrillError> {
        build_query(constraints, &self.params, level.limit)
    }
}

#[async_trait(?Send)]
impl LevelSource for HttpLevelSource {
    async fn fetch_level(
        &self,
        level: &LevelSpec,
        constraints: &ConstraintSet,
    ) -> Result<LevelData, DrillError> {
        let query = self.query_for(level, constraints)?;
        let body = self.get_json(&level.endpoint, &query).await?;
        decode_level(level, &body)
    }
}

/// Query string for a constraint set, keys renamed for the wire
pub fn build_query(
    constraints: &ConstraintSet,
    params: &BTreeMap<String, String>,
    limit: Option<u32>,
) -> Result<String, DrillError> {
    let mut wire = constraints.renamed(|key| {
        params
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    });
    if let Some(limit) = limit {
        wire.insert(PARAM_LIMIT.to_string(), limit.to_string());
    }
    serde_qs::to_string(&wire).map_err(|e| DrillError::Malformed(e.to_string()))
}

/// Interprets a level response according to the level kind
pub fn decode_level(level: &LevelSpec, body: &Value) -> Result<LevelData, DrillError> {
    let data = if level.terminal {
        parse_events(body).map(LevelData::Events)
    } else {
        parse_aggregate_rows(body, &level.label_field).map(LevelData::Aggregates)
    };
    data.map_err(|e| DrillError::Malformed(format!("{}: {:#}", level.key, e)))
}
