use crate::shared::config::LookupSpec;
use crate::shared::drilldown::{DrillError, HttpLevelSource};
use contracts::dashboards::d410_breakdowns::lookup::{parse_options, with_all_option};
use std::collections::BTreeMap;

pub const ALL_LABEL: &str = "Все";

/// Query for a lookup, narrowed by its scoping filter when that one is set
pub fn lookup_query(
    wire_scope: Option<(String, String)>,
) -> Result<String, DrillError> {
    let params: BTreeMap<String, String> = wire_scope.into_iter().collect();
    serde_qs::to_string(&params).map_err(|e| DrillError::Malformed(e.to_string()))
}

/// Загрузить варианты для фильтра, "Все" первым
pub async fn fetch_options(
    source: &HttpLevelSource,
    lookup: &LookupSpec,
    wire_scope: Option<(String, String)>,
) -> Result<Vec<(String, String)>, DrillError> {
    let query = lookup_query(wire_scope)?;
    let body = source.get_json(&lookup.endpoint, &query).await?;
    let options = parse_options(&body, &lookup.field)
        .map_err(|e| DrillError::Malformed(format!("{}: {:#}", lookup.key, e)))?;
    Ok(with_all_option(&options, ALL_LABEL))
}
