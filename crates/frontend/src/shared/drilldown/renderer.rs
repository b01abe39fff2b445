use super::legend::LegendVisibility;
use super::navigator::LevelView;
use crate::shared::list_utils::{sort_list, Sortable, SortState};
use contracts::dashboards::d410_breakdowns::{AggregateRow, EventRecord, LevelData};
use std::cmp::Ordering;

pub const SERIES_HOURS: &str = "Время простоя, ч";
pub const SERIES_COUNT: &str = "Количество заявок";

pub const COL_CODE: &str = "code";
pub const COL_DOWNTIME: &str = "downtime";
pub const COL_COMMENTS: &str = "comments";
pub const COL_CAUSE: &str = "cause";
pub const COL_START: &str = "start";

/// Цвет серии по порядковому номеру строки
pub fn legend_color(index: usize) -> String {
    format!("hsl({}, 70%, 55%)", (index * 37) % 360)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub hours: f64,
    pub count: u64,
    pub color: String,
    /// Width of the hours bar relative to the longest visible one, 0..=100
    pub hours_pct: f64,
    pub count_pct: f64,
}

/// Horizontal two-series chart of one aggregate level
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarChartModel {
    pub bars: Vec<Bar>,
}

impl BarChartModel {
    /// Blank labels never get a bar. Hidden labels are dropped when a legend
    /// is given; colours follow the row position so they survive toggling.
    pub fn build(rows: &[AggregateRow], legend: Option<&LegendVisibility>) -> Self {
        let visible: Vec<(usize, &AggregateRow)> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_blank())
            .filter(|(_, r)| legend.map(|l| !l.is_hidden(&r.dimension_label)).unwrap_or(true))
            .collect();

        let max_hours = visible
            .iter()
            .map(|(_, r)| r.total_downtime_hours)
            .fold(0.0_f64, f64::max);
        let max_count = visible.iter().map(|(_, r)| r.failure_count).max().unwrap_or(0);

        let bars = visible
            .into_iter()
            .map(|(i, r)| Bar {
                label: r.dimension_label.clone(),
                hours: (r.total_downtime_hours * 100.0).round() / 100.0,
                count: r.failure_count,
                color: legend_color(i),
                hours_pct: percent(r.total_downtime_hours, max_hours),
                count_pct: percent(r.failure_count as f64, max_count as f64),
            })
            .collect();
        Self { bars }
    }

    /// Longest downtime first
    pub fn sorted_by_hours(mut self) -> Self {
        self.bars.sort_by(|a, b| {
            b.hours
                .partial_cmp(&a.hours)
                .unwrap_or(Ordering::Equal)
        });
        self
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn percent(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max * 100.0
    } else {
        0.0
    }
}

/// "HH:MM:SS" (hours may exceed 24) to seconds
pub fn parse_duration(raw: &str) -> Option<u64> {
    let mut parts = raw.trim().split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = match parts.next() {
        Some(s) => s.trim().split('.').next()?.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || minutes > 59 || seconds > 59 {
        return None;
    }
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)
}

fn compare_text(a: &Option<String>, b: &Option<String>) -> Ordering {
    let a = a.as_deref().unwrap_or("").to_lowercase();
    let b = b.as_deref().unwrap_or("").to_lowercase();
    a.cmp(&b)
}

impl Sortable for EventRecord {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            COL_START => self.started_at().cmp(&other.started_at()),
            COL_DOWNTIME => {
                let a = self.downtime_duration.as_deref().and_then(parse_duration);
                let b = other.downtime_duration.as_deref().and_then(parse_duration);
                match (a, b) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    _ => compare_text(&self.downtime_duration, &other.downtime_duration),
                }
            }
            COL_CODE => compare_text(&self.code, &other.code),
            COL_COMMENTS => compare_text(&self.comments, &other.comments),
            COL_CAUSE => compare_text(&self.cause, &other.cause),
            _ => Ordering::Equal,
        }
    }
}

/// Terminal level: raw events, most recent first by default
#[derive(Debug, Clone, PartialEq)]
pub struct EventTableModel {
    pub rows: Vec<EventRecord>,
    pub sort: SortState,
}

impl EventTableModel {
    pub fn build(events: &[EventRecord]) -> Self {
        let mut model = Self {
            rows: events.to_vec(),
            sort: SortState::new(COL_START, false),
        };
        model.resort();
        model
    }

    /// Header click
    pub fn sort_by(&mut self, field: &str) {
        self.sort.toggle(field);
        self.resort();
    }

    fn resort(&mut self) {
        sort_list(&mut self.rows, &self.sort.field, self.sort.ascending);
        if self.sort.field == COL_START {
            // missing or unparsable dates go last in both directions
            let (dated, undated): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
                .into_iter()
                .partition(|e| e.started_at().is_some());
            self.rows = dated;
            self.rows.extend(undated);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a level view turns into on screen
#[derive(Debug, Clone, PartialEq)]
pub enum RenderModel {
    Chart(BarChartModel),
    Table(EventTableModel),
    /// Zero rows: empty-state message
    Empty,
    /// Root rows exist but the legend hides all of them
    AllHidden,
}

impl RenderModel {
    /// The legend only applies to the root level
    pub fn build(view: &LevelView, legend: &LegendVisibility) -> Self {
        match &view.data {
            LevelData::Aggregates(rows) if view.is_root() && legend.all_hidden() => {
                if rows.iter().any(|r| !r.is_blank()) {
                    RenderModel::AllHidden
                } else {
                    RenderModel::Empty
                }
            }
            LevelData::Aggregates(rows) => {
                let legend = if view.is_root() { Some(legend) } else { None };
                let chart = BarChartModel::build(rows, legend);
                if chart.is_empty() {
                    RenderModel::Empty
                } else {
                    RenderModel::Chart(chart)
                }
            }
            LevelData::Events(events) if events.is_empty() => RenderModel::Empty,
            LevelData::Events(events) => RenderModel::Table(EventTableModel::build(events)),
        }
    }
}
