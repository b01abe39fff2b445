use super::bar_chart::BarChart;
use super::event_table::EventTable;
use crate::shared::drilldown::{LegendVisibility, LevelView, RenderModel};
use leptos::prelude::*;

pub const EMPTY_MESSAGE: &str = "Нет данных за выбранный период";
pub const ALL_HIDDEN_MESSAGE: &str = "Все серии скрыты в легенде";

/// One level: bar chart, events table or the empty state
#[component]
pub fn LevelPanel(
    view: LevelView,
    legend: LegendVisibility,
    /// Root bars ordered by downtime
    #[prop(optional)]
    sort_by_hours: bool,
    on_select: Callback<String>,
    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    match RenderModel::build(&view, &legend) {
        RenderModel::Chart(model) => {
            let model = if sort_by_hours && view.is_root() {
                model.sorted_by_hours()
            } else {
                model
            };
            view! { <BarChart model=model on_select=on_select disabled=disabled /> }.into_any()
        }
        RenderModel::Table(model) => view! { <EventTable model=model /> }.into_any(),
        RenderModel::Empty => view! {
            <div class="level-panel__empty">{EMPTY_MESSAGE}</div>
        }
        .into_any(),
        RenderModel::AllHidden => view! {
            <div class="level-panel__empty">{ALL_HIDDEN_MESSAGE}</div>
        }
        .into_any(),
    }
}
