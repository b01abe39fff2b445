use crate::shared::drilldown::renderer::{SERIES_COUNT, SERIES_HOURS};
use crate::shared::drilldown::BarChartModel;
use crate::shared::number_format::{format_count, format_hours};
use leptos::prelude::*;

/// Горизонтальная диаграмма: время простоя и количество заявок.
///
/// Clicking a row reports its label; the chart itself keeps no state.
#[component]
pub fn BarChart(
    model: BarChartModel,
    on_select: Callback<String>,
    /// Rows are not clickable (terminal navigation, pending fetch)
    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="bar-chart">
            <div class="bar-chart__series">
                <span class="bar-chart__series-item bar-chart__series-item--hours">{SERIES_HOURS}</span>
                <span class="bar-chart__series-item bar-chart__series-item--count">{SERIES_COUNT}</span>
            </div>
            {model
                .bars
                .into_iter()
                .map(|bar| {
                    let label = bar.label.clone();
                    view! {
                        <div
                            class=move || {
                                if disabled.get() {
                                    "bar-chart__row bar-chart__row--disabled"
                                } else {
                                    "bar-chart__row"
                                }
                            }
                            title=bar.label.clone()
                            on:click=move |_| {
                                if !disabled.get_untracked() {
                                    on_select.run(label.clone());
                                }
                            }
                        >
                            <div class="bar-chart__label">{bar.label.clone()}</div>
                            <div class="bar-chart__bars">
                                <div class="bar-chart__track">
                                    <div
                                        class="bar-chart__bar"
                                        style=format!("width: {:.1}%; background: {};", bar.hours_pct, bar.color)
                                    ></div>
                                    <span class="bar-chart__value">{format_hours(bar.hours)}</span>
                                </div>
                                <div class="bar-chart__track">
                                    <div
                                        class="bar-chart__bar bar-chart__bar--count"
                                        style=format!("width: {:.1}%;", bar.count_pct)
                                    ></div>
                                    <span class="bar-chart__value">{format_count(bar.count)}</span>
                                </div>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
