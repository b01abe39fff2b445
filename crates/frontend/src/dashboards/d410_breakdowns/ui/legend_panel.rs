use crate::shared::drilldown::renderer::legend_color;
use crate::shared::drilldown::LegendVisibility;
use crate::shared::number_format::format_legend_value;
use contracts::dashboards::d410_breakdowns::AggregateRow;
use leptos::prelude::*;
use thaw::*;

/// Легенда корневого уровня: скрытие серий без повторного запроса
#[component]
pub fn LegendPanel(
    #[prop(into)] rows: Signal<Vec<AggregateRow>>,
    #[prop(into)] legend: Signal<LegendVisibility>,
    on_toggle: Callback<String>,
    on_toggle_all: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="legend-panel">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <span class="legend-panel__counter">
                    {move || legend.with(|l| format!("Показано {} из {}", l.visible_count(), l.labels().len()))}
                </span>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| on_toggle_all.run(())
                >
                    {move || legend.with(|l| l.toggle_all_caption())}
                </Button>
            </Flex>
            <ul class="legend-panel__list">
                {move || {
                    rows.get()
                        .into_iter()
                        .enumerate()
                        .filter(|(_, row)| !row.is_blank())
                        .map(|(i, row)| {
                            let label = row.dimension_label.clone();
                            let hidden_label = label.clone();
                            let is_hidden = move || legend.with(|l| l.is_hidden(&hidden_label));
                            view! {
                                <li
                                    class=move || {
                                        if is_hidden() {
                                            "legend-panel__item legend-panel__item--hidden"
                                        } else {
                                            "legend-panel__item"
                                        }
                                    }
                                    on:click={
                                        let label = label.clone();
                                        move |_| on_toggle.run(label.clone())
                                    }
                                >
                                    <span
                                        class="legend-panel__swatch"
                                        style=format!("background: {};", legend_color(i))
                                    ></span>
                                    <span class="legend-panel__label">{label.clone()}</span>
                                    <span class="legend-panel__value">
                                        {format_legend_value(row.total_downtime_hours, row.failure_count)}
                                    </span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}
