use crate::shared::components::date_range_picker::DateRangePicker;
use crate::shared::components::select::Select;
use crate::shared::config::LookupSpec;
use crate::shared::date_utils::to_input_value;
use contracts::dashboards::d410_breakdowns::constraints::{
    KEY_AREA, KEY_DATE_FROM, KEY_DATE_TO, KEY_EQUIPMENT, KEY_FAILURE_TYPE, KEY_WEEK,
};
use contracts::dashboards::d410_breakdowns::FilterState;
use leptos::prelude::*;
use std::collections::HashMap;
use thaw::*;

/// Select value of a filter key ("all" when unrestricted)
pub fn selector_value(filter: &FilterState, key: &str) -> String {
    let selector = match key {
        KEY_AREA => &filter.area,
        KEY_EQUIPMENT => &filter.equipment,
        KEY_FAILURE_TYPE => &filter.failure_type,
        KEY_WEEK => &filter.week,
        _ => return String::new(),
    };
    selector.as_str().to_string()
}

#[component]
pub fn FilterBar(
    lookups: Vec<LookupSpec>,
    #[prop(optional)] date_range: bool,
    /// Draft filter shown in the controls
    #[prop(into)]
    draft: Signal<FilterState>,
    /// Lookup key -> (value, label) options
    #[prop(into)]
    options: Signal<HashMap<String, Vec<(String, String)>>>,
    /// (filter key, raw input value)
    on_input: Callback<(String, String)>,
    on_apply: Callback<()>,
    #[prop(optional, into)]
    loading: Signal<bool>,
    /// Draft differs from the applied filters
    #[prop(optional, into)]
    dirty: Signal<bool>,
) -> impl IntoView {
    let on_dates = Callback::new(move |(from, to): (String, String)| {
        on_input.run((KEY_DATE_FROM.to_string(), from));
        on_input.run((KEY_DATE_TO.to_string(), to));
    });

    view! {
        <div class="filter-bar">
            <Flex align=FlexAlign::End gap=FlexGap::Medium>
                {date_range.then(|| view! {
                    <DateRangePicker
                        label="Период".to_string()
                        date_from=Signal::derive(move || to_input_value(draft.with(|f| f.date_from)))
                        date_to=Signal::derive(move || to_input_value(draft.with(|f| f.date_to)))
                        on_change=on_dates
                    />
                })}

                {lookups
                    .into_iter()
                    .map(|lookup| {
                        let key = lookup.key.clone();
                        let value_key = key.clone();
                        let options_key = key.clone();
                        view! {
                            <Select
                                label=lookup.title.clone()
                                value=Signal::derive(move || draft.with(|f| selector_value(f, &value_key)))
                                options=Signal::derive(move || {
                                    options.with(|o| o.get(&options_key).cloned().unwrap_or_default())
                                })
                                on_change=Callback::new(move |raw: String| on_input.run((key.clone(), raw)))
                            />
                        }
                    })
                    .collect_view()}

                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=loading
                    on_click=move |_| on_apply.run(())
                >
                    "Применить"
                </Button>
                {move || {
                    let active = draft.with(FilterState::active_count);
                    (active > 0).then(|| view! {
                        <span class="badge badge--primary">{format!("Фильтров: {}", active)}</span>
                    })
                }}
                {move || dirty.get().then(|| view! {
                    <span class="badge badge--warning">"Не применено"</span>
                })}
                {move || loading.get().then(|| view! { <Spinner size=SpinnerSize::Small /> })}
            </Flex>
        </div>
    }
}
