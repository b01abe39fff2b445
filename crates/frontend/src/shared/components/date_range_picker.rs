use chrono::{Datelike, Duration, NaiveDate, Utc};
use leptos::prelude::*;
use thaw::*;

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next - Duration::days(1)))
}

/// Month preceding the one containing `date`
pub fn previous_month(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    if date.month() == 1 {
        month_bounds(date.year() - 1, 12)
    } else {
        month_bounds(date.year(), date.month() - 1)
    }
}

fn as_input_pair((from, to): (NaiveDate, NaiveDate)) -> (String, String) {
    (
        from.format("%Y-%m-%d").to_string(),
        to.format("%Y-%m-%d").to_string(),
    )
}

/// Период "с/по" и кнопки быстрого выбора месяца.
///
/// Empty inputs mean an open bound.
#[component]
pub fn DateRangePicker(
    /// Значение даты "от" в формате yyyy-mm-dd
    #[prop(into)]
    date_from: Signal<String>,

    /// Значение даты "до" в формате yyyy-mm-dd
    #[prop(into)]
    date_to: Signal<String>,

    /// Callback при изменении диапазона дат (from, to)
    on_change: Callback<(String, String)>,

    #[prop(optional)]
    label: Option<String>,
) -> impl IntoView {
    let on_current_month = move |_| {
        let now = Utc::now().date_naive();
        if let Some(bounds) = month_bounds(now.year(), now.month()) {
            on_change.run(as_input_pair(bounds));
        }
    };

    // шаг назад от текущего "с", либо от сегодняшнего дня
    let on_previous_month = move |_| {
        let anchor = NaiveDate::parse_from_str(&date_from.get_untracked(), "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive());
        if let Some(bounds) = previous_month(anchor) {
            on_change.run(as_input_pair(bounds));
        }
    };

    let on_clear = move |_| {
        on_change.run((String::new(), String::new()));
    };

    view! {
        <Flex vertical=true gap=FlexGap::Small>
            {label.map(|l| view! { <Label>{l}</Label> })}

            <Flex class="date-range-picker" align=FlexAlign::Center gap=FlexGap::Small>
                <input
                    type="date"
                    class="date-range-picker__input"
                    prop:value=date_from
                    on:input=move |ev| {
                        on_change.run((event_target_value(&ev), date_to.get_untracked()));
                    }
                />
                <div>"—"</div>
                <input
                    type="date"
                    class="date-range-picker__input"
                    prop:value=date_to
                    on:input=move |ev| {
                        on_change.run((date_from.get_untracked(), event_target_value(&ev)));
                    }
                />
                <ButtonGroup>
                    <Button size=ButtonSize::Small on_click=on_current_month>"Тек. месяц"</Button>
                    <Button size=ButtonSize::Small on_click=on_previous_month>"−1 мес."</Button>
                    <Button size=ButtonSize::Small on_click=on_clear>"×"</Button>
                </ButtonGroup>
            </Flex>
        </Flex>
    }
}
