use crate::shared::date_utils::format_event_timestamp;
use crate::shared::drilldown::renderer::{
    COL_CAUSE, COL_CODE, COL_COMMENTS, COL_DOWNTIME, COL_START,
};
use crate::shared::drilldown::EventTableModel;
use leptos::prelude::*;
use thaw::*;

const COLUMNS: [(&str, &str); 5] = [
    (COL_CODE, "Код"),
    (COL_DOWNTIME, "Время простоя"),
    (COL_COMMENTS, "Комментарий"),
    (COL_CAUSE, "Причина"),
    (COL_START, "Дата"),
];

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "—".to_string())
}

/// Заявки терминального уровня, сортировка по клику на заголовок
#[component]
pub fn EventTable(model: EventTableModel) -> impl IntoView {
    let model = RwSignal::new(model);

    view! {
        <div class="drill-events">
            <div class="drill-events__count">
                {move || format!("Заявок: {}", model.with(|m| m.len()))}
            </div>
            <Table attr:style="width: 100%;">
                <TableHeader>
                    <TableRow>
                        {COLUMNS
                            .into_iter()
                            .map(|(field, title)| view! {
                                <TableHeaderCell>
                                    <div
                                        class="table__sortable-header"
                                        style="cursor: pointer;"
                                        on:click=move |_| model.update(|m| m.sort_by(field))
                                    >
                                        {title}
                                        <span>{move || model.with(|m| m.sort.indicator(field))}</span>
                                    </div>
                                </TableHeaderCell>
                            })
                            .collect_view()}
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || {
                        model
                            .get()
                            .rows
                            .into_iter()
                            .map(|event| {
                                let started = event
                                    .start_timestamp
                                    .as_deref()
                                    .map(format_event_timestamp)
                                    .unwrap_or_else(|| "—".to_string());
                                view! {
                                    <TableRow>
                                        <TableCell><TableCellLayout>{text(&event.code)}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{text(&event.downtime_duration)}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout truncate=true>{text(&event.comments)}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout truncate=true>{text(&event.cause)}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{started}</TableCellLayout></TableCell>
                                    </TableRow>
                                }
                            })
                            .collect_view()
                    }}
                </TableBody>
            </Table>
        </div>
    }
}
