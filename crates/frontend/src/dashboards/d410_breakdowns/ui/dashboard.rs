use super::drill_modal::DrillModal;
use super::filter_bar::{selector_value, FilterBar};
use super::legend_panel::LegendPanel;
use super::level_panel::LevelPanel;
use crate::dashboards::d410_breakdowns::api::fetch_options;
use crate::shared::api_utils::api_base;
use crate::shared::config::DashboardConfig;
use crate::shared::drilldown::{
    run_ticket, Applied, FetchTicket, FilterStore, HttpLevelSource, LegendVisibility, LevelView,
    NavState, Navigation, Navigator,
};
use crate::shared::page_frame::PageFrame;
use contracts::dashboards::d410_breakdowns::filter::ALL;
use contracts::dashboards::d410_breakdowns::{AggregateRow, FilterState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use thaw::*;

/// Дашборд простоев с детализацией по уровням иерархии
#[component]
pub fn BreakdownDashboard(config: DashboardConfig, api_port: u16) -> impl IntoView {
    let hierarchy = match config.hierarchy() {
        Ok(h) => h,
        Err(e) => {
            log::error!("{:#}", e);
            return view! {
                <div class="alert alert--error">{format!("Ошибка конфигурации: {:#}", e)}</div>
            }
            .into_any();
        }
    };

    let config = StoredValue::new(config);
    let source = StoredValue::new(HttpLevelSource::new(
        api_base(api_port),
        config.with_value(|c| c.api_prefix.clone()),
        config.with_value(|c| c.params.clone()),
    ));
    let nav = StoredValue::new(Navigator::new(hierarchy));
    let store = StoredValue::new_local(FilterStore::default());

    let draft = RwSignal::new(FilterState::default());
    let options = RwSignal::new(HashMap::<String, Vec<(String, String)>>::new());
    let root_view = RwSignal::new(None::<LevelView>);
    let drill_view = RwSignal::new(None::<LevelView>);
    let legend = RwSignal::new(LegendVisibility::default());
    let title = RwSignal::new(String::new());
    let modal_open = RwSignal::new(false);
    let loading = RwSignal::new(false);
    let error_msg = RwSignal::new(None::<String>);
    let dirty = RwSignal::new(false);

    // navigator -> signals
    let sync = move || {
        nav.with_value(|n| {
            root_view.set(n.root_view());
            legend.set(n.legend().clone());
            title.set(n.path_title());
            drill_view.set(match n.state() {
                NavState::Level(_) => n.current_view(),
                _ => None,
            });
            if !matches!(n.state(), NavState::Level(_)) {
                modal_open.set(false);
            }
        });
    };

    let run = move |ticket: FetchTicket| {
        loading.set(true);
        spawn_local(async move {
            let source = source.get_value();
            let outcome = run_ticket(&source, ticket, |t, r| {
                nav.try_update_value(|n| n.apply(t, r))
                    .unwrap_or(Applied::Stale)
            })
            .await;
            match outcome {
                Applied::Rendered(view) => {
                    error_msg.set(None);
                    if !view.is_root() {
                        modal_open.set(true);
                    }
                    sync();
                }
                Applied::Failed(e) => error_msg.set(Some(e.to_string())),
                Applied::Stale | Applied::Skipped(_) => {}
            }
            loading.set(nav.with_value(|n| n.is_pending()));
        });
    };

    let navigate = move |navigation: Navigation| match navigation {
        Navigation::Show(_) => {
            loading.set(false);
            sync();
        }
        Navigation::Fetch(ticket) => run(ticket),
    };

    let load_lookup = move |key: String, scope: Option<(String, String)>| {
        let Some(lookup) = config.with_value(|c| c.lookup(&key).cloned()) else {
            return;
        };
        spawn_local(async move {
            let source = source.get_value();
            match fetch_options(&source, &lookup, scope).await {
                Ok(list) => options.update(|o| {
                    o.insert(lookup.key.clone(), list);
                }),
                Err(e) => log::error!("lookup '{}' failed: {}", lookup.key, e),
            }
        });
    };

    // "Применить": navigator restarts from the root; the old chart stays
    // until the new one arrives
    store.update_value(|s| {
        s.subscribe(move |filter: &FilterState| {
            error_msg.set(None);
            if let Some(ticket) = nav.try_update_value(|n| n.open_root(filter.clone())) {
                run(ticket);
            }
        })
    });

    let on_apply = Callback::new(move |_: ()| {
        store.update_value(|s| {
            s.apply();
        });
        dirty.set(false);
    });

    let on_input = Callback::new(move |(key, raw): (String, String)| {
        store.update_value(|s| s.set_input(&key, &raw));
        let filter = store.with_value(|s| s.get());
        draft.set(filter.clone());

        // equipment list follows the selected area
        let dependents: Vec<String> = config.with_value(|c| {
            c.dependents_of(&key).map(|l| l.key.clone()).collect()
        });
        for dependent in dependents {
            store.update_value(|s| s.set_input(&dependent, ALL));
            let value = selector_value(&filter, &key);
            let scope = (value != ALL)
                .then(|| (config.with_value(|c| c.wire_param(&key)), value));
            load_lookup(dependent, scope);
        }
        draft.set(store.with_value(|s| s.get()));
        dirty.set(store.with_value(|s| s.is_dirty()));
    });

    let on_select = Callback::new(move |label: String| {
        match nav.try_update_value(|n| n.drill(&label)) {
            Some(Ok(ticket)) => {
                error_msg.set(None);
                run(ticket);
            }
            Some(Err(e)) if e.is_user_visible() => error_msg.set(Some(e.to_string())),
            Some(Err(e)) => log::debug!("click on '{}' ignored: {}", label, e),
            None => {}
        }
    });

    let on_back = Callback::new(move |_: ()| {
        error_msg.set(None);
        match nav.try_update_value(|n| n.back()) {
            Some(Ok(navigation)) => navigate(navigation),
            Some(Err(e)) => log::debug!("back ignored: {}", e),
            None => {}
        }
    });

    let on_close = Callback::new(move |_: ()| {
        error_msg.set(None);
        modal_open.set(false);
        match nav.try_update_value(|n| n.return_to_root()) {
            Some(Ok(navigation)) => navigate(navigation),
            Some(Err(e)) => log::debug!("close ignored: {}", e),
            None => {}
        }
    });

    let on_toggle = Callback::new(move |label: String| {
        nav.update_value(|n| n.toggle_legend(&label));
        sync();
    });

    let on_toggle_all = Callback::new(move |_: ()| {
        nav.update_value(|n| n.toggle_all_legend());
        sync();
    });

    // late responses after a tab switch are dropped as stale
    on_cleanup(move || {
        nav.try_update_value(|n| n.close());
    });

    // initial load: options, then the root with default filters
    for key in config.with_value(|c| c.lookups.iter().map(|l| l.key.clone()).collect::<Vec<_>>()) {
        load_lookup(key, None);
    }
    on_apply.run(());

    let root_rows = Signal::derive(move || {
        root_view.with(|v| {
            v.as_ref()
                .and_then(|v| v.data.aggregates().map(<[AggregateRow]>::to_vec))
                .unwrap_or_default()
        })
    });
    let sort_root = config.with_value(|c| c.sort_root_by_downtime);
    let page_title = config.with_value(|c| c.title.clone());

    view! {
        <PageFrame dashboard_id=config.with_value(|c| c.id.clone())>
            <div class="page__header">
                <h2 class="page__title">{page_title}</h2>
            </div>

            <div class="page__content">
                <FilterBar
                    lookups=config.with_value(|c| c.lookups.clone())
                    date_range=config.with_value(|c| c.date_range)
                    draft=draft
                    options=options
                    on_input=on_input
                    on_apply=on_apply
                    loading=loading
                    dirty=dirty
                />

                {move || (!modal_open.get()).then(|| error_msg.get()).flatten().map(|msg| view! {
                    <div class="alert alert--error" style="margin-bottom: var(--spacing-md);">{msg}</div>
                })}

                {move || (loading.get() && root_view.with(Option::is_none)).then(|| view! {
                    <div class="breakdown__loading"><Spinner /></div>
                })}

                {move || root_view.get().map(|root| view! {
                    <div class="breakdown">
                        <div class="breakdown__chart">
                            <LevelPanel
                                view=root
                                legend=legend.get()
                                sort_by_hours=sort_root
                                on_select=on_select
                                disabled=loading
                            />
                        </div>
                        <div class="breakdown__legend">
                            <LegendPanel
                                rows=root_rows
                                legend=legend
                                on_toggle=on_toggle
                                on_toggle_all=on_toggle_all
                            />
                        </div>
                    </div>
                })}
            </div>

            {move || modal_open.get().then(|| view! {
                <DrillModal
                    title=title
                    level=drill_view
                    error=error_msg
                    loading=loading
                    on_select=on_select
                    on_back=on_back
                    on_close=on_close
                />
            })}
        </PageFrame>
    }
    .into_any()
}
