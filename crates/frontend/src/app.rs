use crate::dashboards::BreakdownDashboard;
use crate::shared::config::load_config;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{:#}", e);
            return view! {
                <ConfigProvider>
                    <div class="alert alert--error">{format!("Ошибка конфигурации: {:#}", e)}</div>
                </ConfigProvider>
            }
            .into_any();
        }
    };

    let api_port = config.api.port;
    let selected = RwSignal::new(
        config
            .dashboards
            .first()
            .map(|d| d.id.clone())
            .unwrap_or_default(),
    );
    let config = StoredValue::new(config);

    view! {
        <ConfigProvider>
            <div class="app">
                <TabList selected_value=selected>
                    {config.with_value(|c| {
                        c.dashboards
                            .iter()
                            .map(|d| {
                                let id = d.id.clone();
                                let title = d.title.clone();
                                view! { <Tab value=id>{title}</Tab> }
                            })
                            .collect_view()
                    })}
                </TabList>

                // dashboard state is dropped on tab switch
                {move || {
                    let id = selected.get();
                    config
                        .with_value(|c| c.dashboard(&id).cloned())
                        .map(|config| view! { <BreakdownDashboard config=config api_port=api_port /> })
                }}
            </div>
        </ConfigProvider>
    }
    .into_any()
}
