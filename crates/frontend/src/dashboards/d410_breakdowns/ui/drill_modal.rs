use super::level_panel::LevelPanel;
use crate::shared::drilldown::{LegendVisibility, LevelView};
use crate::shared::modal_frame::ModalFrame;
use leptos::prelude::*;
use thaw::*;

/// Модальное окно детализации (уровни ниже корня)
#[component]
pub fn DrillModal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] level: Signal<Option<LevelView>>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] loading: Signal<bool>,
    on_select: Callback<String>,
    on_back: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <ModalFrame on_close=on_close modal_class="drill-modal">
            <div class="drill-modal__header">
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_back.run(())
                >
                    "← Назад"
                </Button>
                <h3 class="drill-modal__title">{move || title.get()}</h3>
                {move || level.get().map(|l| view! {
                    <span class="drill-modal__level">{l.title}</span>
                })}
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| on_close.run(())
                >
                    "✕"
                </Button>
            </div>

            {move || error.get().map(|msg| view! {
                <div class="alert alert--error">{msg}</div>
            })}

            {move || loading.get().then(|| view! {
                <div class="drill-modal__loading"><Spinner /></div>
            })}

            <div class="drill-modal__content">
                {move || level.get().map(|l| view! {
                    <LevelPanel
                        view=l
                        legend=LegendVisibility::default()
                        on_select=on_select
                        disabled=loading
                    />
                })}
            </div>
        </ModalFrame>
    }
}
