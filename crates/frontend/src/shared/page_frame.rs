//! PageFrame: root wrapper of a dashboard page.
//!
//! Puts `id="{dashboard}--dashboard"` and `data-page-category="dashboard"` on
//! the root element so a page can be found from the DOM inspector.

use leptos::prelude::*;

pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

pub fn page_id(dashboard_id: &str) -> String {
    format!("{}--{}", dashboard_id, PAGE_CAT_DASHBOARD)
}

#[component]
pub fn PageFrame(
    /// Dashboard id from the configuration
    #[prop(into)]
    dashboard_id: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            id=page_id(&dashboard_id)
            class="page page--dashboard"
            data-page-category=PAGE_CAT_DASHBOARD
        >
            {children()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id() {
        assert_eq!(page_id("top_causes"), "top_causes--dashboard");
    }
}
