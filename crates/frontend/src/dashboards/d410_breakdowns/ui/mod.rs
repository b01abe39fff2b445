pub mod bar_chart;
pub mod dashboard;
pub mod drill_modal;
pub mod event_table;
pub mod filter_bar;
pub mod legend_panel;
pub mod level_panel;

pub use dashboard::BreakdownDashboard;
