//! Drill-down core shared by the breakdown dashboards.
//!
//! The flow is: [`FilterStore`] is applied -> [`Navigator::open_root`] issues a
//! [`FetchTicket`] -> a [`LevelSource`] fetches it -> [`Navigator::apply`]
//! commits the level -> the renderer models draw it. A bar click goes through
//! [`Navigator::drill`], "back" through [`Navigator::back`] (served from cache).
//!
//! Nothing in this module touches the DOM; the Leptos components live next to
//! the dashboards.

pub mod error;
pub mod filter_state;
pub mod legend;
pub mod navigator;
pub mod query_client;
pub mod renderer;
pub mod session;

pub use error::DrillError;
pub use filter_state::FilterStore;
pub use legend::LegendVisibility;
pub use navigator::{Applied, FetchTicket, LevelView, NavState, Navigation, Navigator};
pub use query_client::{HttpLevelSource, LevelSource};
pub use renderer::{BarChartModel, EventTableModel, RenderModel};
pub use session::run_ticket;
