pub mod api_utils;
pub mod components;
pub mod config;
pub mod date_utils;
pub mod drilldown;
pub mod list_utils;
pub mod modal_frame;
pub mod number_format;
pub mod page_frame;
