pub mod date_range_picker;
pub mod select;
