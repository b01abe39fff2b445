pub mod d410_breakdowns;

pub use d410_breakdowns::ui::BreakdownDashboard;
