//! Contracts for the breakdown drill-down dashboards (top causes, top equipment,
//! failure types).
//!
//! Everything here is plain data: filter selections, constraint sets sent to the
//! reporting endpoints, the rows those endpoints return and the description of a
//! drill-down hierarchy.

pub mod constraints;
pub mod dto;
pub mod filter;
pub mod hierarchy;
pub mod lookup;

pub use constraints::{ConstraintSet, DrillPath, DrillStep, MAX_DRILL_DEPTH};
pub use dto::{AggregateRow, EventRecord, LevelData};
pub use filter::{FilterPatch, FilterState, Selector};
pub use hierarchy::{Hierarchy, LevelSpec};
