//! Drill-down state machine.
//!
//! The navigator owns the drill path, the per-level cache and the root legend.
//! It never performs I/O: every transition that needs data hands out a
//! [`FetchTicket`], and the caller feeds the result back through
//! [`Navigator::apply`]. Tickets carry the generation they were issued under;
//! anything issued before the last cancelling transition is dropped as stale.

use super::error::DrillError;
use super::legend::LegendVisibility;
use contracts::dashboards::d410_breakdowns::{
    ConstraintSet, DrillPath, DrillStep, FilterState, Hierarchy, LevelData, LevelSpec,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Root,
    /// Drill level, 1-based below the root
    Level(usize),
}

impl NavState {
    fn index(self) -> Option<usize> {
        match self {
            NavState::Closed => None,
            NavState::Root => Some(0),
            NavState::Level(n) => Some(n),
        }
    }

    fn at(index: usize) -> Self {
        if index == 0 {
            NavState::Root
        } else {
            NavState::Level(index)
        }
    }
}

/// Request for the rows of one level
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    level: usize,
    spec: LevelSpec,
    constraints: ConstraintSet,
    path: DrillPath,
    /// New filter, committed only if this root fetch succeeds
    filter: Option<FilterState>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn spec(&self) -> &LevelSpec {
        &self.spec
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Path that becomes current once the ticket is applied
    pub fn path(&self) -> &DrillPath {
        &self.path
    }
}

/// Snapshot of a level ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct LevelView {
    pub level: usize,
    pub key: String,
    pub title: String,
    pub terminal: bool,
    pub path: DrillPath,
    pub data: LevelData,
}

impl LevelView {
    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

/// Outcome of feeding a fetch result back
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Rendered(LevelView),
    /// Level came back with no labels at all; fetch the next one
    Skipped(FetchTicket),
    /// Superseded by a later transition, nothing changed
    Stale,
    /// Fetch failed, state untouched
    Failed(DrillError),
}

/// Result of a transition that may be served from cache
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Show(LevelView),
    Fetch(FetchTicket),
}

pub struct Navigator {
    hierarchy: Hierarchy,
    filter: FilterState,
    state: NavState,
    path: DrillPath,
    cache: HashMap<(usize, ConstraintSet), LevelData>,
    legend: LegendVisibility,
    generation: u64,
    pending: bool,
}

impl Navigator {
    pub fn new(hierarchy: Hierarchy) -> Self {
        Self {
            hierarchy,
            filter: FilterState::default(),
            state: NavState::Closed,
            path: DrillPath::new(),
            cache: HashMap::new(),
            legend: LegendVisibility::default(),
            generation: 0,
            pending: false,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn path(&self) -> &DrillPath {
        &self.path
    }

    pub fn legend(&self) -> &LegendVisibility {
        &self.legend
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fresh root query for `filter`.
    ///
    /// Nothing changes until the root arrives: a successful apply swaps the
    /// filter in and drops the path, every cached level and the legend. A
    /// failed one leaves the previous root on screen.
    pub fn open_root(&mut self, filter: FilterState) -> FetchTicket {
        log::debug!("open root: {:?}", filter);
        self.issue_for(0, DrillPath::new(), Some(filter))
    }

    /// Click on a bar of the current level
    pub fn drill(&mut self, label: &str) -> Result<FetchTicket, DrillError> {
        if self.pending {
            log::debug!("drill '{}' ignored: fetch in flight", label);
            return Err(DrillError::Busy);
        }
        let current = self.state.index().ok_or(DrillError::NotOpen)?;
        if self.hierarchy.is_terminal(current) {
            return Err(DrillError::TerminalLevel);
        }
        let spec = self.hierarchy.level(current).ok_or(DrillError::NotOpen)?;

        let visible = self
            .cached(current, &self.path)
            .map(|data| data.has_label(label))
            .unwrap_or(false)
            && !(current == 0 && self.legend.is_hidden(label));
        if label.trim().is_empty() || !visible {
            log::debug!("drill '{}' ignored: not on level {}", label, current);
            return Err(DrillError::UnknownLabel(label.to_string()));
        }

        let mut path = self.path.clone();
        path.push(DrillStep::selected(spec.key.clone(), label))
            .map_err(|_| DrillError::TerminalLevel)?;
        log::debug!("drill {} -> {}: '{}'", current, current + 1, label);
        Ok(self.issue(current + 1, path))
    }

    /// Commits a fetch result if its ticket is still current
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<LevelData, DrillError>,
    ) -> Applied {
        if !self.pending || ticket.generation != self.generation {
            log::debug!(
                "stale response for level {} (gen {} != {})",
                ticket.level,
                ticket.generation,
                self.generation
            );
            return Applied::Stale;
        }
        self.pending = false;

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                log::error!("level {} fetch failed: {}", ticket.spec.key, e);
                return Applied::Failed(e);
            }
        };

        let FetchTicket {
            level,
            spec,
            constraints,
            mut path,
            filter,
            ..
        } = ticket;

        if let Some(filter) = filter {
            self.filter = filter;
            self.path.clear();
            self.cache.clear();
            self.legend.clear();
        }

        if level > 0 && !spec.terminal && data.all_blank() {
            if path.push(DrillStep::skipped(spec.key.clone())).is_err() {
                return Applied::Failed(DrillError::TerminalLevel);
            }
            log::info!(
                "level '{}' has no labels ({} rows), skipping to level {}",
                spec.key,
                data.len(),
                level + 1
            );
            return Applied::Skipped(self.issue(level + 1, path));
        }

        let data = data.without_blank();
        if level == 0 {
            let labels = data
                .aggregates()
                .map(|rows| rows.iter().map(|r| r.dimension_label.clone()).collect::<Vec<_>>())
                .unwrap_or_default();
            self.legend.reset(labels);
        }
        self.cache.insert((level, constraints), data);
        self.path = path;
        self.state = NavState::at(level);
        log::debug!("now at {:?}, path len {}", self.state, self.path.len());

        match self.current_view() {
            Some(view) => Applied::Rendered(view),
            None => Applied::Failed(DrillError::NotOpen),
        }
    }

    /// One level up. Levels passed by the skip rule are stepped over too.
    pub fn back(&mut self) -> Result<Navigation, DrillError> {
        let current = self.state.index().ok_or(DrillError::NotOpen)?;
        self.cancel();
        if current == 0 {
            return self.show_or_fetch(0, DrillPath::new());
        }

        let mut path = self.path.clone();
        while path.last().map(|s| s.auto).unwrap_or(false) {
            path.pop();
        }
        path.pop();
        let target = path.len();
        log::debug!("back {} -> {}", current, target);
        self.show_or_fetch(target, path)
    }

    /// Drill modal closed: back to the root chart, drill levels forgotten
    pub fn return_to_root(&mut self) -> Result<Navigation, DrillError> {
        self.state.index().ok_or(DrillError::NotOpen)?;
        self.cancel();
        self.cache.retain(|(level, _), _| *level == 0);
        self.legend.show_all();
        self.show_or_fetch(0, DrillPath::new())
    }

    pub fn close(&mut self) {
        log::debug!("navigator closed");
        self.cancel();
        self.state = NavState::Closed;
        self.path.clear();
        self.cache.clear();
        self.legend.clear();
    }

    /// Flips one root series. No fetch involved.
    pub fn toggle_legend(&mut self, label: &str) {
        self.legend.toggle(label);
    }

    pub fn toggle_all_legend(&mut self) {
        self.legend.toggle_all();
    }

    pub fn current_view(&self) -> Option<LevelView> {
        let index = self.state.index()?;
        self.view(index, &self.path)
    }

    /// Root level, whatever level is active
    pub fn root_view(&self) -> Option<LevelView> {
        self.state.index()?;
        self.view(0, &DrillPath::new())
    }

    /// Title built from the user's selections, e.g. "Оборудование: Mixer-12 / Износ"
    pub fn path_title(&self) -> String {
        let labels = self.path.selected_labels();
        match self.hierarchy.level(0) {
            Some(root) if !labels.is_empty() => format!("{}: {}", root.title, labels.join(" / ")),
            Some(root) => root.title.clone(),
            None => String::new(),
        }
    }

    fn issue(&mut self, level: usize, path: DrillPath) -> FetchTicket {
        self.issue_for(level, path, None)
    }

    fn issue_for(
        &mut self,
        level: usize,
        path: DrillPath,
        filter: Option<FilterState>,
    ) -> FetchTicket {
        self.generation += 1;
        self.pending = true;
        let constraints = ConstraintSet::for_path(filter.as_ref().unwrap_or(&self.filter), &path);
        let spec = self
            .hierarchy
            .level(level)
            .cloned()
            .unwrap_or_else(|| self.hierarchy.terminal().clone());
        FetchTicket {
            generation: self.generation,
            level,
            spec,
            constraints,
            path,
            filter,
        }
    }

    fn cancel(&mut self) {
        self.generation += 1;
        self.pending = false;
    }

    fn cached(&self, level: usize, path: &DrillPath) -> Option<&LevelData> {
        self.cache
            .get(&(level, ConstraintSet::for_path(&self.filter, path)))
    }

    fn view(&self, level: usize, path: &DrillPath) -> Option<LevelView> {
        let spec = self.hierarchy.level(level)?;
        let data = self.cached(level, path)?;
        Some(LevelView {
            level,
            key: spec.key.clone(),
            title: spec.title.clone(),
            terminal: spec.terminal,
            path: path.clone(),
            data: data.clone(),
        })
    }

    fn show_or_fetch(&mut self, level: usize, path: DrillPath) -> Result<Navigation, DrillError> {
        if self.cached(level, &path).is_some() {
            self.path = path;
            self.state = NavState::at(level);
            return self
                .current_view()
                .map(Navigation::Show)
                .ok_or(DrillError::NotOpen);
        }
        log::debug!("level {} not cached, refetching", level);
        Ok(Navigation::Fetch(self.issue(level, path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d410_breakdowns::constraints::{
        KEY_CAUSE, KEY_EQUIPMENT, KEY_FAILURE_TYPE, KEY_MECHANISM,
    };
    use contracts::dashboards::d410_breakdowns::{AggregateRow, EventRecord, MAX_DRILL_DEPTH};
    use contracts::dashboards::d410_breakdowns::filter::FilterPatch;

    fn level(key: &str, label_field: &str) -> LevelSpec {
        LevelSpec {
            key: key.to_string(),
            title: key.to_string(),
            label_field: label_field.to_string(),
            endpoint: format!("/{key}"),
            terminal: false,
            limit: None,
        }
    }

    fn events_level() -> LevelSpec {
        LevelSpec {
            key: "events".to_string(),
            title: "События".to_string(),
            label_field: String::new(),
            endpoint: "/events".to_string(),
            terminal: true,
            limit: None,
        }
    }

    /// equipment -> cause -> mechanism -> events
    fn top_equipment() -> Navigator {
        Navigator::new(
            Hierarchy::new(vec![
                level(KEY_EQUIPMENT, "machine_name"),
                level(KEY_CAUSE, "cause"),
                level(KEY_MECHANISM, "mechanism"),
                events_level(),
            ])
            .unwrap(),
        )
    }

    /// failure type -> equipment -> cause -> mechanism -> events
    fn failure_types() -> Navigator {
        Navigator::new(
            Hierarchy::new(vec![
                level(KEY_FAILURE_TYPE, "failure_type"),
                level(KEY_EQUIPMENT, "machine_name"),
                level(KEY_CAUSE, "cause"),
                level(KEY_MECHANISM, "mechanism"),
                events_level(),
            ])
            .unwrap(),
        )
    }

    fn rows(labels: &[&str]) -> LevelData {
        LevelData::Aggregates(
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| AggregateRow::new(*l, (i + 1) as f64, (i + 1) as u64))
                .collect(),
        )
    }

    fn rendered(applied: Applied) -> LevelView {
        match applied {
            Applied::Rendered(view) => view,
            other => panic!("expected a rendered level, got {:?}", other),
        }
    }

    fn mechanical() -> FilterState {
        let mut filter = FilterState::default();
        filter.merge(FilterPatch::new().area("all").failure_type("Mechanical"));
        filter
    }

    /// Root plus `labels.len()` drills, each level answering with `rows(&["A", "B"])`
    fn drilled(nav: &mut Navigator, labels: &[&str]) {
        let t = nav.open_root(FilterState::default());
        rendered(nav.apply(t, Ok(rows(&["A", "B"]))));
        for label in labels {
            let t = nav.drill(label).unwrap();
            rendered(nav.apply(t, Ok(rows(&["A", "B"]))));
        }
    }

    #[test]
    fn test_scenario_a_drill_from_root() {
        let mut nav = top_equipment();
        let root = nav.open_root(mechanical());
        assert_eq!(root.level(), 0);
        assert_eq!(root.constraints(), &ConstraintSet::new().with(KEY_FAILURE_TYPE, "Mechanical"));
        assert_eq!(nav.state(), NavState::Closed);

        let view = rendered(nav.apply(root, Ok(rows(&["Mixer-12", "Press-3", "Oven-1"]))));
        assert!(view.is_root());
        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.legend().visible_count(), 3);

        let ticket = nav.drill("Mixer-12").unwrap();
        assert_eq!(ticket.level(), 1);
        assert_eq!(
            ticket.constraints(),
            &ConstraintSet::new()
                .with(KEY_FAILURE_TYPE, "Mechanical")
                .with(KEY_EQUIPMENT, "Mixer-12")
        );

        let view = rendered(nav.apply(ticket, Ok(rows(&["Wear", "Overheat"]))));
        assert_eq!(nav.state(), NavState::Level(1));
        assert_eq!(view.key, KEY_CAUSE);
        assert_eq!(nav.path().len(), 1);
        assert_eq!(nav.path_title(), "equipment: Mixer-12");
    }

    #[test]
    fn test_scenario_b_blank_level_is_skipped() {
        let mut nav = failure_types();
        let t = nav.open_root(FilterState::default());
        rendered(nav.apply(t, Ok(rows(&["Mechanical", "Electrical"]))));
        let t = nav.drill("Mechanical").unwrap();
        rendered(nav.apply(t, Ok(rows(&["Mixer-12"]))));

        let t = nav.drill("Mixer-12").unwrap();
        assert_eq!(t.level(), 2);
        let next = match nav.apply(t, Ok(rows(&["", "  "]))) {
            Applied::Skipped(next) => next,
            other => panic!("expected a skip, got {:?}", other),
        };
        assert_eq!(next.level(), 3);
        assert_eq!(next.constraints().get(KEY_CAUSE), Some(""));
        assert_eq!(next.constraints().get(KEY_EQUIPMENT), Some("Mixer-12"));
        assert!(nav.is_pending());

        let view = rendered(nav.apply(next, Ok(rows(&["Bearing"]))));
        assert_eq!(nav.state(), NavState::Level(3));
        assert_eq!(view.key, KEY_MECHANISM);
        assert_eq!(nav.path().len(), 3);
        assert_eq!(nav.path().selected_labels(), vec!["Mechanical", "Mixer-12"]);
    }

    #[test]
    fn test_some_blank_rows_are_filtered_not_skipped() {
        let mut nav = top_equipment();
        drilled(&mut nav, &["A"]);
        let t = nav.drill("A").unwrap();
        let view = rendered(nav.apply(t, Ok(rows(&["", "Bearing"]))));
        assert_eq!(nav.state(), NavState::Level(2));
        assert_eq!(view.data.len(), 1);
        assert!(view.data.has_label("Bearing"));
        assert!(nav.drill("").is_err());
    }

    #[test]
    fn test_blank_root_is_not_skipped() {
        let mut nav = top_equipment();
        let t = nav.open_root(FilterState::default());
        let view = rendered(nav.apply(t, Ok(rows(&[""]))));
        assert!(view.data.is_empty());
        assert_eq!(nav.state(), NavState::Root);
    }

    #[test]
    fn test_scenario_c_legend_toggle_without_fetch() {
        let mut nav = top_equipment();
        let t = nav.open_root(FilterState::default());
        rendered(nav.apply(t, Ok(rows(&["Mechanical", "Electrical", "Hydraulic"]))));
        let generation = nav.generation();

        nav.toggle_legend("Electrical");
        assert!(nav.legend().is_hidden("Electrical"));
        assert_eq!(nav.legend().visible_count(), 2);
        assert_eq!(nav.generation(), generation);
        assert!(!nav.is_pending());

        assert_eq!(
            nav.drill("Electrical"),
            Err(DrillError::UnknownLabel("Electrical".to_string()))
        );
    }

    #[test]
    fn test_scenario_d_failed_drill_keeps_state() {
        let mut nav = top_equipment();
        drilled(&mut nav, &["A"]);
        let before = nav.current_view();

        let t = nav.drill("B").unwrap();
        let applied = nav.apply(t, Err(DrillError::Network("timeout".to_string())));
        assert_eq!(applied, Applied::Failed(DrillError::Network("timeout".to_string())));
        assert_eq!(nav.path().len(), 1);
        assert_eq!(nav.state(), NavState::Level(1));
        assert_eq!(nav.current_view(), before);

        assert!(nav.drill("B").is_ok());
    }

    #[test]
    fn test_busy_while_pending() {
        let mut nav = top_equipment();
        drilled(&mut nav, &[]);
        let t = nav.drill("A").unwrap();
        assert_eq!(nav.drill("B"), Err(DrillError::Busy));
        rendered(nav.apply(t, Ok(rows(&["A"]))));
    }

    #[test]
    fn test_stale_responses_are_discarded() {
        let mut nav = top_equipment();
        drilled(&mut nav, &["A"]);
        let t = nav.drill("A").unwrap();
        let back = nav.back().unwrap();
        assert!(matches!(back, Navigation::Show(ref v) if v.is_root()));
        assert_eq!(nav.apply(t, Ok(rows(&["late"]))), Applied::Stale);
        assert_eq!(nav.state(), NavState::Root);

        let first = nav.open_root(FilterState::default());
        let second = nav.open_root(mechanical());
        assert_eq!(nav.apply(first, Ok(rows(&["old"]))), Applied::Stale);
        let view = rendered(nav.apply(second, Ok(rows(&["new"]))));
        assert!(view.data.has_label("new"));
    }

    #[test]
    fn test_back_is_served_from_cache() {
        let mut nav = top_equipment();
        let t = nav.open_root(FilterState::default());
        rendered(nav.apply(t, Ok(rows(&["Mixer-12", "Press-3"]))));
        let t = nav.drill("Mixer-12").unwrap();
        let causes = rendered(nav.apply(t, Ok(rows(&["Wear", "Overheat"]))));
        let t = nav.drill("Wear").unwrap();
        rendered(nav.apply(t, Ok(rows(&["Bearing"]))));
        let t = nav.drill("Bearing").unwrap();
        let events = rendered(nav.apply(t, Ok(LevelData::Events(vec![EventRecord::default()]))));
        assert!(events.terminal);
        assert_eq!(nav.drill("x"), Err(DrillError::TerminalLevel));

        nav.back().unwrap();
        let back = nav.back().unwrap();
        assert_eq!(back, Navigation::Show(causes));
        assert!(!nav.is_pending());
        assert_eq!(nav.state(), NavState::Level(1));
    }

    #[test]
    fn test_back_steps_over_skipped_level() {
        let mut nav = failure_types();
        drilled(&mut nav, &["A"]);
        let t = nav.drill("A").unwrap();
        let next = match nav.apply(t, Ok(rows(&[""]))) {
            Applied::Skipped(next) => next,
            other => panic!("expected a skip, got {:?}", other),
        };
        rendered(nav.apply(next, Ok(rows(&["Bearing"]))));
        assert_eq!(nav.state(), NavState::Level(3));

        match nav.back().unwrap() {
            Navigation::Show(view) => assert_eq!(view.level, 1),
            other => panic!("expected cached level, got {:?}", other),
        }
        assert_eq!(nav.path().len(), 1);
    }

    #[test]
    fn test_path_never_exceeds_hierarchy() {
        let mut nav = failure_types();
        let t = nav.open_root(FilterState::default());
        rendered(nav.apply(t, Ok(rows(&["A"]))));
        loop {
            match nav.drill("A") {
                Ok(t) => {
                    let data = if t.spec().terminal {
                        LevelData::Events(vec![])
                    } else {
                        rows(&["A"])
                    };
                    rendered(nav.apply(t, Ok(data)));
                }
                Err(e) => {
                    assert_eq!(e, DrillError::TerminalLevel);
                    break;
                }
            }
            assert!(nav.path().len() <= MAX_DRILL_DEPTH);
            assert!(nav.path().len() <= nav.hierarchy().depth());
        }
        assert_eq!(nav.path().len(), 4);
    }

    #[test]
    fn test_new_filter_resets_path_and_legend() {
        let mut nav = top_equipment();
        drilled(&mut nav, &["A", "B"]);
        nav.toggle_legend("A");
        assert_eq!(nav.legend().hidden_count(), 1);

        let t = nav.open_root(mechanical());
        assert_eq!(nav.path().len(), 2);
        assert_eq!(nav.state(), NavState::Level(2));
        assert_eq!(nav.drill("A"), Err(DrillError::Busy));

        let view = rendered(nav.apply(t, Ok(rows(&["A", "B"]))));
        assert!(view.is_root());
        assert!(nav.path().is_empty());
        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.legend().hidden_count(), 0);
        assert_eq!(nav.filter(), &mechanical());
    }

    #[test]
    fn test_failed_root_refetch_keeps_previous_root() {
        let mut nav = top_equipment();
        let t = nav.open_root(FilterState::default());
        rendered(nav.apply(t, Ok(rows(&["Mixer-12"]))));
        nav.toggle_legend("Mixer-12");
        let before = nav.root_view();

        let t = nav.open_root(mechanical());
        assert_eq!(t.constraints().get(KEY_FAILURE_TYPE), Some("Mechanical"));
        let applied = nav.apply(t, Err(DrillError::Network("HTTP 500".to_string())));
        assert_eq!(applied, Applied::Failed(DrillError::Network("HTTP 500".to_string())));

        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.filter(), &FilterState::default());
        assert_eq!(nav.root_view(), before);
        assert!(nav.legend().is_hidden("Mixer-12"));
        assert!(!nav.is_pending());

        nav.toggle_legend("Mixer-12");
        let t = nav.drill("Mixer-12").unwrap();
        assert_eq!(t.constraints().get(KEY_FAILURE_TYPE), None);
    }

    #[test]
    fn test_return_to_root_and_close() {
        let mut nav = top_equipment();
        drilled(&mut nav, &["A", "B"]);
        nav.toggle_legend("B");

        match nav.return_to_root().unwrap() {
            Navigation::Show(view) => assert!(view.is_root()),
            other => panic!("expected cached root, got {:?}", other),
        }
        assert!(nav.path().is_empty());
        assert_eq!(nav.legend().hidden_count(), 0);
        assert!(nav.root_view().is_some());

        let t = nav.drill("A").unwrap();
        assert_eq!(t.level(), 1);

        nav.close();
        assert_eq!(nav.state(), NavState::Closed);
        assert!(nav.root_view().is_none());
        assert_eq!(nav.back(), Err(DrillError::NotOpen));
        assert_eq!(nav.drill("A"), Err(DrillError::NotOpen));
        assert_eq!(nav.apply(t, Ok(rows(&["A"]))), Applied::Stale);
    }
}
