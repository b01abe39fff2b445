use contracts::dashboards::d410_breakdowns::constraints::{
    KEY_AREA, KEY_DATE_FROM, KEY_DATE_TO, KEY_EQUIPMENT, KEY_FAILURE_TYPE, KEY_WEEK,
};
use contracts::dashboards::d410_breakdowns::{FilterPatch, FilterState};
use std::rc::Rc;

type Listener = Rc<dyn Fn(&FilterState)>;

/// Черновик фильтров и последняя применённая версия.
///
/// Edits only touch the draft; listeners fire on [`FilterStore::apply`].
#[derive(Default)]
pub struct FilterStore {
    draft: FilterState,
    applied: FilterState,
    listeners: Vec<Listener>,
}

impl FilterStore {
    /// Current draft (what the filter bar shows)
    pub fn get(&self) -> FilterState {
        self.draft.clone()
    }

    pub fn set(&mut self, patch: FilterPatch) {
        if patch.is_empty() {
            return;
        }
        self.draft.merge(patch);
    }

    /// Raw input from one filter control, keyed by constraint key.
    ///
    /// An unparsable date clears the bound and is logged.
    pub fn set_input(&mut self, key: &str, raw: &str) {
        let patch = FilterPatch::new();
        let patch = match key {
            KEY_DATE_FROM => patch.date_from(raw).unwrap_or_else(|e| {
                log::warn!("{}: {}", key, e);
                FilterPatch {
                    date_from: Some(None),
                    ..FilterPatch::default()
                }
            }),
            KEY_DATE_TO => patch.date_to(raw).unwrap_or_else(|e| {
                log::warn!("{}: {}", key, e);
                FilterPatch {
                    date_to: Some(None),
                    ..FilterPatch::default()
                }
            }),
            KEY_AREA => patch.area(raw),
            KEY_EQUIPMENT => patch.equipment(raw),
            KEY_FAILURE_TYPE => patch.failure_type(raw),
            KEY_WEEK => patch.week(raw),
            other => {
                log::warn!("unknown filter key '{}'", other);
                return;
            }
        };
        self.set(patch);
    }

    /// Commits the draft and notifies every subscriber
    pub fn apply(&mut self) -> FilterState {
        self.applied = self.draft.clone();
        log::debug!("filters applied: {:?}", self.applied);
        for listener in &self.listeners {
            listener(&self.applied);
        }
        self.applied.clone()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&FilterState) + 'static) {
        self.listeners.push(Rc::new(listener));
    }

    /// Draft differs from what was last applied
    pub fn is_dirty(&self) -> bool {
        self.draft != self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d410_breakdowns::Selector;
    use std::cell::RefCell;

    #[test]
    fn test_set_does_not_notify() {
        let mut store = FilterStore::default();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        store.subscribe(move |f| sink.borrow_mut().push(f.clone()));

        store.set_input(KEY_FAILURE_TYPE, "Mechanical");
        store.set_input(KEY_AREA, "all");
        assert!(calls.borrow().is_empty());
        assert!(store.is_dirty());

        let applied = store.apply();
        assert_eq!(applied.failure_type, Selector::parse("Mechanical"));
        assert!(applied.area.is_all());
        assert_eq!(calls.borrow().len(), 1);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_invalid_date_clears_bound() {
        let mut store = FilterStore::default();
        store.set_input(KEY_DATE_FROM, "2024-02-01");
        assert!(store.get().date_from.is_some());
        store.set_input(KEY_DATE_FROM, "01/02/2024");
        assert_eq!(store.get().date_from, None);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut store = FilterStore::default();
        store.set_input("shift", "night");
        assert_eq!(store.get(), FilterState::default());
    }
}
