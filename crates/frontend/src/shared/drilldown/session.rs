use super::error::DrillError;
use super::navigator::{Applied, FetchTicket};
use super::query_client::LevelSource;
use contracts::dashboards::d410_breakdowns::LevelData;

/// Fetches a ticket and hands the result to `apply`, following skip tickets
/// until a level is rendered, fails or goes stale.
pub async fn run_ticket<S, F>(source: &S, mut ticket: FetchTicket, mut apply: F) -> Applied
where
    S: LevelSource + ?Sized,
    F: FnMut(FetchTicket, Result<LevelData, DrillError>) -> Applied,
{
    loop {
        let result = source.fetch_level(ticket.spec(), ticket.constraints()).await;
        match apply(ticket, result) {
            Applied::Skipped(next) => ticket = next,
            outcome => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::drilldown::navigator::{NavState, Navigation, Navigator};
    use async_trait::async_trait;
    use contracts::dashboards::d410_breakdowns::constraints::{KEY_CAUSE, KEY_EQUIPMENT, KEY_MECHANISM};
    use contracts::dashboards::d410_breakdowns::{
        AggregateRow, ConstraintSet, EventRecord, FilterState, Hierarchy, LevelSpec,
    };
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned responses per level key; records every request
    struct MockSource {
        responses: HashMap<String, Result<LevelData, DrillError>>,
        calls: RefCell<Vec<(String, ConstraintSet)>>,
    }

    #[async_trait(?Send)]
    impl LevelSource for MockSource {
        async fn fetch_level(
            &self,
            level: &LevelSpec,
            constraints: &ConstraintSet,
        ) -> Result<LevelData, DrillError> {
            self.calls
                .borrow_mut()
                .push((level.key.clone(), constraints.clone()));
            self.responses
                .get(&level.key)
                .cloned()
                .unwrap_or(Ok(LevelData::Aggregates(vec![])))
        }
    }

    fn spec(key: &str, terminal: bool) -> LevelSpec {
        LevelSpec {
            key: key.to_string(),
            title: key.to_string(),
            label_field: key.to_string(),
            endpoint: format!("/{key}"),
            terminal,
            limit: None,
        }
    }

    fn navigator() -> Navigator {
        Navigator::new(
            Hierarchy::new(vec![
                spec(KEY_EQUIPMENT, false),
                spec(KEY_CAUSE, false),
                spec(KEY_MECHANISM, false),
                spec("events", true),
            ])
            .unwrap(),
        )
    }

    fn aggregates(labels: &[&str]) -> Result<LevelData, DrillError> {
        Ok(LevelData::Aggregates(
            labels.iter().map(|l| AggregateRow::new(*l, 1.0, 1)).collect(),
        ))
    }

    #[test]
    fn test_skip_is_followed_without_interaction() {
        let source = MockSource {
            responses: HashMap::from([
                (KEY_EQUIPMENT.to_string(), aggregates(&["Mixer-12"])),
                (KEY_CAUSE.to_string(), aggregates(&["", ""])),
                (KEY_MECHANISM.to_string(), aggregates(&["Bearing"])),
            ]),
            calls: RefCell::new(Vec::new()),
        };
        let nav = RefCell::new(navigator());

        let root = nav.borrow_mut().open_root(FilterState::default());
        let outcome = block_on(run_ticket(&source, root, |t, r| nav.borrow_mut().apply(t, r)));
        assert!(matches!(outcome, Applied::Rendered(_)));

        let ticket = nav.borrow_mut().drill("Mixer-12").unwrap();
        let outcome = block_on(run_ticket(&source, ticket, |t, r| nav.borrow_mut().apply(t, r)));
        match outcome {
            Applied::Rendered(view) => assert_eq!(view.key, KEY_MECHANISM),
            other => panic!("expected mechanisms, got {:?}", other),
        }
        assert_eq!(nav.borrow().state(), NavState::Level(2));

        let calls = source.calls.borrow();
        let keys: Vec<_> = calls.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec![KEY_EQUIPMENT, KEY_CAUSE, KEY_MECHANISM]);
        assert_eq!(calls[2].1.get(KEY_CAUSE), Some(""));
    }

    #[test]
    fn test_consecutive_blank_levels_reach_events() {
        let source = MockSource {
            responses: HashMap::from([
                (KEY_EQUIPMENT.to_string(), aggregates(&["Mixer-12"])),
                (KEY_CAUSE.to_string(), aggregates(&[""])),
                (KEY_MECHANISM.to_string(), aggregates(&["", " "])),
                ("events".to_string(), Ok(LevelData::Events(vec![EventRecord::default()]))),
            ]),
            calls: RefCell::new(Vec::new()),
        };
        let nav = RefCell::new(navigator());

        let root = nav.borrow_mut().open_root(FilterState::default());
        block_on(run_ticket(&source, root, |t, r| nav.borrow_mut().apply(t, r)));
        let ticket = nav.borrow_mut().drill("Mixer-12").unwrap();
        let outcome = block_on(run_ticket(&source, ticket, |t, r| nav.borrow_mut().apply(t, r)));
        match outcome {
            Applied::Rendered(view) => {
                assert!(view.terminal);
                assert_eq!(view.data.len(), 1);
            }
            other => panic!("expected events, got {:?}", other),
        }
        assert_eq!(nav.borrow().state(), NavState::Level(3));
        assert!(!nav.borrow().is_pending());

        let calls = source.calls.borrow();
        let keys: Vec<_> = calls.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec![KEY_EQUIPMENT, KEY_CAUSE, KEY_MECHANISM, "events"]);
        let events = &calls[3].1;
        assert_eq!(events.get(KEY_EQUIPMENT), Some("Mixer-12"));
        assert_eq!(events.get(KEY_CAUSE), Some(""));
        assert_eq!(events.get(KEY_MECHANISM), Some(""));

        // neither skipped level is shown on the way back
        match nav.borrow_mut().back().unwrap() {
            Navigation::Show(view) => assert!(view.is_root()),
            other => panic!("expected cached root, got {:?}", other),
        };
    }

    #[test]
    fn test_failure_stops_the_loop() {
        let source = MockSource {
            responses: HashMap::from([(
                KEY_EQUIPMENT.to_string(),
                Err(DrillError::Network("HTTP 500".to_string())),
            )]),
            calls: RefCell::new(Vec::new()),
        };
        let nav = RefCell::new(navigator());
        let root = nav.borrow_mut().open_root(FilterState::default());
        let outcome = block_on(run_ticket(&source, root, |t, r| nav.borrow_mut().apply(t, r)));
        assert!(matches!(outcome, Applied::Failed(DrillError::Network(_))));
        assert_eq!(source.calls.borrow().len(), 1);
        assert_eq!(nav.borrow().state(), NavState::Closed);
    }
}
