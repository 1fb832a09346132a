//! Event strategies: how each stream event folds into the aggregate.
//!
//! Every known [`StepTag`] has exactly one strategy. Dispatch is an
//! exhaustive match over [`StreamEvent`], so adding an event kind without a
//! strategy does not compile. Unknown tags arrive as `StreamEvent::Ignored`
//! and are skipped.

use crate::event::{StepTag, StreamEvent};
use crate::result::SearchResult;
use crate::session::{LocationMode, Notice, SearchIdentity, SessionSink};

/// Warning shown when a session finishes without an authoritative id.
pub const UNSAVED_SESSION_WARNING: &str =
    "This search finished without a server session id; it will not appear in your account history.";

/// Mutable view of a session handed to strategies.
pub struct StrategyContext<'a> {
    pub result: &'a mut SearchResult,
    pub identity: &'a mut SearchIdentity,
    pub sink: &'a dyn SessionSink,
}

/// What a strategy did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// Folded into the aggregate.
    Applied,
    /// Rejected by the aggregate; nothing changed.
    Dropped,
    /// Unknown step; nothing changed.
    Ignored,
    /// The terminal `Done` event.
    Done,
}

/// Folds decoded events into a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrategyRegistry;

impl StrategyRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Applies one event.
    pub fn process(&self, event: StreamEvent, ctx: &mut StrategyContext<'_>) -> StrategyOutcome {
        let tag = event.tag();
        match event {
            StreamEvent::ChatId(id) => apply_chat_id(id, ctx),
            StreamEvent::LogicStep(step) => ctx.result.push_logic_step(step),
            StreamEvent::HotKeys { bucket, keys } => ctx.result.replace_hot_keys(bucket, keys),
            StreamEvent::Competitor { index, competitor } => {
                if let Err(e) = ctx.result.upsert_competitor(index, competitor) {
                    tracing::warn!(error = %e, "Dropping competitor card");
                    return StrategyOutcome::Dropped;
                }
            }
            StreamEvent::Figure(figure) => ctx.result.upsert_figure(figure),
            StreamEvent::RequirementCard(card) => ctx.result.set_requirement_card(card),
            StreamEvent::FunctionList(entry) => ctx.result.merge_function_list(entry),
            StreamEvent::Done => {
                apply_done(ctx);
                return StrategyOutcome::Done;
            }
            StreamEvent::Ignored(raw) => {
                tracing::debug!(step = ?raw, "Ignoring unrecognised stream event");
                return StrategyOutcome::Ignored;
            }
        }

        if let Some(tag) = tag.filter(|t| *t != StepTag::ChatId) {
            ctx.sink.on_update(tag, ctx.result);
        }
        StrategyOutcome::Applied
    }
}

fn apply_chat_id(id: String, ctx: &mut StrategyContext<'_>) {
    if ctx.identity.adopt(id) {
        tracing::info!(
            search_id = ctx.identity.current(),
            provisional = ctx.identity.provisional(),
            "Adopted authoritative search id"
        );
    }
    ctx.sink
        .rewrite_location(ctx.identity.current(), LocationMode::InProgress);
}

fn apply_done(ctx: &mut StrategyContext<'_>) {
    if ctx.identity.is_authoritative() {
        ctx.sink
            .rewrite_location(ctx.identity.current(), LocationMode::Final);
    } else {
        ctx.sink.notify(Notice::warning(UNSAVED_SESSION_WARNING));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::model::split_step_message;
    use crate::result::{Competitor, HotKey, HotKeyBucket};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        updates: Mutex<Vec<StepTag>>,
        notices: Mutex<Vec<Notice>>,
        locations: Mutex<Vec<(String, LocationMode)>>,
    }

    impl SessionSink for RecordingSink {
        fn on_update(&self, tag: StepTag, _result: &SearchResult) {
            self.updates.lock().unwrap().push(tag);
        }

        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }

        fn rewrite_location(&self, search_id: &str, mode: LocationMode) {
            self.locations
                .lock()
                .unwrap()
                .push((search_id.to_string(), mode));
        }
    }

    fn run(
        events: Vec<StreamEvent>,
        identity: &mut SearchIdentity,
        sink: &RecordingSink,
    ) -> (SearchResult, bool) {
        let mut result = SearchResult::new();
        let registry = StrategyRegistry::new();
        let mut done = false;
        for event in events {
            let mut ctx = StrategyContext {
                result: &mut result,
                identity: &mut *identity,
                sink,
            };
            done = registry.process(event, &mut ctx) == StrategyOutcome::Done;
        }
        (result, done)
    }

    #[test]
    fn test_chat_id_rewrites_location() {
        let sink = RecordingSink::default();
        let mut identity = SearchIdentity::new("tmp");
        run(vec![StreamEvent::ChatId("S1".into())], &mut identity, &sink);

        assert_eq!(identity.current(), "S1");
        assert_eq!(
            *sink.locations.lock().unwrap(),
            vec![("S1".to_string(), LocationMode::InProgress)]
        );
        assert!(sink.updates.lock().unwrap().is_empty());
    }

    #[test]
    fn test_done_with_authoritative_id_finalizes_location() {
        let sink = RecordingSink::default();
        let mut identity = SearchIdentity::new("tmp");
        let (_, done) = run(
            vec![StreamEvent::ChatId("S1".into()), StreamEvent::Done],
            &mut identity,
            &sink,
        );

        assert!(done);
        assert!(sink.notices.lock().unwrap().is_empty());
        assert_eq!(
            sink.locations.lock().unwrap().last(),
            Some(&("S1".to_string(), LocationMode::Final))
        );
    }

    #[test]
    fn test_done_without_authoritative_id_warns() {
        let sink = RecordingSink::default();
        let mut identity = SearchIdentity::new("tmp");
        let (_, done) = run(vec![StreamEvent::Done], &mut identity, &sink);

        assert!(done);
        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, UNSAVED_SESSION_WARNING);
        assert!(sink.locations.lock().unwrap().is_empty());
    }

    #[test]
    fn test_slices_are_pushed_to_sink() {
        let sink = RecordingSink::default();
        let mut identity = SearchIdentity::new("tmp");
        let (result, done) = run(
            vec![
                StreamEvent::LogicStep(split_step_message("## One\nfirst")),
                StreamEvent::HotKeys {
                    bucket: HotKeyBucket::AllFields,
                    keys: vec![HotKey::new("crm", 1)],
                },
                StreamEvent::Competitor {
                    index: 1,
                    competitor: Competitor::default(),
                },
                StreamEvent::Ignored(Some("mystery".into())),
            ],
            &mut identity,
            &sink,
        );

        assert!(!done);
        assert_eq!(result.logic_steps.len(), 1);
        assert_eq!(result.hot_keys_data.all_fields.len(), 1);
        assert_eq!(result.competitor_count(), 1);
        assert_eq!(
            *sink.updates.lock().unwrap(),
            vec![StepTag::Step, StepTag::HotKeys, StepTag::MainCompetitors]
        );
    }

    #[test]
    fn test_hot_keys_bucket_replaced_wholesale() {
        let sink = RecordingSink::default();
        let mut identity = SearchIdentity::new("tmp");
        let (result, _) = run(
            vec![
                StreamEvent::HotKeys {
                    bucket: HotKeyBucket::MostRelevant,
                    keys: vec![HotKey::new("a", 1), HotKey::new("b", 2)],
                },
                StreamEvent::HotKeys {
                    bucket: HotKeyBucket::MostRelevant,
                    keys: vec![HotKey::new("c", 3)],
                },
            ],
            &mut identity,
            &sink,
        );
        assert_eq!(result.hot_keys_data.most_relevant, vec![HotKey::new("c", 3)]);
    }

    #[test]
    fn test_out_of_range_competitor_is_dropped() {
        let sink = RecordingSink::default();
        let mut identity = SearchIdentity::new("tmp");
        let mut result = SearchResult::new();
        let mut ctx = StrategyContext {
            result: &mut result,
            identity: &mut identity,
            sink: &sink,
        };

        let outcome = StrategyRegistry::new().process(
            StreamEvent::Competitor {
                index: 10_000,
                competitor: Competitor::default(),
            },
            &mut ctx,
        );

        assert_eq!(outcome, StrategyOutcome::Dropped);
        assert_eq!(result.competitor_count(), 0);
        assert!(sink.updates.lock().unwrap().is_empty());
    }
}
