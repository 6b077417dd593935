//! Eligibility resolution: which handlers answer a given event.
//!
//! Resolution scans the whole registry snapshot, because several handlers may
//! legitimately answer the same event and all of them take part in
//! precedence. Quest-specific matches outrank generic ones: as soon as one
//! quest-gated handler matches, every generic match is discarded.

use crate::collaborators::{ActorGateway, QuestStateStore};
use crate::event::InteractionEvent;
use crate::handler::InteractionHandler;
use crate::matchers::{item_matches, option_matches, quest_eligible};
use std::sync::Arc;

/// What the resolver decided for one event.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The actor was busy; the event is ignored without any feedback.
    Dropped,
    /// Nothing answers the event.
    Unhandled,
    /// Handlers to run, in registry order. Never empty.
    Eligible(Vec<Arc<InteractionHandler>>),
}

/// Filters a registry snapshot down to the handlers that apply to an event.
pub struct EligibilityResolver {
    quests: Arc<dyn QuestStateStore>,
    actors: Arc<dyn ActorGateway>,
}

impl EligibilityResolver {
    pub fn new(quests: Arc<dyn QuestStateStore>, actors: Arc<dyn ActorGateway>) -> Self {
        Self { quests, actors }
    }

    pub fn resolve(&self, event: &InteractionEvent, handlers: &[Arc<InteractionHandler>]) -> Resolution {
        if self.actors.is_busy(event.actor) {
            return Resolution::Dropped;
        }

        let eligible = eligible_handlers(self.quests.as_ref(), event, handlers);
        if eligible.is_empty() {
            Resolution::Unhandled
        } else {
            Resolution::Eligible(eligible)
        }
    }
}

/// Applies the three matchers and the quest precedence rule.
pub fn eligible_handlers(
    quests: &dyn QuestStateStore,
    event: &InteractionEvent,
    handlers: &[Arc<InteractionHandler>],
) -> Vec<Arc<InteractionHandler>> {
    let item_id = event.item_id();

    let matching: Vec<Arc<InteractionHandler>> = handlers
        .iter()
        .filter(|handler| {
            item_matches(handler.item_ids(), item_id)
                && option_matches(handler.options(), &event.option)
                && quest_eligible(quests, event.actor, handler.quest_requirement())
        })
        .cloned()
        .collect();

    if matching.iter().any(|handler| handler.is_quest_specific()) {
        matching
            .into_iter()
            .filter(|handler| handler.is_quest_specific())
            .collect()
    } else {
        matching
    }
}
