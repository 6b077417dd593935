//! Predicates deciding whether a handler applies to an event.
//!
//! The resolver ANDs all three; none of them has side effects.

use crate::collaborators::QuestStateStore;
use crate::handler::QuestRequirement;
use crate::types::{ActorId, ItemId};
use compact_str::CompactString;

/// True if the handler has no item filter, or the event's item is in it.
pub fn item_matches(item_ids: Option<&[ItemId]>, item_id: Option<ItemId>) -> bool {
    match item_ids {
        None => true,
        Some(ids) => item_id.is_some_and(|id| ids.contains(&id)),
    }
}

/// Case-sensitive membership of the chosen option.
pub fn option_matches(options: &[CompactString], option: &str) -> bool {
    options.iter().any(|candidate| *candidate == option)
}

/// True if the handler has no quest gate, or the actor satisfies it.
pub fn quest_eligible(
    quests: &dyn QuestStateStore,
    actor: ActorId,
    requirement: Option<&QuestRequirement>,
) -> bool {
    match requirement {
        None => true,
        Some(requirement) => quests.satisfies(actor, requirement),
    }
}
