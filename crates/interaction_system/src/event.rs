//! Interaction events raised by packet decoders and command routers.
//!
//! An [`InteractionEvent`] lives for exactly one dispatch cycle. Producers are
//! responsible for validating it (see [`crate::intake`]) before handing it to
//! the pipeline; the dispatch core trusts its contents.

use crate::types::{ActionKind, ActorId, InteractionTarget, ItemId, NpcId, ObjectId, Position};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Option string carried by item-on-object interactions.
pub const USE_OPTION: &str = "use";

/// Where a used item was taken from on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSource {
    pub widget_id: i32,
    pub container_id: i32,
    pub slot: i32,
}

/// An item the actor is using as part of the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedItem {
    pub item_id: ItemId,
    pub source: ItemSource,
}

/// A single player-initiated interaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// The actor performing the interaction
    pub actor: ActorId,
    /// Pipeline the event is routed through
    pub kind: ActionKind,
    /// What is being interacted with
    pub target: InteractionTarget,
    /// The option the actor picked, matched case-sensitively
    pub option: CompactString,
    /// Item context for item-based interactions
    pub item: Option<UsedItem>,
}

impl InteractionEvent {
    pub fn new(
        actor: ActorId,
        kind: ActionKind,
        target: InteractionTarget,
        option: impl Into<CompactString>,
    ) -> Self {
        Self {
            actor,
            kind,
            target,
            option: option.into(),
            item: None,
        }
    }

    /// An option picked on an item lying on the ground.
    pub fn world_item(actor: ActorId, item_id: ItemId, position: Position, option: &str) -> Self {
        Self::new(
            actor,
            ActionKind::WorldItem,
            InteractionTarget::WorldItem { item_id, position },
            option,
        )
    }

    /// An option picked on a location object.
    pub fn object(actor: ActorId, object_id: ObjectId, position: Position, option: &str) -> Self {
        Self::new(
            actor,
            ActionKind::Object,
            InteractionTarget::Object { object_id, position },
            option,
        )
    }

    /// An option picked on an NPC.
    pub fn npc(actor: ActorId, npc_id: NpcId, position: Position, option: &str) -> Self {
        Self::new(
            actor,
            ActionKind::Npc,
            InteractionTarget::Npc { npc_id, position },
            option,
        )
    }

    /// An item used on a location object. `item` is `None` when the item came
    /// from a container the intake does not track.
    pub fn item_on_object(
        actor: ActorId,
        object_id: ObjectId,
        position: Position,
        item: Option<UsedItem>,
    ) -> Self {
        let mut event = Self::new(
            actor,
            ActionKind::ItemOnObject,
            InteractionTarget::Object { object_id, position },
            USE_OPTION,
        );
        event.item = item;
        event
    }

    /// A typed command. The command name doubles as the option string.
    pub fn command<I, S>(actor: ActorId, command: &str, arguments: I, is_console: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self::new(
            actor,
            ActionKind::PlayerCommand,
            InteractionTarget::Command {
                arguments: arguments.into_iter().map(Into::into).collect(),
                is_console,
            },
            command,
        )
    }

    /// Attaches item context to the event.
    pub fn with_item(mut self, item: UsedItem) -> Self {
        self.item = Some(item);
        self
    }

    /// The item id handlers are matched against: the used item when there is
    /// one, otherwise the world item being targeted.
    pub fn item_id(&self) -> Option<ItemId> {
        if let Some(item) = &self.item {
            return Some(item.item_id);
        }
        match &self.target {
            InteractionTarget::WorldItem { item_id, .. } => Some(*item_id),
            _ => None,
        }
    }

    /// Diagnostic shown to the actor when no handler answers the event.
    pub fn unhandled_message(&self) -> String {
        match self.target.subject_id() {
            Some(subject) => format!(
                "Unhandled {} interaction: {} {}",
                self.kind.label(),
                self.option,
                subject
            ),
            None => format!("Unhandled {} interaction: {}", self.kind.label(), self.option),
        }
    }
}
