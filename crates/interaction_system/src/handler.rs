//! Interaction handler records.
//!
//! A handler is pure data plus a callback: which items and options it answers
//! to, an optional quest gate and whether the actor has to walk to the target
//! first. Handlers are immutable once built and are shared between registry
//! snapshots through `Arc`.

use crate::cancellation::CancelToken;
use crate::error::InteractionError;
use crate::event::{InteractionEvent, UsedItem};
use crate::types::{ActionKind, ActorId, InteractionTarget, ItemId};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Callback run when a handler fires. Fire-and-forget: the dispatcher does not
/// wait on or interpret anything the action does.
pub type ActionFn = Arc<dyn Fn(&InteractionContext) + Send + Sync>;

/// Quest gate on a handler: the actor must be at `stage` of `quest_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRequirement {
    pub quest_id: CompactString,
    pub stage: CompactString,
}

impl QuestRequirement {
    pub fn new(quest_id: impl Into<CompactString>, stage: impl Into<CompactString>) -> Self {
        Self {
            quest_id: quest_id.into(),
            stage: stage.into(),
        }
    }
}

/// Everything a handler's action gets to see about the interaction.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    pub actor: ActorId,
    pub kind: ActionKind,
    pub target: InteractionTarget,
    pub option: CompactString,
    pub item: Option<UsedItem>,
    /// Token of the dispatch that invoked this handler. Multi-step content
    /// checks it before each later step.
    pub cancel_token: CancelToken,
}

impl InteractionContext {
    pub(crate) fn from_event(event: &InteractionEvent, cancel_token: CancelToken) -> Self {
        Self {
            actor: event.actor,
            kind: event.kind,
            target: event.target.clone(),
            option: event.option.clone(),
            item: event.item,
            cancel_token,
        }
    }

    /// True once a newer interaction has superseded this one.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Command arguments, empty for non-command targets.
    pub fn arguments(&self) -> &[CompactString] {
        match &self.target {
            InteractionTarget::Command { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Whether a command was typed into the developer console rather than chat.
    pub fn is_console(&self) -> bool {
        matches!(
            self.target,
            InteractionTarget::Command {
                is_console: true,
                ..
            }
        )
    }
}

/// A registered interaction behaviour.
#[derive(Clone)]
pub struct InteractionHandler {
    name: CompactString,
    kind: ActionKind,
    item_ids: Option<SmallVec<[ItemId; 4]>>,
    options: SmallVec<[CompactString; 2]>,
    quest_requirement: Option<QuestRequirement>,
    walk_to: bool,
    action: ActionFn,
}

impl InteractionHandler {
    /// Starts building a handler for the given pipeline.
    pub fn builder(kind: ActionKind, name: impl Into<CompactString>) -> HandlerBuilder {
        HandlerBuilder {
            name: name.into(),
            kind,
            item_ids: None,
            options: SmallVec::new(),
            quest_requirement: None,
            walk_to: false,
            action: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// `None` means the handler applies regardless of item.
    pub fn item_ids(&self) -> Option<&[ItemId]> {
        self.item_ids.as_deref()
    }

    pub fn options(&self) -> &[CompactString] {
        &self.options
    }

    pub fn quest_requirement(&self) -> Option<&QuestRequirement> {
        self.quest_requirement.as_ref()
    }

    /// Quest-specific handlers outrank generic ones for the same event.
    pub fn is_quest_specific(&self) -> bool {
        self.quest_requirement.is_some()
    }

    pub fn walk_to(&self) -> bool {
        self.walk_to
    }

    pub(crate) fn invoke(&self, context: &InteractionContext) {
        (self.action)(context)
    }
}

impl std::fmt::Debug for InteractionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionHandler")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("item_ids", &self.item_ids)
            .field("options", &self.options)
            .field("quest_requirement", &self.quest_requirement)
            .field("walk_to", &self.walk_to)
            .finish_non_exhaustive()
    }
}

/// Builder for [`InteractionHandler`].
pub struct HandlerBuilder {
    name: CompactString,
    kind: ActionKind,
    item_ids: Option<SmallVec<[ItemId; 4]>>,
    options: SmallVec<[CompactString; 2]>,
    quest_requirement: Option<QuestRequirement>,
    walk_to: bool,
    action: Option<ActionFn>,
}

impl HandlerBuilder {
    /// Restricts the handler to a single item id. May be called repeatedly.
    pub fn item_id(mut self, item_id: ItemId) -> Self {
        self.item_ids.get_or_insert_with(SmallVec::new).push(item_id);
        self
    }

    /// Restricts the handler to the given item ids.
    pub fn item_ids(mut self, item_ids: impl IntoIterator<Item = ItemId>) -> Self {
        self.item_ids
            .get_or_insert_with(SmallVec::new)
            .extend(item_ids);
        self
    }

    /// Adds an option string the handler answers to.
    pub fn option(mut self, option: impl Into<CompactString>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Adds several option strings (command aliases, for instance).
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Gates the handler on a quest stage.
    pub fn quest(mut self, requirement: QuestRequirement) -> Self {
        self.quest_requirement = Some(requirement);
        self
    }

    /// Whether the actor walks to the target before the action runs.
    pub fn walk_to(mut self, walk_to: bool) -> Self {
        self.walk_to = walk_to;
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&InteractionContext) + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn build(self) -> Result<InteractionHandler, InteractionError> {
        if self.options.is_empty() {
            return Err(InteractionError::NoOptions(self.name.to_string()));
        }
        let action = self
            .action
            .ok_or_else(|| InteractionError::NoAction(self.name.to_string()))?;

        Ok(InteractionHandler {
            name: self.name,
            kind: self.kind,
            item_ids: self.item_ids,
            options: self.options,
            quest_requirement: self.quest_requirement,
            walk_to: self.walk_to,
            action,
        })
    }
}
