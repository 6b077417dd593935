//! Interfaces the dispatch core needs from the rest of the server.
//!
//! Movement, quest progress and actor state live outside this crate. The
//! dispatcher only ever talks to them through these traits, which keeps it
//! testable with in-memory fakes.

use crate::handler::QuestRequirement;
use crate::types::{ActorId, Position};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a single walk request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementOutcome {
    /// The actor reached the requested tile.
    Arrived,
    /// No path to the tile could be found.
    Failed,
    /// Something else moved the actor or stopped the walk.
    Interrupted,
}

impl MovementOutcome {
    pub fn arrived(&self) -> bool {
        matches!(self, MovementOutcome::Arrived)
    }
}

/// Pathfinding and walking.
#[async_trait]
pub trait MovementService: Send + Sync {
    /// Walks `actor` to `position`, resolving once the walk ends.
    async fn walk_to(&self, actor: ActorId, position: Position) -> MovementOutcome;
}

/// Read access to quest progress.
pub trait QuestStateStore: Send + Sync {
    /// The actor's current stage of `quest_id`, if the quest is known.
    fn quest_stage(&self, actor: ActorId, quest_id: &str) -> Option<String>;

    /// Whether the actor's quest progress satisfies `requirement`.
    fn satisfies(&self, actor: ActorId, requirement: &QuestRequirement) -> bool {
        self.quest_stage(actor, &requirement.quest_id)
            .is_some_and(|stage| stage == requirement.stage.as_str())
    }
}

/// Actor state and messaging.
pub trait ActorGateway: Send + Sync {
    /// Whether the actor is mid-action and must ignore new interactions.
    fn is_busy(&self, actor: ActorId) -> bool;

    /// Shows a diagnostic line to the actor.
    fn send_diagnostic(&self, actor: ActorId, text: &str);
}
