//! # Core Type Definitions
//!
//! Identifiers, positions and interaction targets shared by every part of the
//! dispatch pipeline.
//!
//! ## Key Types
//!
//! - [`ActorId`] - Unique identifier for the player or NPC performing an interaction
//! - [`Position`] - Tile position in the game world
//! - [`InteractionTarget`] - What the actor is interacting with
//! - [`ActionKind`] - Which action pipeline an interaction belongs to

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game cache identifier of an item definition.
pub type ItemId = u32;

/// Game cache identifier of a location object definition.
pub type ObjectId = u32;

/// Game cache identifier of an NPC definition.
pub type NpcId = u32;

/// Unique identifier for an actor (player or NPC) in the game world.
///
/// # Examples
///
/// ```rust
/// use interaction_system::ActorId;
///
/// let actor = ActorId::new();
/// let parsed: ActorId = actor.to_string().parse().unwrap();
/// assert_eq!(actor, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Creates a new random actor ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for ActorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tile position in the game world.
///
/// `level` is the height plane; actors can only walk between tiles on the
/// same level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub level: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, level: i32) -> Self {
        Self { x, y, level }
    }

    /// Chebyshev distance in tiles, or `None` when the positions are on
    /// different levels.
    pub fn tile_distance(&self, other: &Position) -> Option<u32> {
        if self.level != other.level {
            return None;
        }
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        Some(dx.max(dy))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.level)
    }
}

/// The action pipeline an interaction is routed through.
///
/// Every kind owns its own handler registry; the wire names match the action
/// types used by the packet decoders and plugin catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    WorldItem,
    ItemOnObject,
    Object,
    Npc,
    PlayerCommand,
}

impl ActionKind {
    /// Number of action kinds.
    pub const COUNT: usize = 5;

    pub const ALL: [ActionKind; Self::COUNT] = [
        ActionKind::WorldItem,
        ActionKind::ItemOnObject,
        ActionKind::Object,
        ActionKind::Npc,
        ActionKind::PlayerCommand,
    ];

    /// Position of the kind within [`ActionKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Stable action type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::WorldItem => "world_item_action",
            ActionKind::ItemOnObject => "item_on_object",
            ActionKind::Object => "object_action",
            ActionKind::Npc => "npc_action",
            ActionKind::PlayerCommand => "player_command",
        }
    }

    /// Human readable label used in diagnostics shown to the actor.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::WorldItem => "world item",
            ActionKind::ItemOnObject => "item on object",
            ActionKind::Object => "object",
            ActionKind::Npc => "npc",
            ActionKind::PlayerCommand => "command",
        }
    }

    /// Parses a stable action type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::str::FromStr for ActionKind {
    type Err = crate::error::InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::error::InteractionError::UnknownKind(s.to_string()))
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an actor is interacting with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionTarget {
    /// An item lying on the ground.
    WorldItem { item_id: ItemId, position: Position },
    /// A location object such as a door, bank booth or range.
    Object { object_id: ObjectId, position: Position },
    /// A non-player character.
    Npc { npc_id: NpcId, position: Position },
    /// A typed chat or console command. Commands have no world position.
    Command {
        arguments: Vec<CompactString>,
        is_console: bool,
    },
}

impl InteractionTarget {
    /// The tile the actor has to reach before walk-gated handlers run.
    pub fn position(&self) -> Option<Position> {
        match self {
            InteractionTarget::WorldItem { position, .. }
            | InteractionTarget::Object { position, .. }
            | InteractionTarget::Npc { position, .. } => Some(*position),
            InteractionTarget::Command { .. } => None,
        }
    }

    /// Identifier reported back to the actor when nothing handles an interaction.
    pub fn subject_id(&self) -> Option<u32> {
        match self {
            InteractionTarget::WorldItem { item_id, .. } => Some(*item_id),
            InteractionTarget::Object { object_id, .. } => Some(*object_id),
            InteractionTarget::Npc { npc_id, .. } => Some(*npc_id),
            InteractionTarget::Command { .. } => None,
        }
    }
}
