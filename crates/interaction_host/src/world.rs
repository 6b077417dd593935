//! In-memory game world backing the console host.
//!
//! Implements every collaborator the dispatch pipeline and the stock content
//! plugins need. Walking is simulated with a per-tile delay; walks across
//! levels or beyond the configured distance fail.

use crate::config::WorldSettings;
use async_trait::async_trait;
use dashmap::DashMap;
use interaction_system::intake::INVENTORY_SIZE;
use interaction_system::{
    ActorGateway, ActorId, ItemId, MovementOutcome, MovementService, Position, QuestStateStore,
};
use plugin_content::ContentWorld;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Everything the world tracks about one player.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub position: Position,
    pub busy: bool,
    pub inventory: Vec<Option<ItemId>>,
    pub quests: HashMap<String, String>,
    pub client_config: HashMap<u32, i32>,
    pub bank_open: bool,
    /// Lines shown to the player, oldest first
    pub messages: Vec<String>,
    walk_sequence: u64,
}

pub struct InMemoryWorld {
    settings: WorldSettings,
    players: DashMap<ActorId, PlayerState>,
    ground_items: DashMap<Position, Vec<ItemId>>,
}

impl InMemoryWorld {
    pub fn new(settings: WorldSettings) -> Self {
        let ground_items: DashMap<Position, Vec<ItemId>> = DashMap::new();
        for item in &settings.ground_items {
            ground_items.entry(item.position).or_default().push(item.item_id);
        }
        Self {
            settings,
            players: DashMap::new(),
            ground_items,
        }
    }

    /// Adds a player at the spawn tile with the starting inventory.
    pub fn spawn_player(&self) -> ActorId {
        let actor = ActorId::new();
        let mut inventory = vec![None; INVENTORY_SIZE];
        for (slot, item_id) in self.settings.starting_inventory.iter().take(INVENTORY_SIZE).enumerate() {
            inventory[slot] = Some(*item_id);
        }
        self.players.insert(
            actor,
            PlayerState {
                position: self.settings.spawn,
                inventory,
                ..PlayerState::default()
            },
        );
        info!("🧍 Player {} spawned at {}", actor, self.settings.spawn);
        actor
    }

    pub fn remove_player(&self, actor: ActorId) {
        if self.players.remove(&actor).is_some() {
            info!("👋 Player {} left the world", actor);
        }
    }

    /// Copy of the player's state.
    pub fn player(&self, actor: ActorId) -> Option<PlayerState> {
        self.players.get(&actor).map(|player| player.clone())
    }

    pub fn inventory(&self, actor: ActorId) -> Option<Vec<Option<ItemId>>> {
        self.players.get(&actor).map(|player| player.inventory.clone())
    }

    pub fn set_busy(&self, actor: ActorId, busy: bool) {
        if let Some(mut player) = self.players.get_mut(&actor) {
            player.busy = busy;
        }
    }

    pub fn ground_items_at(&self, position: Position) -> Vec<ItemId> {
        self.ground_items
            .get(&position)
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    pub fn place_ground_item(&self, item_id: ItemId, position: Position) {
        self.ground_items.entry(position).or_default().push(item_id);
    }

    fn show(&self, actor: ActorId, text: &str) {
        if let Some(mut player) = self.players.get_mut(&actor) {
            player.messages.push(text.to_string());
        }
    }
}

impl ActorGateway for InMemoryWorld {
    fn is_busy(&self, actor: ActorId) -> bool {
        self.players.get(&actor).is_some_and(|player| player.busy)
    }

    fn send_diagnostic(&self, actor: ActorId, text: &str) {
        info!("💬 {}", text);
        self.show(actor, text);
    }
}

impl QuestStateStore for InMemoryWorld {
    fn quest_stage(&self, actor: ActorId, quest_id: &str) -> Option<String> {
        self.players
            .get(&actor)
            .and_then(|player| player.quests.get(quest_id).cloned())
    }
}

#[async_trait]
impl MovementService for InMemoryWorld {
    async fn walk_to(&self, actor: ActorId, position: Position) -> MovementOutcome {
        let (start, sequence) = match self.players.get_mut(&actor) {
            Some(mut player) => {
                player.walk_sequence += 1;
                (player.position, player.walk_sequence)
            }
            None => return MovementOutcome::Failed,
        };

        let distance = match start.tile_distance(&position) {
            Some(distance) if distance <= self.settings.max_walk_distance => distance,
            _ => {
                debug!("No path for {} from {} to {}", actor, start, position);
                return MovementOutcome::Failed;
            }
        };

        if distance > 0 && self.settings.walk_tile_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.walk_tile_ms * u64::from(distance))).await;
        }

        match self.players.get_mut(&actor) {
            Some(mut player) if player.walk_sequence == sequence => {
                player.position = position;
                MovementOutcome::Arrived
            }
            _ => MovementOutcome::Interrupted,
        }
    }
}

impl ContentWorld for InMemoryWorld {
    fn position(&self, actor: ActorId) -> Option<Position> {
        self.players.get(&actor).map(|player| player.position)
    }

    fn send_log_message(&self, actor: ActorId, text: &str, is_console: bool) {
        if is_console {
            info!("🖥️ {}", text);
        } else {
            info!("💬 {}", text);
        }
        self.show(actor, text);
    }

    fn open_bank(&self, actor: ActorId) {
        if let Some(mut player) = self.players.get_mut(&actor) {
            player.bank_open = true;
            info!("🏦 Bank opened for {}", actor);
        }
    }

    fn set_quest_stage(&self, actor: ActorId, quest_id: &str, stage: &str) {
        if let Some(mut player) = self.players.get_mut(&actor) {
            player.quests.insert(quest_id.to_string(), stage.to_string());
            info!("📜 Quest {} set to {} for {}", quest_id, stage, actor);
        }
    }

    fn update_client_config(&self, actor: ActorId, config_id: u32, value: i32) {
        if let Some(mut player) = self.players.get_mut(&actor) {
            player.client_config.insert(config_id, value);
            debug!("Client config {} = {} for {}", config_id, value, actor);
        }
    }

    fn take_world_item(&self, actor: ActorId, item_id: ItemId, position: Position) -> bool {
        // Lock order: player, then ground.
        let Some(mut player) = self.players.get_mut(&actor) else {
            return false;
        };
        let Some(slot) = player.inventory.iter().position(Option::is_none) else {
            debug!("Inventory full for {}", actor);
            return false;
        };

        let taken = match self.ground_items.get_mut(&position) {
            Some(mut items) => match items.iter().position(|id| *id == item_id) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        if !taken {
            return false;
        }

        player.inventory[slot] = Some(item_id);
        drop(player);
        self.ground_items.remove_if(&position, |_, items| items.is_empty());
        info!("🎒 {} picked up item {} into slot {}", actor, item_id, slot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroundItemSettings;

    fn settings() -> WorldSettings {
        WorldSettings {
            spawn: Position::new(3222, 3218, 0),
            walk_tile_ms: 0,
            max_walk_distance: 10,
            starting_inventory: vec![1929, 1933],
            ground_items: vec![GroundItemSettings {
                item_id: 995,
                position: Position::new(3224, 3218, 0),
            }],
        }
    }

    #[test]
    fn test_spawned_player_state() {
        let world = InMemoryWorld::new(settings());
        let actor = world.spawn_player();

        let player = world.player(actor).unwrap();
        assert_eq!(player.position, Position::new(3222, 3218, 0));
        assert_eq!(player.inventory.len(), INVENTORY_SIZE);
        assert_eq!(player.inventory[0], Some(1929));
        assert_eq!(player.inventory[1], Some(1933));
        assert_eq!(player.inventory[2], None);
        assert!(!world.is_busy(actor));

        world.set_busy(actor, true);
        assert!(world.is_busy(actor));

        world.remove_player(actor);
        assert!(world.player(actor).is_none());
        assert!(!world.is_busy(actor));
    }

    #[tokio::test]
    async fn test_walks_within_range_arrive() {
        let world = InMemoryWorld::new(settings());
        let actor = world.spawn_player();
        let destination = Position::new(3230, 3220, 0);

        assert_eq!(world.walk_to(actor, destination).await, MovementOutcome::Arrived);
        assert_eq!(world.position(actor), Some(destination));
    }

    #[tokio::test]
    async fn test_unreachable_walks_fail() {
        let world = InMemoryWorld::new(settings());
        let actor = world.spawn_player();

        let far = Position::new(3300, 3218, 0);
        assert_eq!(world.walk_to(actor, far).await, MovementOutcome::Failed);
        let upstairs = Position::new(3222, 3218, 1);
        assert_eq!(world.walk_to(actor, upstairs).await, MovementOutcome::Failed);
        assert_eq!(world.walk_to(ActorId::new(), far).await, MovementOutcome::Failed);

        assert_eq!(world.position(actor), Some(Position::new(3222, 3218, 0)));
    }

    #[tokio::test]
    async fn test_newer_walk_interrupts_older_one() {
        let mut slow = settings();
        slow.walk_tile_ms = 20;
        let world = std::sync::Arc::new(InMemoryWorld::new(slow));
        let actor = world.spawn_player();

        let first = {
            let world = world.clone();
            tokio::spawn(async move { world.walk_to(actor, Position::new(3227, 3218, 0)).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = world.walk_to(actor, Position::new(3223, 3218, 0)).await;

        assert_eq!(second, MovementOutcome::Arrived);
        assert_eq!(first.await.unwrap(), MovementOutcome::Interrupted);
        assert_eq!(world.position(actor), Some(Position::new(3223, 3218, 0)));
    }

    #[test]
    fn test_take_world_item() {
        let world = InMemoryWorld::new(settings());
        let actor = world.spawn_player();
        let spot = Position::new(3224, 3218, 0);

        assert!(world.take_world_item(actor, 995, spot));
        assert_eq!(world.inventory(actor).unwrap()[2], Some(995));
        assert!(world.ground_items_at(spot).is_empty());

        assert!(!world.take_world_item(actor, 995, spot));
    }

    #[test]
    fn test_take_world_item_with_full_inventory() {
        let mut full = settings();
        full.starting_inventory = vec![1511; INVENTORY_SIZE];
        let world = InMemoryWorld::new(full);
        let actor = world.spawn_player();
        let spot = Position::new(3224, 3218, 0);

        assert!(!world.take_world_item(actor, 995, spot));
        assert_eq!(world.ground_items_at(spot), vec![995]);
    }

    #[test]
    fn test_messages_and_quests() {
        let world = InMemoryWorld::new(settings());
        let actor = world.spawn_player();

        world.send_diagnostic(actor, "Unhandled object interaction: open 1530");
        world.send_log_message(actor, "@[ 3222, 3218, 0 ]", true);
        world.set_quest_stage(actor, "cooksAssistant", "COLLECTING");
        world.update_client_config(actor, 101, 1000);
        world.open_bank(actor);

        let player = world.player(actor).unwrap();
        assert_eq!(
            player.messages,
            vec!["Unhandled object interaction: open 1530", "@[ 3222, 3218, 0 ]"]
        );
        assert_eq!(world.quest_stage(actor, "cooksAssistant").as_deref(), Some("COLLECTING"));
        assert_eq!(player.client_config.get(&101), Some(&1000));
        assert!(player.bank_open);
    }
}
