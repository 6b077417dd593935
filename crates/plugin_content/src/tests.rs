use crate::*;
use async_trait::async_trait;
use interaction_system::{
    ActionPipeline, ActorGateway, DispatchServices, DispatchSettings, InteractionEvent,
    MovementOutcome, MovementService, QuestStateStore, WalkOutcome,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Effect {
    Log(String, bool),
    Bank,
    Quest(String, String),
    Config(u32, i32),
    Took(ItemId),
}

/// Records every world operation; positions and ground items are fixed.
#[derive(Default)]
struct RecordingWorld {
    positions: Mutex<HashMap<ActorId, Position>>,
    ground: Mutex<Vec<(ItemId, Position)>>,
    effects: Mutex<Vec<Effect>>,
}

impl RecordingWorld {
    fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }
}

impl ContentWorld for RecordingWorld {
    fn position(&self, actor: ActorId) -> Option<Position> {
        self.positions.lock().unwrap().get(&actor).copied()
    }

    fn send_log_message(&self, _actor: ActorId, text: &str, is_console: bool) {
        self.effects.lock().unwrap().push(Effect::Log(text.to_string(), is_console));
    }

    fn open_bank(&self, _actor: ActorId) {
        self.effects.lock().unwrap().push(Effect::Bank);
    }

    fn set_quest_stage(&self, _actor: ActorId, quest_id: &str, stage: &str) {
        self.effects
            .lock()
            .unwrap()
            .push(Effect::Quest(quest_id.to_string(), stage.to_string()));
    }

    fn update_client_config(&self, _actor: ActorId, config_id: u32, value: i32) {
        self.effects.lock().unwrap().push(Effect::Config(config_id, value));
    }

    fn take_world_item(&self, _actor: ActorId, item_id: ItemId, position: Position) -> bool {
        let mut ground = self.ground.lock().unwrap();
        match ground.iter().position(|entry| *entry == (item_id, position)) {
            Some(index) => {
                ground.remove(index);
                self.effects.lock().unwrap().push(Effect::Took(item_id));
                true
            }
            None => false,
        }
    }
}

impl QuestStateStore for RecordingWorld {
    fn quest_stage(&self, _actor: ActorId, _quest_id: &str) -> Option<String> {
        None
    }
}

impl ActorGateway for RecordingWorld {
    fn is_busy(&self, _actor: ActorId) -> bool {
        false
    }

    fn send_diagnostic(&self, _actor: ActorId, _text: &str) {}
}

#[async_trait]
impl MovementService for RecordingWorld {
    async fn walk_to(&self, _actor: ActorId, _position: Position) -> MovementOutcome {
        MovementOutcome::Arrived
    }
}

fn loaded_pipeline(world: &Arc<RecordingWorld>) -> ActionPipeline {
    let services = DispatchServices::new(world.clone(), world.clone(), world.clone());
    let pipeline = ActionPipeline::new(services, DispatchSettings::default());
    let content: Arc<dyn ContentWorld> = world.clone();
    pipeline.load_plugins(stock_catalog(&content).unwrap());
    pipeline
}

#[test]
fn test_stock_catalog_contents() {
    let world: Arc<dyn ContentWorld> = Arc::new(RecordingWorld::default());
    let catalog = stock_catalog(&world).unwrap();

    let names: Vec<&str> = catalog.iter().map(|handler| handler.name()).collect();
    assert_eq!(
        names,
        vec!["bank-command", "current-position-command", "quest-reset-command", "pick-up-item"]
    );
    assert_eq!(catalog[1].options().len(), commands::POSITION_COMMANDS.len());
    assert!(catalog[3].walk_to());
}

#[tokio::test]
async fn test_bank_command_opens_bank() {
    let world = Arc::new(RecordingWorld::default());
    let pipeline = loaded_pipeline(&world);

    pipeline.call(&InteractionEvent::command(ActorId::new(), "bank", Vec::<String>::new(), false));
    assert_eq!(world.effects(), vec![Effect::Bank]);
}

#[tokio::test]
async fn test_every_position_alias_reports_coordinates() {
    let world = Arc::new(RecordingWorld::default());
    let actor = ActorId::new();
    world
        .positions
        .lock()
        .unwrap()
        .insert(actor, Position::new(3222, 3218, 0));
    let pipeline = loaded_pipeline(&world);

    for alias in commands::POSITION_COMMANDS {
        pipeline.call(&InteractionEvent::command(actor, alias, Vec::<String>::new(), true));
    }
    pipeline.call(&InteractionEvent::command(actor, "pos", Vec::<String>::new(), false));

    let effects = world.effects();
    assert_eq!(effects.len(), commands::POSITION_COMMANDS.len() + 1);
    assert_eq!(effects[0], Effect::Log("@[ 3222, 3218, 0 ]".to_string(), true));
    assert_eq!(
        effects.last(),
        Some(&Effect::Log("@[ 3222, 3218, 0 ]".to_string(), false))
    );
}

#[tokio::test]
async fn test_reset_quests() {
    let world = Arc::new(RecordingWorld::default());
    let pipeline = loaded_pipeline(&world);

    pipeline.call(&InteractionEvent::command(ActorId::new(), "resetquests", Vec::<String>::new(), false));
    assert_eq!(
        world.effects(),
        vec![
            Effect::Quest("cooksAssistant".to_string(), "COLLECTING".to_string()),
            Effect::Config(commands::QUEST_POINTS_CONFIG, 1000),
        ]
    );
}

#[tokio::test]
async fn test_pick_up_takes_item_after_walking() {
    let world = Arc::new(RecordingWorld::default());
    let spot = Position::new(3205, 3210, 0);
    world.ground.lock().unwrap().push((995, spot));
    let pipeline = loaded_pipeline(&world);

    let actor = ActorId::new();
    let walk = pipeline
        .call(&InteractionEvent::world_item(actor, 995, spot, items::PICK_UP_OPTION))
        .into_pending_walk()
        .unwrap();
    assert!(world.effects().is_empty());

    assert_eq!(walk.outcome().await, WalkOutcome::HandlersRun(1));
    assert_eq!(world.effects(), vec![Effect::Took(995)]);

    // Already taken: the handler still runs but nothing changes hands.
    let walk = pipeline
        .call(&InteractionEvent::world_item(actor, 995, spot, items::PICK_UP_OPTION))
        .into_pending_walk()
        .unwrap();
    assert_eq!(walk.outcome().await, WalkOutcome::HandlersRun(1));
    assert_eq!(world.effects(), vec![Effect::Took(995)]);
}
