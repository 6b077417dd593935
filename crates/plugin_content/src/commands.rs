//! Player commands.

use crate::{ContentPlugin, ContentWorld};
use interaction_system::{ActionKind, InteractionError, InteractionHandler};
use std::sync::Arc;
use tracing::debug;

/// Aliases answered by the position command.
pub const POSITION_COMMANDS: [&str; 8] = [
    "pos",
    "loc",
    "position",
    "location",
    "coords",
    "coordinates",
    "mypos",
    "myloc",
];

/// Client config holding the quest point total.
pub const QUEST_POINTS_CONFIG: u32 = 101;

const RESET_QUEST_ID: &str = "cooksAssistant";
const RESET_QUEST_STAGE: &str = "COLLECTING";
const RESET_QUEST_POINTS: i32 = 1000;

/// `bank`, position lookup and `resetquests`.
pub struct CommandsPlugin;

impl ContentPlugin for CommandsPlugin {
    fn name(&self) -> &str {
        "commands"
    }

    fn handlers(&self, world: &Arc<dyn ContentWorld>) -> Result<Vec<InteractionHandler>, InteractionError> {
        let bank = {
            let world = world.clone();
            InteractionHandler::builder(ActionKind::PlayerCommand, "bank-command")
                .option("bank")
                .action(move |ctx| world.open_bank(ctx.actor))
                .build()?
        };

        let position = {
            let world = world.clone();
            InteractionHandler::builder(ActionKind::PlayerCommand, "current-position-command")
                .options(POSITION_COMMANDS)
                .action(move |ctx| {
                    let Some(pos) = world.position(ctx.actor) else {
                        debug!("Position requested for {} who is not in the world", ctx.actor);
                        return;
                    };
                    let text = format!("@[ {}, {}, {} ]", pos.x, pos.y, pos.level);
                    world.send_log_message(ctx.actor, &text, ctx.is_console());
                })
                .build()?
        };

        let reset_quests = {
            let world = world.clone();
            InteractionHandler::builder(ActionKind::PlayerCommand, "quest-reset-command")
                .option("resetquests")
                .action(move |ctx| {
                    world.set_quest_stage(ctx.actor, RESET_QUEST_ID, RESET_QUEST_STAGE);
                    world.update_client_config(ctx.actor, QUEST_POINTS_CONFIG, RESET_QUEST_POINTS);
                })
                .build()?
        };

        Ok(vec![bank, position, reset_quests])
    }
}
