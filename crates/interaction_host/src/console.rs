//! Console input: parses typed lines and turns them into interaction events.
//!
//! Grammar:
//!
//! ```text
//! ::<command> [args...]                              chat command
//! /<command> [args...]                               developer console command
//! <option> item <id> <x> <y> [level]                 world item action
//! <option> object <id> <x> <y> [level]               object action
//! <option> npc <id> <x> <y> [level]                  npc action
//! use <slot>[:<item-id>] on <object-id> <x> <y> [level]
//! busy on|off
//! reload
//! stats
//! help
//! ```

use crate::world::InMemoryWorld;
use interaction_system::{
    validate_used_item, ActionPipeline, ActorId, DispatchOutcome, IntakeRejection,
    InteractionError, InteractionEvent, InventoryView, ItemId, ItemSource, NpcId, ObjectId,
    Position, StatsSnapshot,
};
use interaction_system::intake::{INVENTORY_CONTAINER_ID, INVENTORY_WIDGET_ID};
use plugin_content::ContentWorld;
use std::sync::Arc;
use tracing::info;

/// Help text printed by the `help` command.
pub const HELP: &str = "\
::<command> [args...]                  run a chat command (e.g. ::pos, ::bank)
/<command> [args...]                   run a console command
<option> item <id> <x> <y> [level]     act on a ground item (e.g. pick-up item 995 3224 3218)
<option> object <id> <x> <y> [level]   act on an object (e.g. open object 1530 3225 3218)
<option> npc <id> <x> <y> [level]      act on an npc
use <slot>[:<item>] on <object> <x> <y> [level]
busy on|off | reload | stats | help";

/// Errors for console input that never reached the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Expected {0}")]
    Expected(&'static str),

    #[error("Invalid {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unrecognised input: {0}")]
    Unrecognised(String),

    #[error("Item rejected: {0}")]
    Rejected(#[from] IntakeRejection),

    #[error("Reload failed: {0}")]
    Reload(#[from] InteractionError),

    #[error("Player is not in the world")]
    NoPlayer,
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Command {
        name: String,
        arguments: Vec<String>,
        is_console: bool,
    },
    WorldItem {
        option: String,
        item_id: ItemId,
        position: Position,
    },
    Object {
        option: String,
        object_id: ObjectId,
        position: Position,
    },
    Npc {
        option: String,
        npc_id: NpcId,
        position: Position,
    },
    UseItem {
        slot: i32,
        claimed: Option<ItemId>,
        object_id: ObjectId,
        position: Position,
    },
    Busy(bool),
    Reload,
    Stats,
    Help,
}

fn number<T: std::str::FromStr>(tokens: &[&str], index: usize, field: &'static str) -> Result<T, ConsoleError> {
    let token = tokens.get(index).ok_or(ConsoleError::Expected(field))?;
    token.parse().map_err(|_| ConsoleError::InvalidNumber {
        field,
        value: token.to_string(),
    })
}

/// Parses `<x> <y> [level]` starting at `index`.
fn position(tokens: &[&str], index: usize) -> Result<Position, ConsoleError> {
    let x = number(tokens, index, "x coordinate")?;
    let y = number(tokens, index + 1, "y coordinate")?;
    let level = if tokens.len() > index + 2 {
        number(tokens, index + 2, "level")?
    } else {
        0
    };
    if tokens.len() > index + 3 {
        return Err(ConsoleError::Unrecognised(tokens[index + 3..].join(" ")));
    }
    Ok(Position::new(x, y, level))
}

/// Parses one line of console input. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    for (prefix, is_console) in [("::", false), ("/", true)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            let mut parts = rest.split_whitespace();
            let name = parts.next().ok_or(ConsoleError::Expected("command name"))?;
            return Ok(Some(ConsoleCommand::Command {
                name: name.to_string(),
                arguments: parts.map(str::to_string).collect(),
                is_console,
            }));
        }
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let command = match tokens.as_slice() {
        ["help"] => ConsoleCommand::Help,
        ["reload"] => ConsoleCommand::Reload,
        ["stats"] => ConsoleCommand::Stats,
        ["busy", "on"] => ConsoleCommand::Busy(true),
        ["busy", "off"] => ConsoleCommand::Busy(false),
        ["busy", ..] => return Err(ConsoleError::Expected("'on' or 'off'")),
        ["use", item, "on", ..] => {
            let (slot, claimed) = match item.split_once(':') {
                Some((slot, claimed)) => (slot, Some(claimed)),
                None => (*item, None),
            };
            let slot: i32 = slot.parse().map_err(|_| ConsoleError::InvalidNumber {
                field: "slot",
                value: slot.to_string(),
            })?;
            let claimed = claimed
                .map(|id| {
                    id.parse::<ItemId>().map_err(|_| ConsoleError::InvalidNumber {
                        field: "item id",
                        value: id.to_string(),
                    })
                })
                .transpose()?;
            ConsoleCommand::UseItem {
                slot,
                claimed,
                object_id: number(&tokens, 3, "object id")?,
                position: position(&tokens, 4)?,
            }
        }
        [option, "item", ..] => ConsoleCommand::WorldItem {
            option: option.to_string(),
            item_id: number(&tokens, 2, "item id")?,
            position: position(&tokens, 3)?,
        },
        [option, "object", ..] => ConsoleCommand::Object {
            option: option.to_string(),
            object_id: number(&tokens, 2, "object id")?,
            position: position(&tokens, 3)?,
        },
        [option, "npc", ..] => ConsoleCommand::Npc {
            option: option.to_string(),
            npc_id: number(&tokens, 2, "npc id")?,
            position: position(&tokens, 3)?,
        },
        _ => return Err(ConsoleError::Unrecognised(line.to_string())),
    };
    Ok(Some(command))
}

/// What handling a console line produced.
#[derive(Debug)]
pub enum ConsoleReply {
    Dispatched(DispatchOutcome),
    Busy(bool),
    Reloaded(usize),
    Stats(StatsSnapshot),
    Help,
}

/// Routes console input for one player into the action pipeline.
pub struct ConsoleRouter {
    actor: ActorId,
    world: Arc<InMemoryWorld>,
    pipeline: Arc<ActionPipeline>,
}

impl ConsoleRouter {
    pub fn new(actor: ActorId, world: Arc<InMemoryWorld>, pipeline: Arc<ActionPipeline>) -> Self {
        Self {
            actor,
            world,
            pipeline,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Parses and executes one line. Blank lines yield `Ok(None)`.
    pub fn handle_line(&self, line: &str) -> Result<Option<ConsoleReply>, ConsoleError> {
        match parse_line(line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    pub fn execute(&self, command: ConsoleCommand) -> Result<ConsoleReply, ConsoleError> {
        let actor = self.actor;
        let event = match command {
            ConsoleCommand::Command {
                name,
                arguments,
                is_console,
            } => InteractionEvent::command(actor, &name, arguments, is_console),
            ConsoleCommand::WorldItem {
                option,
                item_id,
                position,
            } => InteractionEvent::world_item(actor, item_id, position, &option),
            ConsoleCommand::Object {
                option,
                object_id,
                position,
            } => InteractionEvent::object(actor, object_id, position, &option),
            ConsoleCommand::Npc {
                option,
                npc_id,
                position,
            } => InteractionEvent::npc(actor, npc_id, position, &option),
            ConsoleCommand::UseItem {
                slot,
                claimed,
                object_id,
                position,
            } => {
                let inventory = self.world.inventory(actor).ok_or(ConsoleError::NoPlayer)?;
                let claimed = claimed.unwrap_or_else(|| {
                    usize::try_from(slot)
                        .ok()
                        .and_then(|slot| inventory.item_at(slot))
                        .unwrap_or_default()
                });
                let source = ItemSource {
                    widget_id: INVENTORY_WIDGET_ID,
                    container_id: INVENTORY_CONTAINER_ID,
                    slot,
                };
                let item = validate_used_item(&inventory, claimed, source)?;
                InteractionEvent::item_on_object(actor, object_id, position, item)
            }
            ConsoleCommand::Busy(busy) => {
                self.world.set_busy(actor, busy);
                return Ok(ConsoleReply::Busy(busy));
            }
            ConsoleCommand::Reload => return self.reload().map(ConsoleReply::Reloaded),
            ConsoleCommand::Stats => return Ok(ConsoleReply::Stats(self.pipeline.stats())),
            ConsoleCommand::Help => return Ok(ConsoleReply::Help),
        };

        Ok(ConsoleReply::Dispatched(self.pipeline.call(&event)))
    }

    /// Rebuilds the stock catalog and publishes it to every pipeline.
    pub fn reload(&self) -> Result<usize, ConsoleError> {
        let world: Arc<dyn ContentWorld> = self.world.clone();
        let catalog = plugin_content::stock_catalog(&world)?;
        self.pipeline.load_plugins(catalog);
        let count = self.pipeline.handler_count();
        info!("🔄 Reloaded {} interaction handler(s)", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("::pos").unwrap(),
            Some(ConsoleCommand::Command {
                name: "pos".to_string(),
                arguments: vec![],
                is_console: false,
            })
        );
        assert_eq!(
            parse_line("  /give 995 100 ").unwrap(),
            Some(ConsoleCommand::Command {
                name: "give".to_string(),
                arguments: vec!["995".to_string(), "100".to_string()],
                is_console: true,
            })
        );
        assert!(parse_line("::").is_err());
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            parse_line("pick-up item 995 3224 3218").unwrap(),
            Some(ConsoleCommand::WorldItem {
                option: "pick-up".to_string(),
                item_id: 995,
                position: Position::new(3224, 3218, 0),
            })
        );
        assert_eq!(
            parse_line("climb-up object 1738 3205 3209 1").unwrap(),
            Some(ConsoleCommand::Object {
                option: "climb-up".to_string(),
                object_id: 1738,
                position: Position::new(3205, 3209, 1),
            })
        );
        assert_eq!(
            parse_line("talk-to npc 4626 3208 3214").unwrap(),
            Some(ConsoleCommand::Npc {
                option: "talk-to".to_string(),
                npc_id: 4626,
                position: Position::new(3208, 3214, 0),
            })
        );
    }

    #[test]
    fn test_parse_use_item() {
        assert_eq!(
            parse_line("use 0 on 114 3209 3214").unwrap(),
            Some(ConsoleCommand::UseItem {
                slot: 0,
                claimed: None,
                object_id: 114,
                position: Position::new(3209, 3214, 0),
            })
        );
        assert_eq!(
            parse_line("use 3:1929 on 114 3209 3214").unwrap(),
            Some(ConsoleCommand::UseItem {
                slot: 3,
                claimed: Some(1929),
                object_id: 114,
                position: Position::new(3209, 3214, 0),
            })
        );
    }

    #[test]
    fn test_parse_controls() {
        assert_eq!(parse_line("busy on").unwrap(), Some(ConsoleCommand::Busy(true)));
        assert_eq!(parse_line("busy off").unwrap(), Some(ConsoleCommand::Busy(false)));
        assert_eq!(parse_line("reload").unwrap(), Some(ConsoleCommand::Reload));
        assert_eq!(parse_line("stats").unwrap(), Some(ConsoleCommand::Stats));
        assert_eq!(parse_line("help").unwrap(), Some(ConsoleCommand::Help));
        assert!(matches!(parse_line("busy maybe"), Err(ConsoleError::Expected(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_line("pick-up item coins 1 2"),
            Err(ConsoleError::InvalidNumber { field: "item id", .. })
        ));
        assert!(matches!(
            parse_line("open object 1530 3225"),
            Err(ConsoleError::Expected("y coordinate"))
        ));
        assert!(matches!(
            parse_line("open object 1530 1 2 0 extra"),
            Err(ConsoleError::Unrecognised(_))
        ));
        assert!(matches!(parse_line("dance wildly"), Err(ConsoleError::Unrecognised(_))));
        assert!(matches!(
            parse_line("use x on 114 1 2"),
            Err(ConsoleError::InvalidNumber { field: "slot", .. })
        ));
    }
}
