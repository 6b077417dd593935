//! Ground item handling.

use crate::{ContentPlugin, ContentWorld};
use interaction_system::{ActionKind, InteractionError, InteractionHandler, InteractionTarget};
use std::sync::Arc;
use tracing::debug;

pub const PICK_UP_OPTION: &str = "pick-up";

/// Walks to a ground item and moves it into the inventory.
pub struct GroundItemsPlugin;

impl ContentPlugin for GroundItemsPlugin {
    fn name(&self) -> &str {
        "ground-items"
    }

    fn handlers(&self, world: &Arc<dyn ContentWorld>) -> Result<Vec<InteractionHandler>, InteractionError> {
        let world = world.clone();
        let pick_up = InteractionHandler::builder(ActionKind::WorldItem, "pick-up-item")
            .option(PICK_UP_OPTION)
            .walk_to(true)
            .action(move |ctx| {
                let InteractionTarget::WorldItem { item_id, position } = &ctx.target else {
                    return;
                };
                if ctx.is_cancelled() {
                    return;
                }
                if !world.take_world_item(ctx.actor, *item_id, *position) {
                    debug!("Item {} at {} could not be picked up by {}", item_id, position, ctx.actor);
                }
            })
            .build()?;

        Ok(vec![pick_up])
    }
}
