//! # Stock Content Plugins
//!
//! Ready-made interaction handlers bound to a [`ContentWorld`]. The host hands
//! [`stock_catalog`] to [`ActionPipeline::load_plugins`] at startup and again on
//! every reload.
//!
//! [`ActionPipeline::load_plugins`]: interaction_system::ActionPipeline::load_plugins

use interaction_system::{ActorId, InteractionError, InteractionHandler, ItemId, Position};
use std::sync::Arc;
use tracing::info;

pub mod commands;
pub mod items;

#[cfg(test)]
mod tests;

pub use commands::CommandsPlugin;
pub use items::GroundItemsPlugin;

/// World operations content handlers are allowed to perform.
pub trait ContentWorld: Send + Sync {
    /// Current tile of the actor, if it is in the world.
    fn position(&self, actor: ActorId) -> Option<Position>;

    /// Prints a line to the actor's chat box, or to the developer console when
    /// `is_console` is set.
    fn send_log_message(&self, actor: ActorId, text: &str, is_console: bool);

    fn open_bank(&self, actor: ActorId);

    fn set_quest_stage(&self, actor: ActorId, quest_id: &str, stage: &str);

    /// Pushes a client config (varp) value.
    fn update_client_config(&self, actor: ActorId, config_id: u32, value: i32);

    /// Moves a ground item into the actor's inventory. Returns false when the
    /// item is no longer there or the inventory is full.
    fn take_world_item(&self, actor: ActorId, item_id: ItemId, position: Position) -> bool;
}

/// A bundle of handlers published together.
pub trait ContentPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn handlers(&self, world: &Arc<dyn ContentWorld>) -> Result<Vec<InteractionHandler>, InteractionError>;
}

/// Every stock plugin, in load order.
pub fn stock_plugins() -> Vec<Box<dyn ContentPlugin>> {
    vec![Box::new(CommandsPlugin), Box::new(GroundItemsPlugin)]
}

/// Builds the complete handler catalog of `plugins`.
pub fn build_catalog(
    plugins: &[Box<dyn ContentPlugin>],
    world: &Arc<dyn ContentWorld>,
) -> Result<Vec<InteractionHandler>, InteractionError> {
    let mut catalog = Vec::new();
    for plugin in plugins {
        let handlers = plugin.handlers(world)?;
        info!("🔌 Plugin '{}' provided {} handler(s)", plugin.name(), handlers.len());
        catalog.extend(handlers);
    }
    Ok(catalog)
}

/// Builds the catalog of [`stock_plugins`].
pub fn stock_catalog(world: &Arc<dyn ContentWorld>) -> Result<Vec<InteractionHandler>, InteractionError> {
    build_catalog(&stock_plugins(), world)
}
