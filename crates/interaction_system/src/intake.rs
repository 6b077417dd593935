//! Upstream validation of item-based interaction requests.
//!
//! Decoders call [`validate_used_item`] before raising an item-on-object
//! event, so the dispatch core never has to re-check that the claimed slot
//! still holds the claimed item.

use crate::error::IntakeRejection;
use crate::event::{ItemSource, UsedItem};
use crate::types::ItemId;
use tracing::warn;

/// Client widget id of the player inventory.
pub const INVENTORY_WIDGET_ID: i32 = 149;

/// Container id of the player inventory within its widget.
pub const INVENTORY_CONTAINER_ID: i32 = 0;

/// Number of slots in the player inventory.
pub const INVENTORY_SIZE: usize = 28;

/// Read-only view of an actor's inventory.
pub trait InventoryView {
    /// Item id stored in `slot`, if any.
    fn item_at(&self, slot: usize) -> Option<ItemId>;
}

impl InventoryView for [Option<ItemId>] {
    fn item_at(&self, slot: usize) -> Option<ItemId> {
        self.get(slot).copied().flatten()
    }
}

impl InventoryView for Vec<Option<ItemId>> {
    fn item_at(&self, slot: usize) -> Option<ItemId> {
        self.as_slice().item_at(slot)
    }
}

/// Checks that the client's claimed item is really where it says it is.
///
/// Returns `Ok(Some(item))` for a verified inventory item and `Ok(None)` when
/// the item came from a widget this intake does not track; the interaction
/// still proceeds, just without item context.
pub fn validate_used_item<I: InventoryView + ?Sized>(
    inventory: &I,
    claimed_item_id: ItemId,
    source: ItemSource,
) -> Result<Option<UsedItem>, IntakeRejection> {
    if source.widget_id != INVENTORY_WIDGET_ID || source.container_id != INVENTORY_CONTAINER_ID {
        warn!(
            "Unhandled item on object case using widget {}:{}",
            source.widget_id, source.container_id
        );
        return Ok(None);
    }

    if source.slot < 0 || source.slot as usize >= INVENTORY_SIZE {
        return Err(IntakeRejection::SlotOutOfRange { slot: source.slot });
    }
    let slot = source.slot as usize;

    let actual = inventory
        .item_at(slot)
        .ok_or(IntakeRejection::EmptySlot { slot })?;

    if actual != claimed_item_id {
        return Err(IntakeRejection::ItemMismatch {
            slot,
            claimed: claimed_item_id,
            actual,
        });
    }

    Ok(Some(UsedItem {
        item_id: actual,
        source,
    }))
}
