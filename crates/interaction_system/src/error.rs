//! Error types for the interaction system.
//!
//! Dispatch never fails: its outcomes are reported through
//! [`DispatchOutcome`](crate::DispatchOutcome). The errors here cover handler
//! construction, configuration and upstream intake validation.

use crate::types::ItemId;

/// Errors raised while building handlers or configuring the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    /// A handler was built without any option strings
    #[error("Handler '{0}' must answer to at least one option")]
    NoOptions(String),

    /// A handler was built without an action callback
    #[error("Handler '{0}' has no action")]
    NoAction(String),

    /// An action type name did not match any known kind
    #[error("Unknown action kind: {0}")]
    UnknownKind(String),
}

/// Reasons an item-based request is rejected before it becomes an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeRejection {
    /// The claimed inventory slot does not exist
    #[error("Inventory slot {slot} is out of range")]
    SlotOutOfRange { slot: i32 },

    /// The claimed inventory slot holds nothing
    #[error("Inventory slot {slot} is empty")]
    EmptySlot { slot: usize },

    /// The slot holds a different item than the client claimed
    #[error("Inventory slot {slot} holds item {actual}, not {claimed}")]
    ItemMismatch {
        slot: usize,
        claimed: ItemId,
        actual: ItemId,
    },
}
