//! Hot-swappable handler registry.
//!
//! The registry publishes immutable snapshots through [`ArcSwap`]. A reload
//! builds the complete replacement set first and swaps it in with a single
//! pointer store, so a dispatch that loaded the previous snapshot keeps
//! iterating it undisturbed.

use crate::handler::InteractionHandler;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::debug;

/// An immutable, ordered set of handlers.
pub type HandlerSnapshot = Arc<Vec<Arc<InteractionHandler>>>;

/// Ordered collection of interaction handlers for one action pipeline.
#[derive(Debug)]
pub struct HandlerRegistry {
    snapshot: ArcSwap<Vec<Arc<InteractionHandler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Creates a registry pre-loaded with `handlers`.
    pub fn with_handlers(handlers: impl IntoIterator<Item = InteractionHandler>) -> Self {
        let registry = Self::new();
        registry.set_handlers(handlers);
        registry
    }

    /// Atomically replaces the active handler set. Registration order is kept.
    pub fn set_handlers(&self, handlers: impl IntoIterator<Item = InteractionHandler>) {
        let handlers: Vec<Arc<InteractionHandler>> = handlers.into_iter().map(Arc::new).collect();
        let count = handlers.len();
        self.snapshot.store(Arc::new(handlers));
        debug!("Handler registry now holds {} handler(s)", count);
    }

    /// The currently active snapshot, for read-only iteration.
    pub fn current_handlers(&self) -> HandlerSnapshot {
        self.snapshot.load_full()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;

    fn handler(name: &str) -> InteractionHandler {
        InteractionHandler::builder(ActionKind::Object, name)
            .option("open")
            .action(|_| {})
            .build()
            .unwrap()
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.current_handlers().is_empty());
    }

    #[test]
    fn test_set_handlers_preserves_order() {
        let registry = HandlerRegistry::with_handlers([handler("a"), handler("b"), handler("c")]);
        let names: Vec<_> = registry
            .current_handlers()
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_replacement_leaves_held_snapshot_intact() {
        let registry = HandlerRegistry::with_handlers([handler("old")]);
        let held = registry.current_handlers();

        registry.set_handlers([handler("new-1"), handler("new-2")]);

        assert_eq!(held.len(), 1);
        assert_eq!(held[0].name(), "old");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.current_handlers()[0].name(), "new-1");
    }

    #[test]
    fn test_replacement_with_empty_set() {
        let registry = HandlerRegistry::with_handlers([handler("a")]);
        registry.set_handlers(Vec::new());
        assert!(registry.is_empty());
    }
}
