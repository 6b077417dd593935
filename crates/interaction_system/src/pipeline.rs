//! Routing across action kinds.
//!
//! Every [`ActionKind`] has its own dispatcher and registry. All of them share
//! one set of collaborators and, importantly, one [`CancellationBus`]: opening
//! a door cancels a pending walk to pick up an item just like a second
//! pick-up would.

use crate::cancellation::CancellationBus;
use crate::dispatcher::{DispatchOutcome, DispatchServices, InteractionDispatcher};
use crate::event::InteractionEvent;
use crate::handler::InteractionHandler;
use crate::settings::DispatchSettings;
use crate::stats::StatsSnapshot;
use crate::types::{ActionKind, ActorId};
use std::sync::Arc;
use tracing::info;

/// One dispatcher per action kind, fed from a single plugin catalog.
pub struct ActionPipeline {
    dispatchers: [InteractionDispatcher; ActionKind::COUNT],
    cancellation: Arc<CancellationBus>,
}

impl ActionPipeline {
    pub fn new(services: DispatchServices, settings: DispatchSettings) -> Self {
        let cancellation = services.cancellation.clone();
        let dispatchers = ActionKind::ALL
            .map(|kind| InteractionDispatcher::new(kind, services.clone(), settings.clone()));
        Self {
            dispatchers,
            cancellation,
        }
    }

    /// The dispatcher serving `kind`.
    pub fn dispatcher(&self, kind: ActionKind) -> &InteractionDispatcher {
        &self.dispatchers[kind.index()]
    }

    /// Publishes a complete plugin catalog. Each kind's registry is replaced
    /// with the handlers of that kind; kinds with no handlers end up empty.
    pub fn load_plugins(&self, handlers: impl IntoIterator<Item = InteractionHandler>) {
        let mut by_kind: [Vec<InteractionHandler>; ActionKind::COUNT] = Default::default();
        for handler in handlers {
            by_kind[handler.kind().index()].push(handler);
        }

        let mut total = 0;
        for (dispatcher, handlers) in self.dispatchers.iter().zip(by_kind) {
            total += handlers.len();
            dispatcher.set_handlers(handlers);
        }
        info!("🎉 Plugin catalog loaded: {} interaction handler(s)", total);
    }

    /// Routes `event` to the dispatcher for its kind.
    pub fn call(&self, event: &InteractionEvent) -> DispatchOutcome {
        self.dispatcher(event.kind).dispatch(event)
    }

    /// Cancels anything pending for `actor` and releases its channel.
    pub fn forget_actor(&self, actor: ActorId) {
        self.cancellation.forget(actor);
    }

    pub fn cancellation(&self) -> &Arc<CancellationBus> {
        &self.cancellation
    }

    /// Total handlers across all kinds.
    pub fn handler_count(&self) -> usize {
        self.dispatchers.iter().map(|d| d.registry().len()).sum()
    }

    /// Counters summed over every kind.
    pub fn stats(&self) -> StatsSnapshot {
        self.dispatchers.iter().map(|d| d.stats()).sum()
    }
}
