//! The dispatch entry point for one action pipeline.

use crate::cancellation::CancellationBus;
use crate::collaborators::{ActorGateway, MovementService, QuestStateStore};
use crate::event::InteractionEvent;
use crate::handler::InteractionHandler;
use crate::registry::HandlerRegistry;
use crate::resolver::{EligibilityResolver, Resolution};
use crate::sequencer::{DispatchSequencer, PendingWalk};
use crate::settings::DispatchSettings;
use crate::stats::{DispatchStats, StatsSnapshot};
use crate::types::ActionKind;
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborators shared by every dispatcher of a server.
#[derive(Clone)]
pub struct DispatchServices {
    pub movement: Arc<dyn MovementService>,
    pub quests: Arc<dyn QuestStateStore>,
    pub actors: Arc<dyn ActorGateway>,
    pub cancellation: Arc<CancellationBus>,
}

impl DispatchServices {
    pub fn new(
        movement: Arc<dyn MovementService>,
        quests: Arc<dyn QuestStateStore>,
        actors: Arc<dyn ActorGateway>,
    ) -> Self {
        Self {
            movement,
            quests,
            actors,
            cancellation: Arc::new(CancellationBus::new()),
        }
    }
}

/// Terminal result of one dispatch call.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The actor was busy. Nothing ran and nothing was reported.
    Dropped,
    /// No handler answered; the actor was told so.
    Unhandled,
    /// Handlers were started.
    Dispatched {
        /// Immediate handlers already invoked
        immediate: usize,
        /// Walk-gated branch still in flight
        pending_walk: Option<PendingWalk>,
    },
}

impl DispatchOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, DispatchOutcome::Dropped)
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, DispatchOutcome::Unhandled)
    }

    /// Takes the walk-gated branch out of a dispatched outcome.
    pub fn into_pending_walk(self) -> Option<PendingWalk> {
        match self {
            DispatchOutcome::Dispatched { pending_walk, .. } => pending_walk,
            _ => None,
        }
    }
}

/// Registry, resolver and sequencer for a single [`ActionKind`].
pub struct InteractionDispatcher {
    kind: ActionKind,
    registry: HandlerRegistry,
    resolver: EligibilityResolver,
    sequencer: DispatchSequencer,
    actors: Arc<dyn ActorGateway>,
    settings: DispatchSettings,
    stats: Arc<DispatchStats>,
}

impl InteractionDispatcher {
    pub fn new(kind: ActionKind, services: DispatchServices, settings: DispatchSettings) -> Self {
        let stats = Arc::new(DispatchStats::new());
        Self {
            kind,
            registry: HandlerRegistry::new(),
            resolver: EligibilityResolver::new(services.quests, services.actors.clone()),
            sequencer: DispatchSequencer::new(
                services.movement,
                services.cancellation,
                stats.clone(),
                settings.isolate_handler_panics,
            ),
            actors: services.actors,
            settings,
            stats,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Atomically replaces this pipeline's handlers.
    pub fn set_handlers(&self, handlers: impl IntoIterator<Item = InteractionHandler>) {
        self.registry.set_handlers(handlers);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Resolves `event` against the current registry snapshot and starts the
    /// matching handlers.
    pub fn dispatch(&self, event: &InteractionEvent) -> DispatchOutcome {
        self.stats.record_received(1);
        let snapshot = self.registry.current_handlers();

        match self.resolver.resolve(event, &snapshot) {
            Resolution::Dropped => {
                debug!("Actor {} is busy, ignoring {} '{}'", event.actor, self.kind, event.option);
                self.stats.record_dropped(1);
                DispatchOutcome::Dropped
            }
            Resolution::Unhandled => {
                let message = event.unhandled_message();
                warn!("⚠️ {} (actor {})", message, event.actor);
                if self.settings.report_unhandled {
                    self.actors.send_diagnostic(event.actor, &message);
                }
                self.stats.record_unhandled(1);
                DispatchOutcome::Unhandled
            }
            Resolution::Eligible(handlers) => {
                debug!(
                    "Dispatching {} '{}' for {} to {} handler(s)",
                    self.kind,
                    event.option,
                    event.actor,
                    handlers.len()
                );
                self.stats.record_dispatched(1);
                let report = self.sequencer.sequence(event, handlers);
                DispatchOutcome::Dispatched {
                    immediate: report.immediate,
                    pending_walk: report.pending_walk,
                }
            }
        }
    }
}
