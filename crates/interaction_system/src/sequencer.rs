//! Dispatch sequencing: cancellation, walk gating and handler invocation.
//!
//! For one resolved event the sequencer
//!
//! 1. broadcasts cancellation for the actor, superseding any walk still
//!    pending from an earlier interaction,
//! 2. runs the immediate handlers synchronously, in registry order,
//! 3. spawns one walk task shared by all walk-gated handlers. After the walk
//!    resolves the task re-checks its cancel token and only then runs the
//!    walk-gated handlers.
//!
//! The walk task is the only place a dispatch outlives the call that started
//! it. Callers may await it through [`PendingWalk`] or simply drop the handle.

use crate::cancellation::CancellationBus;
use crate::collaborators::{MovementOutcome, MovementService};
use crate::event::InteractionEvent;
use crate::handler::{InteractionContext, InteractionHandler};
use crate::stats::DispatchStats;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// How a walk-gated branch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkOutcome {
    /// The actor arrived and this many handlers were invoked.
    HandlersRun(usize),
    /// A newer interaction superseded this one; nothing was invoked.
    Cancelled,
    /// The walk did not arrive; nothing was invoked.
    MovementFailed(MovementOutcome),
    /// The target has no position to walk to; nothing was invoked.
    NoTargetPosition,
    /// The walk task was aborted or panicked.
    Aborted,
}

/// Handle to the walk-gated branch of a dispatch.
#[derive(Debug)]
pub struct PendingWalk {
    state: PendingState,
}

#[derive(Debug)]
enum PendingState {
    Resolved(WalkOutcome),
    Running(JoinHandle<WalkOutcome>),
}

impl PendingWalk {
    fn resolved(outcome: WalkOutcome) -> Self {
        Self {
            state: PendingState::Resolved(outcome),
        }
    }

    /// Waits for the walk and the handlers behind it.
    pub async fn outcome(self) -> WalkOutcome {
        match self.state {
            PendingState::Resolved(outcome) => outcome,
            PendingState::Running(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Walk-to task ended abnormally: {}", e);
                    WalkOutcome::Aborted
                }
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            PendingState::Resolved(_) => true,
            PendingState::Running(handle) => handle.is_finished(),
        }
    }
}

/// What the sequencer started for one event.
#[derive(Debug)]
pub struct SequenceReport {
    /// Number of immediate handlers invoked before returning
    pub immediate: usize,
    /// The walk-gated branch, if any handler needed one
    pub pending_walk: Option<PendingWalk>,
}

/// Orders cancellation, immediate handlers and the walk-gated branch.
pub struct DispatchSequencer {
    movement: Arc<dyn MovementService>,
    cancellation: Arc<CancellationBus>,
    stats: Arc<DispatchStats>,
    isolate_panics: bool,
}

impl DispatchSequencer {
    pub fn new(
        movement: Arc<dyn MovementService>,
        cancellation: Arc<CancellationBus>,
        stats: Arc<DispatchStats>,
        isolate_panics: bool,
    ) -> Self {
        Self {
            movement,
            cancellation,
            stats,
            isolate_panics,
        }
    }

    /// Runs the resolved `handlers` for `event`.
    pub fn sequence(
        &self,
        event: &InteractionEvent,
        handlers: Vec<Arc<InteractionHandler>>,
    ) -> SequenceReport {
        let token = self.cancellation.cancel(event.actor);
        let context = InteractionContext::from_event(event, token);

        let (walk_gated, immediate): (Vec<_>, Vec<_>) =
            handlers.into_iter().partition(|handler| handler.walk_to());

        for handler in &immediate {
            invoke_handler(handler, &context, self.isolate_panics, &self.stats);
        }
        self.stats.record_immediate(immediate.len() as u64);

        let pending_walk = if walk_gated.is_empty() {
            None
        } else {
            Some(self.spawn_walk(context, walk_gated))
        };

        SequenceReport {
            immediate: immediate.len(),
            pending_walk,
        }
    }

    fn spawn_walk(
        &self,
        context: InteractionContext,
        handlers: Vec<Arc<InteractionHandler>>,
    ) -> PendingWalk {
        let Some(position) = context.target.position() else {
            warn!(
                "Walk-to handlers registered for {} target without a position",
                context.kind
            );
            self.stats.record_walk_failed(1);
            return PendingWalk::resolved(WalkOutcome::NoTargetPosition);
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("Unable to complete walk-to action: no async runtime");
                self.stats.record_walk_failed(1);
                return PendingWalk::resolved(WalkOutcome::MovementFailed(MovementOutcome::Failed));
            }
        };

        self.stats.record_walk_requested(1);
        let movement = self.movement.clone();
        let stats = self.stats.clone();
        let isolate_panics = self.isolate_panics;

        let handle = runtime.spawn(async move {
            if context.is_cancelled() {
                debug!("Walk-to action for {} cancelled before moving", context.actor);
                stats.record_walk_cancelled(1);
                return WalkOutcome::Cancelled;
            }

            let outcome = movement.walk_to(context.actor, position).await;

            if context.is_cancelled() {
                debug!("Walk-to action for {} superseded ({:?})", context.actor, outcome);
                stats.record_walk_cancelled(1);
                return WalkOutcome::Cancelled;
            }

            if !outcome.arrived() {
                warn!(
                    "Unable to complete walk-to action for {} to {}: {:?}",
                    context.actor, position, outcome
                );
                stats.record_walk_failed(1);
                return WalkOutcome::MovementFailed(outcome);
            }

            for handler in &handlers {
                invoke_handler(handler, &context, isolate_panics, &stats);
            }
            stats.record_walk_gated(handlers.len() as u64);
            WalkOutcome::HandlersRun(handlers.len())
        });

        PendingWalk {
            state: PendingState::Running(handle),
        }
    }
}

/// Runs one handler action, optionally shielding the caller from a panic.
fn invoke_handler(
    handler: &InteractionHandler,
    context: &InteractionContext,
    isolate_panics: bool,
    stats: &DispatchStats,
) {
    if !isolate_panics {
        handler.invoke(context);
        return;
    }

    if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| handler.invoke(context))) {
        let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        error!(
            "❌ Handler '{}' panicked during {} '{}': {}",
            handler.name(),
            context.kind,
            context.option,
            message
        );
        stats.record_panic(1);
    }
}
