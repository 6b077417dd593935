//! Per-actor action cancellation.
//!
//! Each actor owns a single cancellation channel holding a monotonically
//! increasing epoch. Starting a new interaction bumps the epoch, which
//! cancels every [`CancelToken`] handed out before it. Sequences check their
//! token right before running a continuation and become no-ops once it has
//! been superseded.

use crate::types::ActorId;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Process-wide registry of per-actor cancellation channels.
#[derive(Debug, Default)]
pub struct CancellationBus {
    channels: DashMap<ActorId, Arc<AtomicU64>>,
}

impl CancellationBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, actor: ActorId) -> Arc<AtomicU64> {
        self.channels
            .entry(actor)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Broadcasts cancellation to every pending sequence of `actor` and
    /// returns the token for the sequence that is starting now.
    pub fn cancel(&self, actor: ActorId) -> CancelToken {
        let channel = self.channel(actor);
        let epoch = channel.fetch_add(1, Ordering::AcqRel) + 1;
        trace!("Cancellation broadcast for {} (epoch {})", actor, epoch);
        CancelToken {
            actor,
            epoch,
            channel,
        }
    }

    /// Returns a token bound to the actor's current epoch without cancelling
    /// anything.
    pub fn token(&self, actor: ActorId) -> CancelToken {
        let channel = self.channel(actor);
        let epoch = channel.load(Ordering::Acquire);
        CancelToken {
            actor,
            epoch,
            channel,
        }
    }

    /// Drops the actor's channel, cancelling anything still pending for it.
    pub fn forget(&self, actor: ActorId) {
        if let Some((_, channel)) = self.channels.remove(&actor) {
            channel.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Number of actors that currently own a channel.
    pub fn tracked_actors(&self) -> usize {
        self.channels.len()
    }
}

/// Observer handle for one action sequence of one actor.
#[derive(Debug, Clone)]
pub struct CancelToken {
    actor: ActorId,
    epoch: u64,
    channel: Arc<AtomicU64>,
}

impl CancelToken {
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// True once a newer interaction has been started for the same actor.
    pub fn is_cancelled(&self) -> bool {
        self.channel.load(Ordering::Acquire) != self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_cancel_supersedes_older_token() {
        let bus = CancellationBus::new();
        let actor = ActorId::new();

        let first = bus.cancel(actor);
        assert!(!first.is_cancelled());

        let second = bus.cancel(actor);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_actors_are_independent() {
        let bus = CancellationBus::new();
        let alice = ActorId::new();
        let bob = ActorId::new();

        let alice_token = bus.cancel(alice);
        let _bob_token = bus.cancel(bob);
        assert!(!alice_token.is_cancelled());
        assert_eq!(bus.tracked_actors(), 2);
    }

    #[test]
    fn test_observer_token_does_not_cancel() {
        let bus = CancellationBus::new();
        let actor = ActorId::new();

        let pending = bus.cancel(actor);
        let observer = bus.token(actor);
        assert!(!pending.is_cancelled());
        assert!(!observer.is_cancelled());

        bus.cancel(actor);
        assert!(observer.is_cancelled());
    }

    #[test]
    fn test_forget_cancels_pending_tokens() {
        let bus = CancellationBus::new();
        let actor = ActorId::new();

        let pending = bus.cancel(actor);
        bus.forget(actor);
        assert!(pending.is_cancelled());
        assert_eq!(bus.tracked_actors(), 0);
    }
}
