//! Dispatch counters for monitoring.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated lock-free by dispatches and walk tasks.
#[derive(Debug, Default)]
pub struct DispatchStats {
    events_received: AtomicU64,
    dropped_busy: AtomicU64,
    unhandled: AtomicU64,
    dispatched: AtomicU64,
    immediate_invoked: AtomicU64,
    walks_requested: AtomicU64,
    walk_gated_invoked: AtomicU64,
    walks_cancelled: AtomicU64,
    walks_failed: AtomicU64,
    handler_panics: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub events_received: u64,
    pub dropped_busy: u64,
    pub unhandled: u64,
    pub dispatched: u64,
    pub immediate_invoked: u64,
    pub walks_requested: u64,
    pub walk_gated_invoked: u64,
    pub walks_cancelled: u64,
    pub walks_failed: u64,
    pub handler_panics: u64,
}

macro_rules! counters {
    ($($field:ident => $record:ident),* $(,)?) => {
        impl DispatchStats {
            $(
                pub(crate) fn $record(&self, n: u64) {
                    self.$field.fetch_add(n, Ordering::Relaxed);
                }
            )*

            pub fn snapshot(&self) -> StatsSnapshot {
                StatsSnapshot {
                    $($field: self.$field.load(Ordering::Relaxed),)*
                }
            }
        }

        impl std::ops::Add for StatsSnapshot {
            type Output = StatsSnapshot;

            fn add(self, other: StatsSnapshot) -> StatsSnapshot {
                StatsSnapshot {
                    $($field: self.$field + other.$field,)*
                }
            }
        }
    };
}

counters! {
    events_received => record_received,
    dropped_busy => record_dropped,
    unhandled => record_unhandled,
    dispatched => record_dispatched,
    immediate_invoked => record_immediate,
    walks_requested => record_walk_requested,
    walk_gated_invoked => record_walk_gated,
    walks_cancelled => record_walk_cancelled,
    walks_failed => record_walk_failed,
    handler_panics => record_panic,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::iter::Sum for StatsSnapshot {
    fn sum<I: Iterator<Item = StatsSnapshot>>(iter: I) -> Self {
        iter.fold(StatsSnapshot::default(), |acc, s| acc + s)
    }
}
