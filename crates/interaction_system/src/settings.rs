//! Dispatch settings, usually embedded in the host's TOML config.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Behaviour switches for the dispatch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Show "Unhandled ... interaction" diagnostics to the actor
    #[serde(default = "default_true")]
    pub report_unhandled: bool,
    /// Catch panics in handler actions so one faulty plugin cannot take the
    /// rest of the dispatch down with it
    #[serde(default = "default_true")]
    pub isolate_handler_panics: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            report_unhandled: true,
            isolate_handler_panics: true,
        }
    }
}
