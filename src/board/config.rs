//! Runtime configuration for the move coordinator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the coordinator treats a move for an item that already has one in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentMovePolicy {
    /// Refuse the second move until the first settles.
    #[default]
    RejectWhilePending,
    /// Dispatch both; backend completion order decides the outcome.
    Allow,
}

/// Board engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Shown when a move fails and the backend sent no message.
    pub generic_error_message: String,
    /// Handling of overlapping moves on the same item.
    pub concurrent_moves: ConcurrentMovePolicy,
    /// Capacity of the move event channel.
    pub event_buffer: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            generic_error_message: "Could not save the change. Please try again.".to_owned(),
            concurrent_moves: ConcurrentMovePolicy::default(),
            event_buffer: 64,
        }
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum BoardConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid board configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The event channel must hold at least one event.
    #[error("event_buffer must be greater than zero")]
    ZeroEventBuffer,
}

impl BoardConfig {
    /// Parses configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError::Parse`] for malformed JSON and
    /// [`BoardConfigError::ZeroEventBuffer`] when `event_buffer` is zero.
    pub fn from_json_str(document: &str) -> Result<Self, BoardConfigError> {
        let config: Self = serde_json::from_str(document)?;
        if config.event_buffer == 0 {
            return Err(BoardConfigError::ZeroEventBuffer);
        }
        Ok(config)
    }

    /// Sets the fallback error message.
    #[must_use]
    pub fn with_generic_error_message(mut self, message: impl Into<String>) -> Self {
        self.generic_error_message = message.into();
        self
    }

    /// Sets the concurrent move policy.
    #[must_use]
    pub const fn with_concurrent_moves(mut self, policy: ConcurrentMovePolicy) -> Self {
        self.concurrent_moves = policy;
        self
    }

    /// Sets the event channel capacity. Zero is raised to one.
    #[must_use]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }
}
