//! Queue state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pump state of a `SerialQueue`.
///
/// State transitions:
/// - Idle -> Running (enqueue while idle)
/// - Running -> Awaiting (task returned `Step::Wait`)
/// - Running -> Running | Idle (task returned a plain value or failed)
/// - Awaiting -> Running | Idle (awaited step settled)
///
/// A never-settling step keeps the queue in `Awaiting` forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    /// Nothing executing, nothing awaited.
    #[default]
    Idle,

    /// A task body is executing right now.
    Running,

    /// A task returned an awaitable that has not settled yet.
    Awaiting,
}

impl QueueState {
    /// May the pump start the next pending task?
    pub fn is_idle(self) -> bool {
        matches!(self, QueueState::Idle)
    }

    pub fn is_busy(self) -> bool {
        !self.is_idle()
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueueState::Idle => "idle",
            QueueState::Running => "running",
            QueueState::Awaiting => "awaiting",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_accepts_next_task() {
        assert!(QueueState::Idle.is_idle());
        assert!(QueueState::Running.is_busy());
        assert!(QueueState::Awaiting.is_busy());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&QueueState::Awaiting).unwrap();
        assert_eq!(json, "\"awaiting\"");
        assert_eq!(QueueState::default(), QueueState::Idle);
    }
}
