use serde::{Deserialize, Serialize};

use crate::domain::QueueState;

/// Point-in-time view of a queue. Counters only; no per-task history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueStatus {
    pub name: String,
    pub state: QueueState,
    pub pending: usize,
    /// Tasks whose body has been invoked.
    pub executed: u64,
    /// Faults handed to the reporter.
    pub faults: u64,
}
