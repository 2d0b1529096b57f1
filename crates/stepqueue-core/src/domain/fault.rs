//! Fault - タスク失敗の記録
//!
//! 同期的な失敗（Err / panic）と非同期的な失敗（Future の Err / panic）を区別する。
//! どちらもキューを止めず、FaultReporter へ一度だけ渡される。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TaskError, TaskPanic};

/// Where in a task's life the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultOrigin {
    /// The task body returned `Err` or panicked before returning.
    Raised,

    /// The awaited step resolved to `Err` or panicked while polled.
    Rejected,
}

impl fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultOrigin::Raised => f.write_str("raised"),
            FaultOrigin::Rejected => f.write_str("rejected"),
        }
    }
}

/// One task failure. The failing task's identity is not kept, only the error.
#[derive(Debug)]
pub struct Fault {
    origin: FaultOrigin,
    error: TaskError,
    occurred_at: DateTime<Utc>,
}

impl Fault {
    pub fn new(origin: FaultOrigin, error: TaskError) -> Self {
        Self {
            origin,
            error,
            occurred_at: Utc::now(),
        }
    }

    pub fn origin(&self) -> FaultOrigin {
        self.origin
    }

    pub fn error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is_panic(&self) -> bool {
        self.error.downcast_ref::<TaskPanic>().is_some()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {}: {}", self.origin, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_origin_and_message() {
        let fault = Fault::new(FaultOrigin::Rejected, "apple core".into());
        assert_eq!(fault.to_string(), "task rejected: apple core");
        assert_eq!(fault.message(), "apple core");
        assert!(!fault.is_panic());
    }

    #[test]
    fn panic_payload_is_recognized() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let fault = Fault::new(
            FaultOrigin::Raised,
            Box::new(TaskPanic::from_payload(payload)),
        );
        assert!(fault.is_panic());
        assert_eq!(fault.message(), "task panicked: boom");
    }
}
