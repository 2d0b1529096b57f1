//! FaultReporter implementations.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Fault, FaultOrigin};
use crate::ports::FaultReporter;

/// Logs every fault at error level.
#[derive(Debug, Clone)]
pub struct LogReporter {
    queue_name: String,
}

impl LogReporter {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
        }
    }
}

impl FaultReporter for LogReporter {
    fn report(&self, fault: Fault) {
        tracing::error!(
            queue = %self.queue_name,
            origin = %fault.origin(),
            panic = fault.is_panic(),
            at = %fault.occurred_at(),
            error = %fault.error(),
            "serial queue encountered a fault"
        );
    }
}

/// Drops every fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl FaultReporter for NoopReporter {
    fn report(&self, _fault: Fault) {}
}

/// Keeps faults in memory so callers can assert on them.
#[derive(Debug, Clone, Default)]
pub struct CapturingReporter {
    faults: Arc<Mutex<Vec<Fault>>>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.faults.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.lock().is_empty()
    }

    /// Error messages in report order.
    pub fn messages(&self) -> Vec<String> {
        self.faults.lock().iter().map(Fault::message).collect()
    }

    pub fn origins(&self) -> Vec<FaultOrigin> {
        self.faults.lock().iter().map(Fault::origin).collect()
    }

    /// Remove and return everything captured so far.
    pub fn take(&self) -> Vec<Fault> {
        std::mem::take(&mut *self.faults.lock())
    }
}

impl FaultReporter for CapturingReporter {
    fn report(&self, fault: Fault) {
        self.faults.lock().push(fault);
    }
}

/// Adapts a closure, e.g. one that raises a user-visible notification.
pub struct FnReporter<F> {
    f: F,
}

impl<F> FnReporter<F>
where
    F: Fn(Fault) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> FaultReporter for FnReporter<F>
where
    F: Fn(Fault) + Send + Sync,
{
    fn report(&self, fault: Fault) {
        (self.f)(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn capturing_reporter_shares_storage_between_clones() {
        let reporter = CapturingReporter::new();
        let handle = reporter.clone();
        reporter.report(Fault::new(FaultOrigin::Raised, "banana peel".into()));

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.messages(), vec!["banana peel".to_string()]);
        assert_eq!(handle.origins(), vec![FaultOrigin::Raised]);

        let taken = handle.take();
        assert_eq!(taken.len(), 1);
        assert!(reporter.is_empty());
    }

    #[test]
    fn fn_reporter_calls_closure() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let reporter = FnReporter::new(move |fault: Fault| {
            assert_eq!(fault.origin(), FaultOrigin::Rejected);
            s.fetch_add(1, Ordering::SeqCst);
        });
        reporter.report(Fault::new(FaultOrigin::Rejected, "apple core".into()));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn log_and_noop_reporters_accept_faults() {
        LogReporter::new("test").report(Fault::new(FaultOrigin::Raised, "x".into()));
        NoopReporter.report(Fault::new(FaultOrigin::Raised, "y".into()));
    }
}
