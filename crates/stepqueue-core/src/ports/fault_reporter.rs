//! FaultReporter port - 失敗の通知先

use crate::domain::Fault;

/// Receives every task failure, exactly once per failure.
///
/// What happens next (log line, user-visible alert, ...) is up to the
/// implementation. It runs on the pump's call stack, so keep it short.
pub trait FaultReporter: Send + Sync {
    fn report(&self, fault: Fault);
}
