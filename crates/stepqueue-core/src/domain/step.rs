//! Step - タスクが返す「次に何を待つか」
//!
//! # 学習ポイント
//! - `IntoStep` により `()` / `Step` / `Result<_, E>` をそのまま返せる
//! - `Settle` により `()` と `Result<(), E>` の Future を同じ形に揃える

use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

use crate::error::TaskError;

/// A queued unit of work, type-erased.
pub(crate) type Task = Box<dyn FnOnce() -> Result<Step, TaskError> + Send + 'static>;

/// What a task hands back to the queue after its synchronous body ran.
pub enum Step {
    /// Nothing to wait for; the pump moves on immediately.
    Done,

    /// Hold the queue until this future settles.
    Wait(BoxFuture<'static, Result<(), TaskError>>),
}

impl Step {
    pub fn done() -> Self {
        Step::Done
    }

    /// Wrap a future whose output is `()` or `Result<(), E>`.
    ///
    /// ```ignore
    /// queue.enqueue(move || Step::wait(async move {
    ///     client.save(file).await
    /// }));
    /// ```
    pub fn wait<F>(fut: F) -> Self
    where
        F: Future + Send + 'static,
        F::Output: Settle,
    {
        Step::Wait(fut.map(Settle::into_settled).boxed())
    }

    pub fn is_wait(&self) -> bool {
        matches!(self, Step::Wait(_))
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Done => f.write_str("Step::Done"),
            Step::Wait(_) => f.write_str("Step::Wait(..)"),
        }
    }
}

/// Conversion from a task's return value into a `Step`.
///
/// `Err` is a synchronous task fault.
pub trait IntoStep {
    fn into_step(self) -> Result<Step, TaskError>;
}

impl IntoStep for () {
    fn into_step(self) -> Result<Step, TaskError> {
        Ok(Step::Done)
    }
}

impl IntoStep for Step {
    fn into_step(self) -> Result<Step, TaskError> {
        Ok(self)
    }
}

impl<T, E> IntoStep for Result<T, E>
where
    T: IntoStep,
    E: Into<TaskError>,
{
    fn into_step(self) -> Result<Step, TaskError> {
        self.map_err(Into::<TaskError>::into)?.into_step()
    }
}

/// Output of an awaited step. `Err` is an asynchronous task fault.
pub trait Settle {
    fn into_settled(self) -> Result<(), TaskError>;
}

impl Settle for () {
    fn into_settled(self) -> Result<(), TaskError> {
        Ok(())
    }
}

impl<E> Settle for Result<(), E>
where
    E: Into<TaskError>,
{
    fn into_settled(self) -> Result<(), TaskError> {
        self.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_done() {
        assert!(matches!(().into_step(), Ok(Step::Done)));
    }

    #[test]
    fn err_string_becomes_task_error() {
        let result: Result<(), &str> = Err("banana peel");
        let err = result.into_step().unwrap_err();
        assert_eq!(err.to_string(), "banana peel");
    }

    #[test]
    fn ok_wait_is_passed_through() {
        let result: Result<Step, String> = Ok(Step::wait(async {}));
        assert!(result.into_step().unwrap().is_wait());
    }

    #[tokio::test]
    async fn wait_normalizes_future_output() {
        let Step::Wait(fut) = Step::wait(async { Err::<(), _>("apple core") }) else {
            panic!("expected Step::Wait");
        };
        let err = fut.await.unwrap_err();
        assert_eq!(err.to_string(), "apple core");

        let Step::Wait(fut) = Step::wait(async {}) else {
            panic!("expected Step::Wait");
        };
        assert!(fut.await.is_ok());
    }
}
