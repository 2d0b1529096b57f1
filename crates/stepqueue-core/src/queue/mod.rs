//! Queue module: the serial step queue and its builder.
//!
//! Design intent:
//! - Steps start strictly in submission order, one at a time.
//! - A step that returns `Step::Wait` holds the queue until its future settles.
//! - A failing step is reported once and skipped over; the queue keeps draining.

mod builder;

pub use builder::QueueBuilder;

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::domain::{Fault, FaultOrigin, IntoStep, QueueState, Settle, Step, Task};
use crate::error::{TaskError, TaskPanic};
use crate::observability::QueueStatus;
use crate::ports::{FaultReporter, Scheduler};

/// Serializes steps submitted from anywhere in the application.
///
/// Cloning is cheap and every clone drives the same queue.
///
/// # 使用例
/// ```ignore
/// queue
///     .enqueue(move || Step::wait(fetch_config(client.clone())))
///     .enqueue(move || Step::wait(fetch_projects(client)))
///     .tick()
///     .enqueue(move || select_first_file(&view));
/// ```
#[derive(Clone)]
pub struct SerialQueue {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    scheduler: Arc<dyn Scheduler>,
    reporter: Arc<dyn FaultReporter>,
    core: Mutex<Core>,
    idle: Notify,
}

/// Guarded pump state. Never locked while a task body runs.
#[derive(Default)]
struct Core {
    pending: VecDeque<Task>,
    state: QueueState,
    executed: u64,
    faults: u64,
}

impl SerialQueue {
    pub fn builder() -> QueueBuilder {
        QueueBuilder::new()
    }

    pub(crate) fn from_parts(
        name: String,
        scheduler: Arc<dyn Scheduler>,
        reporter: Arc<dyn FaultReporter>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                scheduler,
                reporter,
                core: Mutex::new(Core::default()),
                idle: Notify::new(),
            }),
        }
    }

    /// Append a task. If the queue is idle it starts right away, on this
    /// call stack; plain tasks therefore finish before `enqueue` returns.
    ///
    /// Safe to call from inside a running task: the new task goes to the
    /// back and runs after the current one (and everything before it).
    pub fn enqueue<F, R>(&self, task: F) -> &Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: IntoStep,
    {
        self.push(Box::new(move || task().into_step()))
    }

    /// Append an already-created awaitable as its own step.
    pub fn enqueue_future<F>(&self, fut: F) -> &Self
    where
        F: Future + Send + 'static,
        F::Output: Settle,
    {
        self.push(Box::new(move || Ok(Step::wait(fut))))
    }

    /// Append a no-op step that waits for the scheduler's next turn.
    pub fn tick(&self) -> &Self {
        let scheduler = Arc::clone(&self.inner.scheduler);
        self.push(Box::new(move || Ok(Step::wait(scheduler.next_turn()))))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> QueueState {
        self.inner.core.lock().state
    }

    /// Tasks waiting to start (excludes the one running or awaited).
    pub fn pending(&self) -> usize {
        self.inner.core.lock().pending.len()
    }

    /// Idle and nothing pending.
    pub fn is_idle(&self) -> bool {
        let core = self.inner.core.lock();
        core.state.is_idle() && core.pending.is_empty()
    }

    pub fn status(&self) -> QueueStatus {
        let core = self.inner.core.lock();
        QueueStatus {
            name: self.inner.name.clone(),
            state: core.state,
            pending: core.pending.len(),
            executed: core.executed,
            faults: core.faults,
        }
    }

    /// Resolves once the queue has drained. Never resolves while a step is
    /// stalled.
    pub async fn idle(&self) {
        loop {
            let mut notified = std::pin::pin!(self.inner.idle.notified());
            notified.as_mut().enable();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    fn push(&self, task: Task) -> &Self {
        self.inner.core.lock().pending.push_back(task);
        self.pump();
        self
    }

    /// Start pending tasks until one has to be awaited or none is left.
    fn pump(&self) {
        loop {
            let task = {
                let mut core = self.inner.core.lock();
                if core.state.is_busy() {
                    // the running or awaited step pumps again when it is done
                    return;
                }
                let Some(task) = core.pending.pop_front() else {
                    drop(core);
                    tracing::trace!(queue = %self.inner.name, "queue drained");
                    self.inner.idle.notify_waiters();
                    return;
                };
                core.state = QueueState::Running;
                core.executed += 1;
                task
            };

            let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(result) => result,
                Err(payload) => Err(Box::new(TaskPanic::from_payload(payload)) as TaskError),
            };

            match outcome {
                Ok(Step::Done) => self.set_state(QueueState::Idle),
                Ok(Step::Wait(fut)) => {
                    self.set_state(QueueState::Awaiting);
                    self.await_step(fut);
                    return;
                }
                Err(error) => {
                    self.report(Fault::new(FaultOrigin::Raised, error));
                    self.set_state(QueueState::Idle);
                }
            }
        }
    }

    fn await_step(&self, fut: BoxFuture<'static, Result<(), TaskError>>) {
        tracing::debug!(queue = %self.inner.name, "awaiting step");
        let queue = self.clone();
        let fut = AssertUnwindSafe(fut).catch_unwind();
        self.inner.scheduler.spawn(
            async move {
                let settled = match fut.await {
                    Ok(result) => result,
                    Err(payload) => Err(Box::new(TaskPanic::from_payload(payload)) as TaskError),
                };
                if let Err(error) = settled {
                    queue.report(Fault::new(FaultOrigin::Rejected, error));
                }
                queue.set_state(QueueState::Idle);
                queue.pump();
            }
            .boxed(),
        );
    }

    fn set_state(&self, state: QueueState) {
        self.inner.core.lock().state = state;
    }

    fn report(&self, fault: Fault) {
        self.inner.core.lock().faults += 1;
        let reporter = &self.inner.reporter;
        if panic::catch_unwind(AssertUnwindSafe(|| reporter.report(fault))).is_err() {
            tracing::error!(queue = %self.inner.name, "fault reporter panicked");
        }
    }
}

impl fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.core.lock();
        f.debug_struct("SerialQueue")
            .field("name", &self.inner.name)
            .field("state", &core.state)
            .field("pending", &core.pending.len())
            .finish()
    }
}
