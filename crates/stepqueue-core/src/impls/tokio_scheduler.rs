//! TokioScheduler - tokio ランタイム上のスケジューラ

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::oneshot;

use crate::ports::Scheduler;

/// Spawns awaited steps onto a tokio runtime.
///
/// `next_turn` is a timer of `tick_delay`; with a zero delay it is a spawned
/// `yield_now` that completes one runtime turn after the call.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    tick_delay: Duration,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tick_delay: Duration::ZERO,
        }
    }

    /// Bind to the runtime we are currently running inside of.
    pub fn current() -> Result<Self, TryCurrentError> {
        Ok(Self::new(Handle::try_current()?))
    }

    pub fn with_tick_delay(mut self, tick_delay: Duration) -> Self {
        self.tick_delay = tick_delay;
        self
    }
}

impl Scheduler for TokioScheduler {
    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        // detached: the queue learns about completion through the future itself
        drop(self.handle.spawn(fut));
    }

    fn next_turn(&self) -> BoxFuture<'static, ()> {
        if self.tick_delay.is_zero() {
            // start yielding now so the turn does not wait for the first poll
            let (tx, rx) = oneshot::channel();
            drop(self.handle.spawn(async move {
                tokio::task::yield_now().await;
                let _ = tx.send(());
            }));
            return async move {
                let _ = rx.await;
            }
            .boxed();
        }
        // the timer needs a runtime context at construction
        let _guard = self.handle.enter();
        tokio::time::sleep(self.tick_delay).boxed()
    }
}
