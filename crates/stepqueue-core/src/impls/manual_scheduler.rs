//! ManualScheduler - テスト用の仮想イベントループ
//!
//! # 学習ポイント
//! - `futures::task::ArcWake` による最小 executor
//! - 「ターン」を明示的に進めることで tick の境界をテストで観測できる
//!
//! # 使用例
//! ```ignore
//! let scheduler = ManualScheduler::new();
//! let queue = SerialQueue::builder().scheduler(scheduler.clone()).build()?;
//! queue.enqueue(|| log(1)).tick().enqueue(|| log(2));
//! scheduler.flush();
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use futures::task::{ArcWake, waker_ref};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::ports::Scheduler;

/// Upper bound on turns run by a single `flush()`.
const MAX_FLUSH_TURNS: usize = 10_000;

/// Single-threaded executor whose turns advance only when told to.
///
/// Nothing runs on its own: `run_until_stalled`, `turn` and `flush` drive
/// all spawned futures on the caller's thread.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    ready: Mutex<VecDeque<Arc<ManualTask>>>,
    turns: Mutex<Vec<oneshot::Sender<()>>>,
}

struct ManualTask {
    future: Mutex<Option<BoxFuture<'static, ()>>>,
    inner: Weak<ManualInner>,
}

impl ArcWake for ManualTask {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        if let Some(inner) = arc_self.inner.upgrade() {
            inner.ready.lock().push_back(Arc::clone(arc_self));
        }
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll woken tasks until none is ready. Returns the number of polls.
    pub fn run_until_stalled(&self) -> usize {
        let mut polls = 0;
        loop {
            let Some(task) = self.inner.ready.lock().pop_front() else {
                return polls;
            };
            // completed, or already taken by a duplicate wake
            let Some(mut fut) = task.future.lock().take() else {
                continue;
            };
            let waker = waker_ref(&task);
            let mut cx = Context::from_waker(&waker);
            polls += 1;
            if let Poll::Pending = fut.as_mut().poll(&mut cx) {
                *task.future.lock() = Some(fut);
            }
        }
    }

    /// Start the next turn: complete every `next_turn()` handed out so far,
    /// then run until stalled. Returns how many turn waiters were released.
    pub fn turn(&self) -> usize {
        let due = std::mem::take(&mut *self.inner.turns.lock());
        let released = due.len();
        for tx in due {
            // receiver may be gone; nothing waits on it then
            let _ = tx.send(());
        }
        self.run_until_stalled();
        released
    }

    /// Keep turning until nothing is ready and no turn is outstanding.
    /// Returns the number of turns run.
    pub fn flush(&self) -> usize {
        self.run_until_stalled();
        let mut turns = 0;
        while self.pending_turns() > 0 {
            if turns >= MAX_FLUSH_TURNS {
                tracing::warn!(turns, "manual scheduler flush gave up; steps keep asking for turns");
                break;
            }
            self.turn();
            turns += 1;
        }
        turns
    }

    /// `next_turn()` registrations not yet released.
    pub fn pending_turns(&self) -> usize {
        self.inner.turns.lock().len()
    }

    /// Tasks woken but not yet polled.
    pub fn ready_tasks(&self) -> usize {
        self.inner.ready.lock().len()
    }
}

impl Scheduler for ManualScheduler {
    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        let task = Arc::new(ManualTask {
            future: Mutex::new(Some(fut)),
            inner: Arc::downgrade(&self.inner),
        });
        self.inner.ready.lock().push_back(task);
    }

    fn next_turn(&self) -> BoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel();
        self.inner.turns.lock().push(tx);
        async move {
            // a dropped sender means the scheduler is gone; treat as the turn
            let _ = rx.await;
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn spawn_waits_for_run() {
        let scheduler = ManualScheduler::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        scheduler.spawn(async move { h.fetch_add(1, Ordering::SeqCst); }.boxed());

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.ready_tasks(), 1);
        scheduler.run_until_stalled();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn next_turn_completes_only_on_turn() {
        let scheduler = ManualScheduler::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        let turn = scheduler.next_turn();
        scheduler.spawn(
            async move {
                turn.await;
                h.fetch_add(1, Ordering::SeqCst);
            }
            .boxed(),
        );

        scheduler.run_until_stalled();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending_turns(), 1);

        assert_eq!(scheduler.turn(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_turns(), 0);
    }

    #[test]
    fn turn_releases_only_earlier_registrations() {
        let scheduler = ManualScheduler::new();
        let hits = counter();
        let s = scheduler.clone();
        let h = Arc::clone(&hits);
        let first = scheduler.next_turn();
        scheduler.spawn(
            async move {
                first.await;
                h.fetch_add(1, Ordering::SeqCst);
                s.next_turn().await;
                h.fetch_add(1, Ordering::SeqCst);
            }
            .boxed(),
        );

        scheduler.turn();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        scheduler.turn();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn flush_runs_all_turns() {
        let scheduler = ManualScheduler::new();
        let hits = counter();
        let s = scheduler.clone();
        let h = Arc::clone(&hits);
        scheduler.spawn(
            async move {
                for _ in 0..3 {
                    s.next_turn().await;
                    h.fetch_add(1, Ordering::SeqCst);
                }
            }
            .boxed(),
        );

        assert_eq!(scheduler.flush(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.flush(), 0);
    }
}
