//! Scheduler port - ホスト側イベントループの抽象化
//!
//! # テスト容易性
//! - trait によりイベントループを差し替え可能
//! - 本番では TokioScheduler、テストでは ManualScheduler を使用

use futures::future::BoxFuture;

/// Drives awaited steps and marks scheduler turns.
pub trait Scheduler: Send + Sync {
    /// Run `fut` to completion in the background.
    ///
    /// Must not poll `fut` inline; the queue calls this while it is still
    /// unwinding out of the task that produced the step.
    fn spawn(&self, fut: BoxFuture<'static, ()>);

    /// A future that completes once the next scheduler turn has started.
    ///
    /// The turn is counted from the moment this is called, not from the
    /// first poll.
    fn next_turn(&self) -> BoxFuture<'static, ()>;
}
