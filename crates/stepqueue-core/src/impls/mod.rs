//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **TokioScheduler**: 本番用。tokio ランタイム上で Future を駆動する
//! - **ManualScheduler**: テスト用。ターンを明示的に進める仮想イベントループ
//! - **LogReporter / CapturingReporter / FnReporter / NoopReporter**: FaultReporter

pub mod manual_scheduler;
pub mod reporters;
pub mod tokio_scheduler;

pub use self::manual_scheduler::ManualScheduler;
pub use self::reporters::{CapturingReporter, FnReporter, LogReporter, NoopReporter};
pub use self::tokio_scheduler::TokioScheduler;
