//! Ports - キューが依存する外部コラボレーター
//!
//! - **Scheduler**: 待機中の Future を駆動し、「次のターン」を提供する
//! - **FaultReporter**: タスク失敗を一度だけ受け取る

pub mod fault_reporter;
pub mod scheduler;

pub use self::fault_reporter::FaultReporter;
pub use self::scheduler::Scheduler;
