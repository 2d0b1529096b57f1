//! stepqueue-core
//!
//! Serial step queue: run units of work strictly one at a time, in the order
//! they were submitted, waiting on each step's future before the next one
//! starts and carrying on past failures.
//!
//! # モジュール構成
//! - **domain**: Step, Fault, QueueState
//! - **ports**: Scheduler, FaultReporter
//! - **impls**: TokioScheduler, ManualScheduler, reporters
//! - **queue**: SerialQueue, QueueBuilder
//! - **config**: QueueConfig (TOML)
//! - **observability**: QueueStatus

pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod queue;

pub use config::QueueConfig;
pub use domain::{Fault, FaultOrigin, IntoStep, QueueState, Settle, Step};
pub use error::{BuildError, ConfigError, TaskError, TaskPanic};
pub use observability::QueueStatus;
pub use queue::{QueueBuilder, SerialQueue};
