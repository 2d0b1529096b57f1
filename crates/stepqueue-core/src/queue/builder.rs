//! QueueBuilder - キューの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - Scheduler が未設定なら build() 時に BuildError を返す
//! - Reporter は未設定なら設定に応じて LogReporter か NoopReporter

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use super::SerialQueue;
use crate::config::QueueConfig;
use crate::error::BuildError;
use crate::impls::{LogReporter, NoopReporter, TokioScheduler};
use crate::ports::{FaultReporter, Scheduler};

/// Builds a `SerialQueue`.
///
/// # 使用例
/// ```ignore
/// let queue = QueueBuilder::from_config(&config)
///     .tokio(Handle::current())
///     .build()?;
/// ```
pub struct QueueBuilder {
    name: String,
    tick_delay: Duration,
    log_faults: bool,
    scheduler: Option<Arc<dyn Scheduler>>,
    reporter: Option<Arc<dyn FaultReporter>>,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self::from_config(&QueueConfig::default())
    }

    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            name: config.name.clone(),
            tick_delay: config.tick_delay(),
            log_faults: config.log_faults,
            scheduler: None,
            reporter: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn scheduler<S: Scheduler + 'static>(self, scheduler: S) -> Self {
        self.shared_scheduler(Arc::new(scheduler))
    }

    pub fn shared_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Use a `TokioScheduler` on `handle` with the configured tick delay.
    pub fn tokio(self, handle: Handle) -> Self {
        let tick_delay = self.tick_delay;
        self.scheduler(TokioScheduler::new(handle).with_tick_delay(tick_delay))
    }

    pub fn reporter<R: FaultReporter + 'static>(self, reporter: R) -> Self {
        self.shared_reporter(Arc::new(reporter))
    }

    pub fn shared_reporter(mut self, reporter: Arc<dyn FaultReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Result<SerialQueue, BuildError> {
        let Some(scheduler) = self.scheduler else {
            return Err(BuildError::MissingScheduler(self.name));
        };
        let reporter = match self.reporter {
            Some(reporter) => reporter,
            None if self.log_faults => Arc::new(LogReporter::new(self.name.clone())),
            None => Arc::new(NoopReporter),
        };
        tracing::debug!(queue = %self.name, "serial queue built");
        Ok(SerialQueue::from_parts(self.name, scheduler, reporter))
    }
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}
