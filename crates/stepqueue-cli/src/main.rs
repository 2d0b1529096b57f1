use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::runtime::Handle;
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;

use stepqueue_core::{QueueBuilder, QueueConfig, SerialQueue, Step};

/// Stand-in for the playground backend: every call takes a little while.
struct FakeBackend {
    saves_left_to_fail: AtomicU32,
}

impl FakeBackend {
    fn new(failing_saves: u32) -> Self {
        Self {
            saves_left_to_fail: AtomicU32::new(failing_saves),
        }
    }

    async fn get(&self, what: &str) -> Result<(), String> {
        sleep(Duration::from_millis(20)).await;
        tracing::info!(what, "fetched");
        Ok(())
    }

    async fn save(&self, file: &str) -> Result<(), String> {
        sleep(Duration::from_millis(20)).await;
        let left = self.saves_left_to_fail.load(Ordering::Relaxed);
        if left > 0 {
            self.saves_left_to_fail.fetch_sub(1, Ordering::Relaxed);
            return Err(format!("save of {file} rejected (left={left})"));
        }
        tracing::info!(file, "saved");
        Ok(())
    }
}

fn load_config() -> Result<QueueConfig, stepqueue_core::ConfigError> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => QueueConfig::load(path),
        None => Ok(QueueConfig {
            name: "playground".to_string(),
            ..QueueConfig::default()
        }),
    }
}

/// Queue a browse/edit session the way the editor screens do.
fn queue_session(queue: &SerialQueue, backend: Arc<FakeBackend>) {
    let b1 = Arc::clone(&backend);
    let b2 = Arc::clone(&backend);
    let b3 = Arc::clone(&backend);
    let b4 = Arc::clone(&backend);

    queue
        .enqueue(move || Step::wait(async move { b1.get("config").await }))
        .enqueue(move || Step::wait(async move { b2.get("projects").await }))
        // let the file list render before selecting
        .tick()
        .enqueue(|| tracing::info!("selected app.yaml"))
        .enqueue(move || Step::wait(async move { b3.save("app.yaml").await }))
        .enqueue(move || Step::wait(async move { b4.save("main.py").await }))
        .enqueue(|| tracing::info!("navigated to project list"));
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "could not load config");
            std::process::exit(2);
        }
    };

    let queue = match QueueBuilder::from_config(&config)
        .tokio(Handle::current())
        .build()
    {
        Ok(queue) => queue,
        Err(e) => {
            tracing::error!(error = %e, "could not build queue");
            std::process::exit(2);
        }
    };

    queue_session(&queue, Arc::new(FakeBackend::new(1)));
    queue.idle().await;

    let status = queue.status();
    match serde_json::to_string_pretty(&status) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "could not render status"),
    }
}
