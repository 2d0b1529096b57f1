use thiserror::Error;

/// Error value carried by a failed task or a rejected awaitable.
///
/// `"banana peel".into()` and `String::into()` both work, as does any
/// `std::error::Error + Send + Sync`.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error raised while wiring a queue together.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no scheduler configured for queue `{0}`; call `scheduler()` before `build()`")]
    MissingScheduler(String),
}

/// Error raised while loading a `QueueConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A task body or awaitable panicked; the payload message is kept.
#[derive(Debug, Error)]
#[error("task panicked: {0}")]
pub struct TaskPanic(pub String);

impl TaskPanic {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self(message)
    }
}
