//! Domain model (steps, faults, queue state).

pub mod fault;
pub mod state;
pub mod step;

pub use self::fault::{Fault, FaultOrigin};
pub use self::state::QueueState;
pub use self::step::{IntoStep, Settle, Step};
pub(crate) use self::step::Task;
