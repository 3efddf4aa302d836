//! Single-CPU scheduling simulator built on a discrete-event engine.
//!
//! The clock jumps between pending event timestamps. At each decision
//! point the active policy (FCFS, SJF, RR or SRTF) picks a ready process
//! and runs it for one slice, which the engine turns into the next event.

pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::core::{Event, EventKind, SchedCoreEvent};
pub use error::{SimError, SimResult};
pub use scheduler::{AnyScheduler, Policy, PolicyConfig, Scheduler};
pub use sim::{Job, ProcessOutcome, Sim, Summary};
