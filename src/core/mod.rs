pub mod driver;
pub mod event;
pub mod observer;
pub mod queue;
pub mod state;

pub use driver::SchedCore;
pub use event::{Event, EventKind, SchedCoreEvent};
pub use queue::EventQueue;
pub use state::{KernelCtx, Process, ProcessId, ProcessState, Ticks};
