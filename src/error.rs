//! Error types for the simulator.
//!
//! Every failure is fatal for the run that raised it: a deterministic
//! simulation has nothing to retry against, so callers get the fault and
//! the run is abandoned.

use crate::core::{Event, ProcessId, ProcessState, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    // Configuration
    /// A policy parameter required by the selected policy was not supplied.
    MissingParameter {
        policy: &'static str,
        parameter: &'static str,
    },

    /// A policy parameter was supplied with a value the policy rejects.
    InvalidParameter {
        policy: &'static str,
        parameter: &'static str,
        value: Ticks,
    },

    // Workload
    /// Generator parameters that cannot describe a workload.
    InvalidWorkload(String),
    DuplicateProcess(ProcessId),
    UnknownProcess(ProcessId),

    // Engine
    /// A decision point was reached but the policy selected nothing.
    SelectionInconsistency { at: Ticks, event: Event },

    /// The policy selected a process that is not `Ready`.
    NotReady {
        process: ProcessId,
        state: ProcessState,
    },

    /// An event fired for a process that cannot receive it in its state.
    UnexpectedEvent { event: Event, state: ProcessState },

    /// A process already has an outstanding event.
    DuplicateEvent(ProcessId),

    TemporalInversion { event_time: Ticks, clock: Ticks },

    /// A slice starting at `at` would end past the last representable tick.
    ClockOverflow { at: Ticks, slice: Ticks },

    /// The queue drained while a process was still live.
    Unfinished {
        process: ProcessId,
        state: ProcessState,
    },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::MissingParameter { policy, parameter } => {
                write!(f, "{} requires parameter `{}`", policy, parameter)
            }
            SimError::InvalidParameter {
                policy,
                parameter,
                value,
            } => write!(
                f,
                "{} rejects `{}` = {}: must be positive",
                policy, parameter, value
            ),
            SimError::InvalidWorkload(msg) => write!(f, "invalid workload: {}", msg),
            SimError::DuplicateProcess(id) => write!(f, "process P{} appears twice", id),
            SimError::UnknownProcess(id) => write!(f, "process P{} is not in the process set", id),
            SimError::SelectionInconsistency { at, event } => write!(
                f,
                "no process selected at t={} for {:?} of P{}",
                at, event.kind, event.process
            ),
            SimError::NotReady { process, state } => {
                write!(f, "process P{} selected while {:?}", process, state)
            }
            SimError::UnexpectedEvent { event, state } => write!(
                f,
                "{:?} at t={} for P{} while {:?}",
                event.kind, event.time, event.process, state
            ),
            SimError::DuplicateEvent(id) => {
                write!(f, "process P{} already has an outstanding event", id)
            }
            SimError::TemporalInversion { event_time, clock } => write!(
                f,
                "event due at t={} is earlier than the clock t={}",
                event_time, clock
            ),
            SimError::ClockOverflow { at, slice } => {
                write!(f, "slice of {} ticks from t={} overflows the clock", slice, at)
            }
            SimError::Unfinished { process, state } => write!(
                f,
                "event queue drained with process P{} still {:?}",
                process, state
            ),
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
