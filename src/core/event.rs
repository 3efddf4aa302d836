use crate::core::{ProcessId, ProcessState, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// The process wants the CPU (first arrival or after preemption).
    CpuRequest,
    /// The process has consumed all of its service time.
    CpuDone,
}

/// A future occurrence the engine must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub process: ProcessId,
    pub kind: EventKind,
    pub time: Ticks,
}

impl Event {
    pub fn new(process: ProcessId, kind: EventKind, time: Ticks) -> Self {
        Self {
            process,
            kind,
            time,
        }
    }

    pub fn cpu_request(process: ProcessId, time: Ticks) -> Self {
        Self::new(process, EventKind::CpuRequest, time)
    }

    pub fn cpu_done(process: ProcessId, time: Ticks) -> Self {
        Self::new(process, EventKind::CpuDone, time)
    }
}

/// Observable trace of what one engine step did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedCoreEvent {
    /// An event was popped from the pending queue.
    EventFired { event: Event },
    ProcessStateChange {
        process: ProcessId,
        from: ProcessState,
        to: ProcessState,
    },
    // CPU handed to a different process than the last one dispatched
    ContextSwitch {
        at: Ticks,
        from: Option<ProcessId>,
        to: ProcessId,
    },
    /// A slice of `slice` ticks starting at `at`, resolved into `outcome`.
    Dispatched {
        process: ProcessId,
        at: Ticks,
        slice: Ticks,
        outcome: Event,
    },
    // CPU free at a decision point with nobody ready
    CpuIdle { at: Ticks },
}
