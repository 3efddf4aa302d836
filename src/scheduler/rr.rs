use std::cmp;

use super::{
    Event, KernelCtx, PolicyConfig, ProcessId, Scheduler, SchedulerInit, grant_slice,
    select_event_process,
};
use crate::{
    core::Ticks,
    error::{SimError, SimResult},
};

/// Round robin with a fixed quantum.
///
/// Selection is a plain identity lookup; the rotation comes from each
/// preempted process re-requesting the CPU `quantum` ticks later, behind
/// whatever requests fired in the meantime.
#[derive(Debug, Clone)]
pub struct RoundRobinScheduler {
    quantum: Ticks,
}

impl RoundRobinScheduler {
    pub fn quantum(&self) -> Ticks {
        self.quantum
    }
}

impl SchedulerInit for RoundRobinScheduler {
    fn init(config: &PolicyConfig) -> SimResult<Self> {
        match config.quantum {
            None => Err(SimError::MissingParameter {
                policy: "RR",
                parameter: "quantum",
            }),
            Some(0) => Err(SimError::InvalidParameter {
                policy: "RR",
                parameter: "quantum",
                value: 0,
            }),
            Some(quantum) => Ok(Self { quantum }),
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn select(&self, ctx: &KernelCtx, current: &Event) -> Option<ProcessId> {
        select_event_process(ctx, current)
    }

    fn dispatch(&mut self, ctx: &mut KernelCtx, process: ProcessId) -> SimResult<Event> {
        let slice = cmp::min(ctx.process(process)?.remaining_time, self.quantum);
        grant_slice(ctx, process, slice)
    }
}
