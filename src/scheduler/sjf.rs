use super::{
    Event, KernelCtx, PolicyConfig, ProcessId, Scheduler, SchedulerInit, grant_slice,
    select_min_by_key,
};
use crate::error::SimResult;

/// Non-preemptive shortest job first, keyed on total service time.
#[derive(Debug, Clone, Default)]
pub struct SjfScheduler;

impl SchedulerInit for SjfScheduler {
    fn init(_config: &PolicyConfig) -> SimResult<Self> {
        Ok(Self)
    }
}

impl Scheduler for SjfScheduler {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn select(&self, ctx: &KernelCtx, _current: &Event) -> Option<ProcessId> {
        select_min_by_key(ctx, |p| p.service_time)
    }

    // Same as FCFS: only the choice differs, never the slice
    fn dispatch(&mut self, ctx: &mut KernelCtx, process: ProcessId) -> SimResult<Event> {
        let slice = ctx.process(process)?.remaining_time;
        grant_slice(ctx, process, slice)
    }
}
