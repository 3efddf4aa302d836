use super::{
    Event, KernelCtx, PolicyConfig, ProcessId, Scheduler, SchedulerInit, grant_slice,
    select_event_process,
};
use crate::error::SimResult;

/// First-come, first-served: serves requests in the order they fired and
/// runs each process to completion.
#[derive(Debug, Clone, Default)]
pub struct FcfsScheduler;

impl SchedulerInit for FcfsScheduler {
    fn init(_config: &PolicyConfig) -> SimResult<Self> {
        Ok(Self)
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn select(&self, ctx: &KernelCtx, current: &Event) -> Option<ProcessId> {
        select_event_process(ctx, current)
    }

    fn dispatch(&mut self, ctx: &mut KernelCtx, process: ProcessId) -> SimResult<Event> {
        let slice = ctx.process(process)?.remaining_time;
        grant_slice(ctx, process, slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::ProcessState, scheduler::tests::ready_ctx};

    #[test]
    fn test_select_matches_event_process() {
        let ctx = ready_ctx(&[(1, 0, 9), (2, 0, 1)]);
        let s = FcfsScheduler;
        assert_eq!(s.select(&ctx, &Event::cpu_request(1, 0)), Some(1));
        assert_eq!(s.select(&ctx, &Event::cpu_request(2, 0)), Some(2));
    }

    #[test]
    fn test_select_ignores_unknown_or_finished() {
        let mut ctx = ready_ctx(&[(1, 0, 9)]);
        let s = FcfsScheduler;
        assert_eq!(s.select(&ctx, &Event::cpu_request(4, 0)), None);

        ctx.processes[0].state = ProcessState::Terminated;
        assert_eq!(s.select(&ctx, &Event::cpu_request(1, 0)), None);
    }

    #[test]
    fn test_dispatch_runs_to_completion() {
        let mut ctx = ready_ctx(&[(1, 0, 9)]);
        ctx.now = 2;
        let event = FcfsScheduler.dispatch(&mut ctx, 1).unwrap();
        assert_eq!(event, Event::cpu_done(1, 11));
        assert_eq!(ctx.process(1).unwrap().remaining_time, 0);
    }
}
