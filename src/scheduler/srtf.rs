use std::cmp;

use super::{
    Event, KernelCtx, PolicyConfig, ProcessId, Scheduler, SchedulerInit, grant_slice,
    select_min_by_key,
};
use crate::{
    core::Ticks,
    error::{SimError, SimResult},
};

/// Preemptive shortest remaining time first.
///
/// Candidates other than the process that last held the CPU are charged
/// `context_switch_time` when compared. The charge only affects the
/// comparison: the slice granted on dispatch never includes it.
#[derive(Debug, Clone)]
pub struct SrtfScheduler {
    context_switch_time: Ticks,
}

impl SrtfScheduler {
    pub fn context_switch_time(&self) -> Ticks {
        self.context_switch_time
    }

    /// Remaining time as seen by the selection step.
    pub fn effective_remaining(&self, ctx: &KernelCtx, process: ProcessId) -> Option<Ticks> {
        let p = ctx.process(process).ok()?;
        Some(self.charge(ctx, p.id, p.remaining_time))
    }

    fn charge(&self, ctx: &KernelCtx, process: ProcessId, remaining: Ticks) -> Ticks {
        if ctx.on_cpu() == Some(process) {
            remaining
        } else {
            remaining.saturating_add(self.context_switch_time)
        }
    }
}

impl SchedulerInit for SrtfScheduler {
    fn init(config: &PolicyConfig) -> SimResult<Self> {
        let context_switch_time = config
            .context_switch_time
            .ok_or(SimError::MissingParameter {
                policy: "SRTF",
                parameter: "context_switch_time",
            })?;
        Ok(Self {
            context_switch_time,
        })
    }
}

impl Scheduler for SrtfScheduler {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn select(&self, ctx: &KernelCtx, _current: &Event) -> Option<ProcessId> {
        select_min_by_key(ctx, |p| self.charge(ctx, p.id, p.remaining_time))
    }

    // Run until done or until the next pending event, whichever is first
    fn dispatch(&mut self, ctx: &mut KernelCtx, process: ProcessId) -> SimResult<Event> {
        let remaining = ctx.process(process)?.remaining_time;
        let now = ctx.now();
        // A completion past the end of the clock still yields to any pending event
        let slice = match (ctx.next_event_time(), now.checked_add(remaining)) {
            (Some(next), Some(end)) if next < end => cmp::min(next.saturating_sub(now), remaining),
            (Some(next), None) => next.saturating_sub(now),
            _ => remaining,
        };
        grant_slice(ctx, process, slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::ProcessState, scheduler::tests::ready_ctx};

    fn srtf(context_switch_time: Ticks) -> SrtfScheduler {
        SrtfScheduler::init(&PolicyConfig::default().with_context_switch_time(context_switch_time))
            .unwrap()
    }

    #[test]
    fn test_init_requires_context_switch_time() {
        let config = PolicyConfig::default().with_quantum(4);
        assert!(matches!(
            SrtfScheduler::init(&config),
            Err(SimError::MissingParameter { policy: "SRTF", .. })
        ));
        assert_eq!(srtf(0).context_switch_time(), 0);
    }

    #[test]
    fn test_select_charges_non_incumbents() {
        let mut ctx = ready_ctx(&[(1, 0, 6), (2, 0, 2)]);
        ctx.on_cpu = Some(1);
        let s = srtf(1);
        assert_eq!(s.effective_remaining(&ctx, 1), Some(6));
        assert_eq!(s.effective_remaining(&ctx, 2), Some(3));
        assert_eq!(s.select(&ctx, &Event::cpu_request(2, 0)), Some(2));
    }

    #[test]
    fn test_switch_cost_can_keep_incumbent() {
        let mut ctx = ready_ctx(&[(1, 0, 4), (2, 0, 3)]);
        ctx.on_cpu = Some(1);
        // 3 + 2 > 4
        assert_eq!(srtf(2).select(&ctx, &Event::cpu_request(2, 0)), Some(1));
    }

    #[test]
    fn test_select_tie_goes_to_insertion_order() {
        let ctx = ready_ctx(&[(3, 0, 5), (1, 0, 5)]);
        assert_eq!(srtf(1).select(&ctx, &Event::cpu_request(1, 0)), Some(3));
    }

    #[test]
    fn test_dispatch_runs_to_completion_without_lookahead() {
        let mut ctx = ready_ctx(&[(1, 0, 6)]);
        let event = srtf(1).dispatch(&mut ctx, 1).unwrap();
        assert_eq!(event, Event::cpu_done(1, 6));
    }

    #[test]
    fn test_dispatch_finishes_exactly_at_next_event() {
        let mut ctx = ready_ctx(&[(1, 0, 6), (2, 6, 1)]);
        ctx.events.push(Event::cpu_request(2, 6)).unwrap();
        let event = srtf(1).dispatch(&mut ctx, 1).unwrap();
        assert_eq!(event, Event::cpu_done(1, 6));
    }

    #[test]
    fn test_dispatch_preempts_at_next_event() {
        let mut ctx = ready_ctx(&[(1, 0, 6), (2, 4, 2)]);
        ctx.processes[1].state = ProcessState::New;
        ctx.events.push(Event::cpu_request(2, 4)).unwrap();
        ctx.now = 1;

        let event = srtf(1).dispatch(&mut ctx, 1).unwrap();
        assert_eq!(event, Event::cpu_request(1, 4));
        // Elapsed time carries no switch cost
        assert_eq!(ctx.process(1).unwrap().remaining_time, 3);
    }

    #[test]
    fn test_dispatch_near_end_of_clock() {
        let near_end = u64::MAX - 1;
        let mut ctx = ready_ctx(&[(1, near_end, 5), (2, u64::MAX, 1)]);
        ctx.processes[1].state = ProcessState::New;
        ctx.events.push(Event::cpu_request(2, u64::MAX)).unwrap();
        ctx.now = near_end;

        // Yields to the pending event instead of computing an end past the clock
        let event = srtf(0).dispatch(&mut ctx, 1).unwrap();
        assert_eq!(event, Event::cpu_request(1, u64::MAX));
        assert_eq!(ctx.process(1).unwrap().remaining_time, 4);
    }

    #[test]
    fn test_dispatch_overflow_without_lookahead_is_fatal() {
        let mut ctx = ready_ctx(&[(1, u64::MAX - 1, 5)]);
        ctx.now = u64::MAX - 1;
        assert_eq!(
            srtf(0).dispatch(&mut ctx, 1),
            Err(SimError::ClockOverflow {
                at: u64::MAX - 1,
                slice: 5
            })
        );
    }
}
