pub mod fcfs;
pub mod rr;
pub mod sjf;
pub mod srtf;

use crate::{
    core::{
        Ticks,
        event::Event,
        state::{KernelCtx, ProcessId},
    },
    error::SimResult,
};
pub use fcfs::FcfsScheduler;
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    Fcfs,
    Sjf,
    RoundRobin,
    Srtf,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Fcfs, Policy::Sjf, Policy::RoundRobin, Policy::Srtf];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::RoundRobin => "RR",
            Policy::Srtf => "SRTF",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Parameters for a run. Each policy reads only what it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyConfig {
    /// CPU time granted per round-robin turn.
    pub quantum: Option<Ticks>,
    /// Overhead SRTF charges to every candidate except the incumbent.
    pub context_switch_time: Option<Ticks>,
}

impl PolicyConfig {
    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn with_context_switch_time(mut self, context_switch_time: Ticks) -> Self {
        self.context_switch_time = Some(context_switch_time);
        self
    }
}

/// A scheduling policy: picks the next process, then runs it for a slice.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Choose a `Ready` process for the CPU. Must not mutate anything.
    fn select(&self, ctx: &KernelCtx, current: &Event) -> Option<ProcessId>;

    /// Run `process` for one slice starting at `ctx.now()` and return the
    /// event that ends the slice.
    fn dispatch(&mut self, ctx: &mut KernelCtx, process: ProcessId) -> SimResult<Event>;
}

/// Policies that can be built from a `PolicyConfig` alone.
pub trait SchedulerInit: Scheduler + Sized {
    /// Validate parameters and build the policy before the run starts.
    fn init(config: &PolicyConfig) -> SimResult<Self>;
}

/// Run `process` for `slice` ticks, then terminate it if its service is
/// exhausted or hand it back to the ready set with a request due at the
/// end of the slice.
pub(crate) fn grant_slice(
    ctx: &mut KernelCtx,
    process: ProcessId,
    slice: Ticks,
) -> SimResult<Event> {
    ctx.set_running(process)?;
    ctx.run_for(process, slice)?;

    if ctx.process(process)?.remaining_time == 0 {
        let departure = ctx.mark_terminated(process)?;
        Ok(Event::cpu_done(process, departure))
    } else {
        ctx.mark_ready(process)?;
        Ok(Event::cpu_request(process, ctx.busy_until))
    }
}

// Identity lookup shared by FCFS and RR
pub(crate) fn select_event_process(ctx: &KernelCtx, current: &Event) -> Option<ProcessId> {
    ctx.process(current.process)
        .ok()
        .filter(|p| p.is_ready())
        .map(|p| p.id)
}

// First Ready process with the smallest key; strict `<` so earlier entries win ties
pub(crate) fn select_min_by_key<F>(ctx: &KernelCtx, mut key: F) -> Option<ProcessId>
where
    F: FnMut(&crate::core::Process) -> Ticks,
{
    let mut best: Option<(ProcessId, Ticks)> = None;
    for process in ctx.ready_processes() {
        let value = key(process);
        match best {
            Some((_, min)) if min <= value => {}
            _ => best = Some((process.id, value)),
        }
    }
    best.map(|(id, _)| id)
}

/// The closed set of policies, chosen at run time.
#[derive(Debug, Clone)]
pub enum AnyScheduler {
    Fcfs(FcfsScheduler),
    Sjf(SjfScheduler),
    RoundRobin(RoundRobinScheduler),
    Srtf(SrtfScheduler),
}

impl AnyScheduler {
    pub fn new(policy: Policy, config: &PolicyConfig) -> SimResult<Self> {
        Ok(match policy {
            Policy::Fcfs => Self::Fcfs(FcfsScheduler::init(config)?),
            Policy::Sjf => Self::Sjf(SjfScheduler::init(config)?),
            Policy::RoundRobin => Self::RoundRobin(RoundRobinScheduler::init(config)?),
            Policy::Srtf => Self::Srtf(SrtfScheduler::init(config)?),
        })
    }

    pub fn policy(&self) -> Policy {
        match self {
            Self::Fcfs(_) => Policy::Fcfs,
            Self::Sjf(_) => Policy::Sjf,
            Self::RoundRobin(_) => Policy::RoundRobin,
            Self::Srtf(_) => Policy::Srtf,
        }
    }
}

impl Scheduler for AnyScheduler {
    fn name(&self) -> &'static str {
        self.policy().name()
    }

    fn select(&self, ctx: &KernelCtx, current: &Event) -> Option<ProcessId> {
        match self {
            Self::Fcfs(s) => s.select(ctx, current),
            Self::Sjf(s) => s.select(ctx, current),
            Self::RoundRobin(s) => s.select(ctx, current),
            Self::Srtf(s) => s.select(ctx, current),
        }
    }

    fn dispatch(&mut self, ctx: &mut KernelCtx, process: ProcessId) -> SimResult<Event> {
        match self {
            Self::Fcfs(s) => s.dispatch(ctx, process),
            Self::Sjf(s) => s.dispatch(ctx, process),
            Self::RoundRobin(s) => s.dispatch(ctx, process),
            Self::Srtf(s) => s.dispatch(ctx, process),
        }
    }
}
