use super::job::{Job, ProcessOutcome};
use crate::{
    core::{SchedCore, SchedCoreEvent, state::Process},
    error::SimResult,
    scheduler::{AnyScheduler, Policy, PolicyConfig, Scheduler, SchedulerInit},
};

/// A workload bound to one engine session.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    /// Load `jobs` in the order given; that order is the process set's
    /// insertion order, which SJF and SRTF use to break ties.
    pub fn new(jobs: Vec<Job>, scheduler: S) -> SimResult<Self> {
        let mut core = SchedCore::new(scheduler);
        for job in jobs {
            core.ctx
                .create_process(job.id, job.arrival_time, job.service_time)?;
        }
        Ok(Self { core })
    }

    pub fn step(&mut self) -> SimResult<Vec<SchedCoreEvent>> {
        self.core.step()
    }

    pub fn run(&mut self) -> SimResult<Vec<SchedCoreEvent>> {
        self.core.run()
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core
            .ctx
            .processes()
            .iter()
            .all(|p| p.departure_time.is_some())
    }

    pub fn outcomes(&self) -> Vec<ProcessOutcome> {
        self.core
            .ctx
            .processes()
            .iter()
            .map(|p| ProcessOutcome {
                id: p.id,
                arrival_time: p.arrival_time,
                service_time: p.service_time,
                departure_time: p.departure_time,
            })
            .collect()
    }

    pub fn jobs_map<'a, T>(
        &'a self,
        f: impl FnMut(&'a Process) -> T + 'a,
    ) -> impl Iterator<Item = T> + 'a {
        self.core.ctx.processes().iter().map(f)
    }
}

impl<S: SchedulerInit> Sim<S> {
    pub fn from_config(jobs: Vec<Job>, config: &PolicyConfig) -> SimResult<Self> {
        Self::new(jobs, S::init(config)?)
    }
}

impl Sim<AnyScheduler> {
    pub fn with_policy(jobs: Vec<Job>, policy: Policy, config: &PolicyConfig) -> SimResult<Self> {
        Self::new(jobs, AnyScheduler::new(policy, config)?)
    }
}
