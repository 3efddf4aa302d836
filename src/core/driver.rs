use log::{debug, info, trace};

use super::{
    event::{Event, EventKind, SchedCoreEvent},
    observer::Observer,
    state::{KernelCtx, ProcessState, Ticks},
};
use crate::{
    error::{SimError, SimResult},
    scheduler::Scheduler,
};

/// One simulation session: the engine state plus the active policy.
pub struct SchedCore<S: Scheduler> {
    pub ctx: KernelCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            ctx: KernelCtx::new(),
            scheduler,
            observer: Observer::new(),
        }
    }

    /// Advance to the next pending timestamp, fire every event due then,
    /// and take at most one scheduling decision.
    ///
    /// Returns an empty trace once the queue is drained.
    pub fn step(&mut self) -> SimResult<Vec<SchedCoreEvent>> {
        let mut trace = Vec::new();
        let now = match self.ctx.events.peek_time() {
            Some(time) => time,
            None => return Ok(trace),
        };
        if now < self.ctx.now {
            return Err(SimError::TemporalInversion {
                event_time: now,
                clock: self.ctx.now,
            });
        }
        self.ctx.now = now;

        // Fire the whole batch first so selection sees every request due now
        while let Some(event) = self.ctx.events.pop_due(now) {
            self.fire(event, &mut trace)?;
        }

        if self.ctx.cpu_is_idle() {
            match self.ctx.ready.front().copied() {
                Some(current) => self.decide(current, &mut trace)?,
                None => trace.push(SchedCoreEvent::CpuIdle { at: now }),
            }
        }

        self.observer.observe(&self.ctx);
        Ok(trace)
    }

    fn fire(&mut self, event: Event, trace: &mut Vec<SchedCoreEvent>) -> SimResult<()> {
        trace!("t={} {:?} P{}", event.time, event.kind, event.process);
        trace.push(SchedCoreEvent::EventFired { event });

        let state = self.ctx.process(event.process)?.state;
        match (event.kind, state) {
            // Arrival
            (EventKind::CpuRequest, ProcessState::New) => {
                self.ctx.processes[self.ctx.index[&event.process]].state = ProcessState::Ready;
                trace.push(SchedCoreEvent::ProcessStateChange {
                    process: event.process,
                    from: ProcessState::New,
                    to: ProcessState::Ready,
                });
                self.ctx.ready.push_back(event);
            }
            // Slice ended by preemption
            (EventKind::CpuRequest, ProcessState::Ready) => self.ctx.ready.push_back(event),
            (EventKind::CpuDone, ProcessState::Terminated) => {}
            (_, state) => return Err(SimError::UnexpectedEvent { event, state }),
        }
        Ok(())
    }

    fn decide(&mut self, current: Event, trace: &mut Vec<SchedCoreEvent>) -> SimResult<()> {
        let now = self.ctx.now;
        let selected = self
            .scheduler
            .select(&self.ctx, &current)
            .ok_or(SimError::SelectionInconsistency { at: now, event: current })?;

        let state = self.ctx.process(selected)?.state;
        if state != ProcessState::Ready || self.ctx.take_ready(selected).is_none() {
            return Err(SimError::NotReady {
                process: selected,
                state,
            });
        }

        let previous = self.ctx.on_cpu;
        if previous != Some(selected) {
            debug!(
                "t={} {} context switch {:?} -> P{}",
                now,
                self.scheduler.name(),
                previous,
                selected
            );
            trace.push(SchedCoreEvent::ContextSwitch {
                at: now,
                from: previous,
                to: selected,
            });
        }

        trace.push(SchedCoreEvent::ProcessStateChange {
            process: selected,
            from: ProcessState::Ready,
            to: ProcessState::Running,
        });

        let before = self.ctx.process(selected)?.remaining_time;
        let outcome = self.scheduler.dispatch(&mut self.ctx, selected)?;
        let after = self.ctx.process(selected)?;
        let slice = before - after.remaining_time;

        if outcome.time < now {
            return Err(SimError::TemporalInversion {
                event_time: outcome.time,
                clock: now,
            });
        }
        debug!(
            "t={} {} ran P{} for {} -> {:?} at t={}",
            now,
            self.scheduler.name(),
            selected,
            slice,
            outcome.kind,
            outcome.time
        );

        let settled = after.state;
        trace.push(SchedCoreEvent::Dispatched {
            process: selected,
            at: now,
            slice,
            outcome,
        });
        // Running is transient within a dispatch; record where the slice left it
        trace.push(SchedCoreEvent::ProcessStateChange {
            process: selected,
            from: ProcessState::Running,
            to: settled,
        });

        self.ctx.events.push(outcome)
    }

    /// Step until the queue drains, then check that every process finished.
    pub fn run(&mut self) -> SimResult<Vec<SchedCoreEvent>> {
        info!(
            "{} run starting with {} processes",
            self.scheduler.name(),
            self.ctx.processes.len()
        );

        let mut trace = Vec::new();
        while !self.ctx.events.is_empty() {
            trace.extend(self.step()?);
        }

        if let Some(p) = self
            .ctx
            .processes
            .iter()
            .find(|p| p.state != ProcessState::Terminated)
        {
            return Err(SimError::Unfinished {
                process: p.id,
                state: p.state,
            });
        }

        info!(
            "{} run finished at t={} after {} steps",
            self.scheduler.name(),
            self.ctx.now,
            self.observer.steps()
        );
        Ok(trace)
    }

    pub fn is_finished(&self) -> bool {
        self.ctx.events.is_empty()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
