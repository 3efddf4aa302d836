use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use super::{event::Event, queue::EventQueue};
use crate::error::{SimError, SimResult};

pub type ProcessId = u64;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Terminated,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub remaining_time: Ticks,
    pub departure_time: Option<Ticks>,
    pub state: ProcessState,
}

impl Process {
    pub fn new(id: ProcessId, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            remaining_time: service_time,
            departure_time: None,
            state: ProcessState::New,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProcessState::Ready
    }
}

/// Engine state for one simulation session.
///
/// Policies only see this through `&KernelCtx` during selection and
/// `&mut KernelCtx` during dispatch; the mutators they may call are
/// `set_running`, `run_for`, `mark_ready` and `mark_terminated`.
#[derive(Debug)]
pub struct KernelCtx {
    pub(crate) now: Ticks,
    // End of the slice occupying the CPU; the CPU is idle once now >= busy_until
    pub(crate) busy_until: Ticks,
    // Last process dispatched, whether or not it still holds the CPU
    pub(crate) on_cpu: Option<ProcessId>,
    pub(crate) processes: Vec<Process>,
    pub(crate) index: FxHashMap<ProcessId, usize>,
    pub(crate) events: EventQueue,
    // Fired CpuRequest events whose process has not been dispatched since
    pub(crate) ready: VecDeque<Event>,
}

impl KernelCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            busy_until: 0,
            on_cpu: None,
            processes: Vec::new(),
            index: FxHashMap::default(),
            events: EventQueue::new(),
            ready: VecDeque::new(),
        }
    }

    /// Admit a process and queue its arrival request.
    pub fn create_process(
        &mut self,
        id: ProcessId,
        arrival_time: Ticks,
        service_time: Ticks,
    ) -> SimResult<()> {
        if self.index.contains_key(&id) {
            return Err(SimError::DuplicateProcess(id));
        }
        if arrival_time < self.now {
            return Err(SimError::TemporalInversion {
                event_time: arrival_time,
                clock: self.now,
            });
        }

        self.events.push(Event::cpu_request(id, arrival_time))?;
        self.index.insert(id, self.processes.len());
        self.processes.push(Process::new(id, arrival_time, service_time));
        Ok(())
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn on_cpu(&self) -> Option<ProcessId> {
        self.on_cpu
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.busy_until <= self.now
    }

    /// Time of the earliest pending event, if any.
    pub fn next_event_time(&self) -> Option<Ticks> {
        self.events.peek_time()
    }

    pub fn process(&self, id: ProcessId) -> SimResult<&Process> {
        self.index
            .get(&id)
            .map(|&i| &self.processes[i])
            .ok_or(SimError::UnknownProcess(id))
    }

    fn process_mut(&mut self, id: ProcessId) -> SimResult<&mut Process> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.processes[i]),
            None => Err(SimError::UnknownProcess(id)),
        }
    }

    /// All processes in insertion order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// `Ready` processes in insertion order.
    pub fn ready_processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.is_ready())
    }

    pub(crate) fn ready_queue(&self) -> impl Iterator<Item = &Event> {
        self.ready.iter()
    }

    // Drop the ready-queue entry of a process about to be dispatched
    pub(crate) fn take_ready(&mut self, id: ProcessId) -> Option<Event> {
        let pos = self.ready.iter().position(|e| e.process == id)?;
        self.ready.remove(pos)
    }

    // Return previous state
    pub fn set_running(&mut self, id: ProcessId) -> SimResult<ProcessState> {
        let process = self.process_mut(id)?;
        let prev_state = process.state;
        if prev_state != ProcessState::Ready {
            return Err(SimError::NotReady {
                process: id,
                state: prev_state,
            });
        }
        process.state = ProcessState::Running;
        self.on_cpu = Some(id);
        Ok(prev_state)
    }

    /// Consume `slice` ticks of CPU for a running process starting now.
    pub fn run_for(&mut self, id: ProcessId, slice: Ticks) -> SimResult<()> {
        let now = self.now;
        let process = self.process_mut(id)?;
        debug_assert_eq!(
            process.state,
            ProcessState::Running,
            "P{id} must be running to consume CPU"
        );
        debug_assert!(
            slice <= process.remaining_time,
            "P{id} granted {slice} ticks with only {} remaining",
            process.remaining_time
        );

        let end = now
            .checked_add(slice)
            .ok_or(SimError::ClockOverflow { at: now, slice })?;
        process.remaining_time = process.remaining_time.saturating_sub(slice);
        self.busy_until = end;
        Ok(())
    }

    pub fn mark_ready(&mut self, id: ProcessId) -> SimResult<()> {
        let process = self.process_mut(id)?;
        debug_assert!(
            process.remaining_time > 0,
            "P{id} preempted with nothing left to run"
        );
        debug_assert_eq!(process.state, ProcessState::Running);
        process.state = ProcessState::Ready;
        Ok(())
    }

    /// Terminate a running process at the end of its current slice.
    pub fn mark_terminated(&mut self, id: ProcessId) -> SimResult<Ticks> {
        let departure = self.busy_until;
        let process = self.process_mut(id)?;
        debug_assert_eq!(
            process.remaining_time, 0,
            "P{id} terminated with service left"
        );
        debug_assert_eq!(process.state, ProcessState::Running);
        process.state = ProcessState::Terminated;
        process.departure_time = Some(departure);
        Ok(departure)
    }
}

impl Default for KernelCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(procs: &[(ProcessId, Ticks, Ticks)]) -> KernelCtx {
        let mut ctx = KernelCtx::new();
        for &(id, arrival, service) in procs {
            ctx.create_process(id, arrival, service).unwrap();
        }
        ctx
    }

    #[test]
    fn test_create_process_queues_arrival() {
        let ctx = ctx_with(&[(1, 4, 3)]);
        let p = ctx.process(1).unwrap();
        assert_eq!(p.state, ProcessState::New);
        assert_eq!(p.remaining_time, 3);
        assert_eq!(ctx.next_event_time(), Some(4));
    }

    #[test]
    fn test_duplicate_process_rejected() {
        let mut ctx = ctx_with(&[(1, 0, 3)]);
        assert_eq!(
            ctx.create_process(1, 2, 2),
            Err(SimError::DuplicateProcess(1))
        );
        assert_eq!(ctx.processes().len(), 1);
    }

    #[test]
    fn test_unknown_process() {
        let ctx = KernelCtx::new();
        assert_eq!(ctx.process(9).unwrap_err(), SimError::UnknownProcess(9));
    }

    #[test]
    fn test_set_running_requires_ready() {
        let mut ctx = ctx_with(&[(1, 0, 3)]);
        assert_eq!(
            ctx.set_running(1),
            Err(SimError::NotReady {
                process: 1,
                state: ProcessState::New
            })
        );

        ctx.processes[0].state = ProcessState::Ready;
        assert_eq!(ctx.set_running(1), Ok(ProcessState::Ready));
        assert_eq!(ctx.on_cpu(), Some(1));
    }

    #[test]
    fn test_run_then_terminate() {
        let mut ctx = ctx_with(&[(1, 0, 3)]);
        ctx.now = 2;
        ctx.processes[0].state = ProcessState::Ready;
        ctx.set_running(1).unwrap();
        ctx.run_for(1, 3).unwrap();
        assert!(!ctx.cpu_is_idle());

        assert_eq!(ctx.mark_terminated(1), Ok(5));
        let p = ctx.process(1).unwrap();
        assert_eq!(p.remaining_time, 0);
        assert_eq!(p.departure_time, Some(5));
        assert_eq!(p.state, ProcessState::Terminated);
    }

    #[test]
    fn test_partial_run_then_ready() {
        let mut ctx = ctx_with(&[(1, 0, 5)]);
        ctx.processes[0].state = ProcessState::Ready;
        ctx.set_running(1).unwrap();
        ctx.run_for(1, 2).unwrap();
        ctx.mark_ready(1).unwrap();

        let p = ctx.process(1).unwrap();
        assert_eq!(p.remaining_time, 3);
        assert!(p.is_ready());
        assert!(p.departure_time.is_none());
    }

    #[test]
    fn test_ready_processes_keep_insertion_order() {
        let mut ctx = ctx_with(&[(5, 0, 1), (2, 0, 1), (9, 0, 1)]);
        for p in ctx.processes.iter_mut() {
            p.state = ProcessState::Ready;
        }
        ctx.processes[1].state = ProcessState::Terminated;

        let ids: Vec<ProcessId> = ctx.ready_processes().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[test]
    fn test_arrival_before_clock_rejected() {
        let mut ctx = KernelCtx::new();
        ctx.now = 10;
        assert_eq!(
            ctx.create_process(1, 3, 2),
            Err(SimError::TemporalInversion {
                event_time: 3,
                clock: 10
            })
        );
        assert!(ctx.processes().is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_run_past_end_of_clock_rejected() {
        let mut ctx = ctx_with(&[(1, u64::MAX - 1, 5)]);
        ctx.now = u64::MAX - 1;
        ctx.processes[0].state = ProcessState::Ready;
        ctx.set_running(1).unwrap();
        assert_eq!(
            ctx.run_for(1, 5),
            Err(SimError::ClockOverflow {
                at: u64::MAX - 1,
                slice: 5
            })
        );
        // Nothing consumed
        assert_eq!(ctx.process(1).unwrap().remaining_time, 5);
        assert!(ctx.cpu_is_idle());
    }
}
