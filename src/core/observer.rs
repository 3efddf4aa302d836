use super::state::{KernelCtx, ProcessState};

/// Debug-build invariant checks, run after every engine step.
#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &KernelCtx) {
        self.step += 1;
        if !cfg!(debug_assertions) {
            return;
        }

        for p in &ctx.processes {
            debug_assert!(
                p.remaining_time <= p.service_time,
                "P{} has more remaining ({}) than service ({})",
                p.id,
                p.remaining_time,
                p.service_time
            );

            // Dispatch resolves within the step
            debug_assert_ne!(
                p.state,
                ProcessState::Running,
                "P{} left Running between steps",
                p.id
            );

            let queued = ctx.events.contains(p.id);
            let waiting = ctx.ready_queue().filter(|e| e.process == p.id).count();
            match p.state {
                ProcessState::Terminated => {
                    debug_assert_eq!(p.remaining_time, 0, "P{} terminated early", p.id);
                    debug_assert!(
                        p.departure_time.is_some_and(|d| d <= ctx.busy_until.max(ctx.now)),
                        "P{} terminated without a departure time",
                        p.id
                    );
                    debug_assert_eq!(waiting, 0, "Terminated P{} still in ready queue", p.id);
                }
                ProcessState::Ready => {
                    debug_assert_eq!(
                        usize::from(queued) + waiting,
                        1,
                        "Ready P{} must hold exactly one outstanding request",
                        p.id
                    );
                }
                ProcessState::New => {
                    debug_assert!(queued, "P{} never arrives", p.id);
                    debug_assert_eq!(waiting, 0);
                }
                ProcessState::Running => {}
            }
        }

        if let Some(pid) = ctx.on_cpu {
            debug_assert!(
                ctx.index.contains_key(&pid),
                "on_cpu references unknown P{pid}"
            );
        }
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}
