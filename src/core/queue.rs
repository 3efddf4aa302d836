use keyed_priority_queue::KeyedPriorityQueue;

use super::{
    event::{Event, EventKind},
    state::{ProcessId, Ticks},
};
use crate::error::{SimError, SimResult};

/// Queue position of a pending event: due time, then enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    time: Ticks,
    seq: u64,
    kind: EventKind,
}

// KeyedPriorityQueue is a max-heap, so earliest (time, seq) must compare greatest
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending events keyed by process, so each process holds at most one.
#[derive(Debug)]
pub struct EventQueue {
    pending: KeyedPriorityQueue<ProcessId, Pending>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, event: Event) -> SimResult<()> {
        if self.pending.get_priority(&event.process).is_some() {
            return Err(SimError::DuplicateEvent(event.process));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(
            event.process,
            Pending {
                time: event.time,
                seq,
                kind: event.kind,
            },
        );
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.pending
            .pop()
            .map(|(process, p)| Event::new(process, p.kind, p.time))
    }

    // Pop the head only if it is due at `time`
    pub fn pop_due(&mut self, time: Ticks) -> Option<Event> {
        if self.peek_time()? != time {
            return None;
        }
        self.pop()
    }

    pub fn peek_time(&self) -> Option<Ticks> {
        self.pending.peek().map(|(_, p)| p.time)
    }

    pub fn contains(&self, process: ProcessId) -> bool {
        self.pending.get_priority(&process).is_some()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut EventQueue) -> Vec<Event> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn test_time_ordering() {
        let mut queue = EventQueue::new();
        queue.push(Event::cpu_request(1, 30)).unwrap();
        queue.push(Event::cpu_request(2, 10)).unwrap();
        queue.push(Event::cpu_done(3, 20)).unwrap();

        let times: Vec<Ticks> = drain(&mut queue).iter().map(|e| e.time).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn test_fifo_at_same_time() {
        let mut queue = EventQueue::new();
        for process in [7, 3, 5] {
            queue.push(Event::cpu_request(process, 4)).unwrap();
        }

        let order: Vec<ProcessId> = drain(&mut queue).iter().map(|e| e.process).collect();
        assert_eq!(order, vec![7, 3, 5]);
    }

    #[test]
    fn test_one_event_per_process() {
        let mut queue = EventQueue::new();
        queue.push(Event::cpu_request(1, 0)).unwrap();
        assert_eq!(
            queue.push(Event::cpu_done(1, 5)),
            Err(SimError::DuplicateEvent(1))
        );
        assert_eq!(queue.len(), 1);

        queue.pop();
        assert!(!queue.contains(1));
        queue.push(Event::cpu_done(1, 5)).unwrap();
        assert!(queue.contains(1));
    }

    #[test]
    fn test_pop_due_only_takes_current_time() {
        let mut queue = EventQueue::new();
        queue.push(Event::cpu_request(1, 2)).unwrap();
        queue.push(Event::cpu_request(2, 2)).unwrap();
        queue.push(Event::cpu_request(3, 6)).unwrap();

        assert!(queue.pop_due(1).is_none());
        assert_eq!(queue.pop_due(2).map(|e| e.process), Some(1));
        assert_eq!(queue.pop_due(2).map(|e| e.process), Some(2));
        assert!(queue.pop_due(2).is_none());
        assert_eq!(queue.peek_time(), Some(6));
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = EventQueue::default();
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
        assert!(queue.peek_time().is_none());
    }
}
