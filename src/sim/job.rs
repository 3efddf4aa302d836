use crate::core::{ProcessId, Ticks};

/// One workload record as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
}

impl Job {
    pub fn new(id: ProcessId, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
        }
    }
}

/// What the reporting layer gets back for each process.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessOutcome {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub departure_time: Option<Ticks>,
}

impl ProcessOutcome {
    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.departure_time.and_then(|d| d.checked_sub(self.arrival_time))
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        self.turnaround_time().and_then(|t| t.checked_sub(self.service_time))
    }
}
