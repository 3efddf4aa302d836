use average::{Estimate, Mean};

use super::job::ProcessOutcome;
use crate::core::Ticks;

/// Aggregate statistics over the finished processes of one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub completed: usize,
    pub mean_turnaround: f64,
    pub mean_waiting: f64,
    /// Processes completed per tick between first arrival and last departure.
    pub throughput: f64,
    /// Fraction of the makespan the CPU spent serving processes.
    pub utilization: f64,
    pub makespan: Ticks,
}

impl Summary {
    /// Unfinished processes are left out of every figure.
    pub fn from_outcomes(outcomes: &[ProcessOutcome]) -> Self {
        let finished: Vec<&ProcessOutcome> = outcomes
            .iter()
            .filter(|o| o.departure_time.is_some())
            .collect();

        let start = finished.iter().map(|o| o.arrival_time).min().unwrap_or(0);
        let end = finished
            .iter()
            .filter_map(|o| o.departure_time)
            .max()
            .unwrap_or(start);
        let makespan = end - start;
        let busy: Ticks = finished.iter().map(|o| o.service_time).sum();

        Self {
            completed: finished.len(),
            mean_turnaround: avg(finished.iter().filter_map(|o| o.turnaround_time())),
            mean_waiting: avg(finished.iter().filter_map(|o| o.waiting_time())),
            throughput: ratio(finished.len() as f64, makespan),
            utilization: ratio(busy as f64, makespan),
            makespan,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "completed={} turnaround={:.2} waiting={:.2} \
             throughput={:.4}/tick utilization={:.1}% makespan={}",
            self.completed,
            self.mean_turnaround,
            self.mean_waiting,
            self.throughput,
            self.utilization * 100.0,
            self.makespan
        )
    }
}

fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    let mean: Mean = iter.map(|t| t as f64).collect();
    if mean.is_empty() { 0.0 } else { mean.estimate() }
}

fn ratio(numerator: f64, makespan: Ticks) -> f64 {
    if makespan == 0 {
        0.0
    } else {
        numerator / makespan as f64
    }
}
