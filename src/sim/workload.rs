use rand::prelude::*;
use rand_distr::Exp;

use super::job::Job;
use crate::error::{SimError, SimResult};

/// Poisson arrivals with exponentially distributed service demand.
///
/// The first job arrives at t=0; ids follow arrival order. Service times
/// are rounded up to whole ticks and are at least one tick.
pub fn exponential_jobs(
    count: usize,
    mean_interarrival: f64,
    mean_service: f64,
    seed: u64,
) -> SimResult<Vec<Job>> {
    let interarrival = exp_with_mean("mean_interarrival", mean_interarrival)?;
    let service = exp_with_mean("mean_service", mean_service)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut clock = 0.0_f64;
    let mut jobs = Vec::with_capacity(count);
    for id in 0..count {
        if id > 0 {
            clock += interarrival.sample(&mut rng);
        }
        let service_time = service.sample(&mut rng).ceil().max(1.0);
        jobs.push(Job::new(id as u64, clock.floor() as u64, service_time as u64));
    }

    Ok(jobs)
}

fn exp_with_mean(name: &str, mean: f64) -> SimResult<Exp<f64>> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(SimError::InvalidWorkload(format!(
            "{name} must be positive and finite, got {mean}"
        )));
    }
    Exp::new(1.0 / mean).map_err(|e| SimError::InvalidWorkload(format!("{name}: {e}")))
}
