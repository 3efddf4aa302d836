use std::io::Write;

use env_logger::Builder;
use sched_des::{Policy, PolicyConfig, Sim, SimResult, Summary, sim::exponential_jobs};

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run() {
        eprintln!("simulation failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let jobs = exponential_jobs(1000, 5.0, 4.0, 0)?;
    let config = PolicyConfig::default()
        .with_quantum(2)
        .with_context_switch_time(1);

    for policy in Policy::ALL {
        let mut sim = Sim::with_policy(jobs.clone(), policy, &config)?;
        sim.run()?;

        let summary = Summary::from_outcomes(&sim.outcomes());
        println!("{:<4} {}", policy, summary);
    }

    Ok(())
}
