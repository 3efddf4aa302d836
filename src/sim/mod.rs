pub mod driver;
pub mod job;
pub mod report;
pub mod workload;

pub use driver::Sim;
pub use job::{Job, ProcessOutcome};
pub use report::Summary;
pub use workload::exponential_jobs;
