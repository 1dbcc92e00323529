//! Batch driving: run plans, the threshold scan, and the executor that feeds
//! their jobs through a generator session under a failure policy.

pub mod executor;
pub mod plan;
pub mod scan;

pub use executor::{BatchExecutor, BatchReport, JobOutcome, JobStatus};
pub use plan::{BatchJob, FailurePolicy, PlannedProcess, PlannedRun, RunPlan};
pub use scan::{ScanProcess, ThresholdScan};
