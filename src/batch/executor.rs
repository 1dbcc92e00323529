//! Batch executor: runs jobs sequentially against a session and collects a report.

use crate::batch::plan::{BatchJob, FailurePolicy};
use crate::error::{EvgenError, SessionError};
use crate::session::GeneratorSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub directory: String,
    pub action: String,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub policy: FailurePolicy,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&JobStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Skipped(_)))
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }
}

/// Drives a sequence of [`BatchJob`]s through one session.
pub struct BatchExecutor {
    policy: FailurePolicy,
}

impl BatchExecutor {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run every job in order. Under [`FailurePolicy::FailFast`] the first
    /// failure aborts with [`EvgenError::BatchAborted`]; under
    /// [`FailurePolicy::BestEffort`] later jobs for the failed directory are
    /// skipped and the rest continue.
    pub fn execute(
        &self,
        session: &GeneratorSession,
        jobs: &[BatchJob],
    ) -> Result<BatchReport, EvgenError> {
        let started_at = Utc::now();
        info!(jobs = jobs.len(), policy = ?self.policy, "Batch started");

        let mut outcomes = Vec::with_capacity(jobs.len());
        let mut failed_dirs: HashSet<String> = HashSet::new();

        for job in jobs {
            let directory = job.directory().to_string();
            let action = job.action();

            if failed_dirs.contains(&directory) {
                warn!(directory = %directory, action = %action, "Skipping job after earlier failure");
                outcomes.push(JobOutcome {
                    directory,
                    action,
                    status: JobStatus::Skipped("earlier step for this directory failed".to_string()),
                });
                continue;
            }

            match self.run_job(session, job) {
                Ok(()) => outcomes.push(JobOutcome {
                    directory,
                    action,
                    status: JobStatus::Succeeded,
                }),
                Err(err) => {
                    error!(directory = %directory, action = %action, error = %err, "Batch job failed");
                    if self.policy == FailurePolicy::FailFast {
                        return Err(EvgenError::BatchAborted {
                            directory,
                            source: err,
                        });
                    }
                    outcomes.push(JobOutcome {
                        directory: directory.clone(),
                        action,
                        status: JobStatus::Failed(err.to_string()),
                    });
                    failed_dirs.insert(directory);
                }
            }
        }

        let report = BatchReport {
            policy: self.policy,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Batch finished"
        );
        Ok(report)
    }

    fn run_job(&self, session: &GeneratorSession, job: &BatchJob) -> Result<(), SessionError> {
        match job {
            BatchJob::Materialize {
                directory,
                process,
                extra_radiation,
            } => session
                .materialize_process(process, directory, *extra_radiation)
                .map(|_| ()),
            BatchJob::Generate {
                directory,
                run,
                options,
            } => session.generate_events(directory, run, options).map(|_| ()),
        }
    }
}
