//! Run summary and per-job outcomes

use crate::domain::report::{JobStatus, ReportKind};
use std::time::Duration;

/// Terminal result of one report job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub kind: ReportKind,
    pub status: JobStatus,
    /// Records written by the job (0 when it failed before any output)
    pub records: u64,
    pub duration: Duration,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}

/// Aggregated result of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub jobs: Vec<JobOutcome>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_outcome(&mut self, outcome: JobOutcome) {
        self.jobs.push(outcome);
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// True only if every selected job succeeded
    pub fn is_successful(&self) -> bool {
        self.jobs.iter().all(JobOutcome::succeeded)
    }

    pub fn failed_jobs(&self) -> impl Iterator<Item = &JobOutcome> {
        self.jobs.iter().filter(|j| !j.succeeded())
    }

    /// Process exit status: 0 for full success, 1 for any failed report
    pub fn exit_code(&self) -> i32 {
        if self.is_successful() {
            0
        } else {
            1
        }
    }

    /// Log the outcome of every job and the aggregate
    pub fn log_summary(&self) {
        for job in &self.jobs {
            match &job.status {
                JobStatus::Succeeded => tracing::info!(
                    report = %job.kind,
                    records = job.records,
                    duration_secs = job.duration.as_secs(),
                    "Report succeeded"
                ),
                JobStatus::Failed(error) => tracing::error!(
                    report = %job.kind,
                    error = %error,
                    "Report failed"
                ),
                other => tracing::warn!(
                    report = %job.kind,
                    status = ?other,
                    "Report ended in a non-terminal state"
                ),
            }
        }

        tracing::info!(
            total_jobs = self.jobs.len(),
            failed_jobs = self.failed_jobs().count(),
            duration_secs = self.duration.as_secs(),
            "Run complete"
        );
    }
}
