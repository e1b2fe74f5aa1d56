//! Report job types
//!
//! A run consists of up to three independent report jobs. Each job moves
//! Pending -> Running -> {Succeeded, Failed} exactly once; a failed job
//! never blocks its siblings.

use std::fmt;

/// The report kinds a run can produce, in their stable execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Accounts,
    Users,
    Safes,
}

impl ReportKind {
    /// All kinds in execution order
    pub const ALL: [ReportKind; 3] = [ReportKind::Accounts, ReportKind::Users, ReportKind::Safes];

    /// Primary CSV file name for this report
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Accounts => "accounts.csv",
            ReportKind::Users => "users.csv",
            ReportKind::Safes => "safes.csv",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::Accounts => "accounts",
            ReportKind::Users => "users",
            ReportKind::Safes => "safes",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle state of a single report job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed(String),
}

impl JobStatus {
    /// Whether the job has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed(_))
    }
}

/// One report job and its status
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub kind: ReportKind,
    status: JobStatus,
}

impl ReportJob {
    /// Create a pending job for a report kind
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            status: JobStatus::Pending,
        }
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Transition Pending -> Running
    pub fn start(&mut self) {
        debug_assert_eq!(self.status, JobStatus::Pending);
        self.status = JobStatus::Running;
    }

    /// Transition Running -> Succeeded
    pub fn succeed(&mut self) {
        debug_assert!(!self.status.is_terminal());
        self.status = JobStatus::Succeeded;
    }

    /// Transition Running -> Failed with the error message
    pub fn fail(&mut self, error: impl Into<String>) {
        debug_assert!(!self.status.is_terminal());
        self.status = JobStatus::Failed(error.into());
    }

    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}
