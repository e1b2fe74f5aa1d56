//! Report orchestration
//!
//! Runs the selected report jobs sequentially against one authenticated
//! vault client. Jobs fail independently: a dead safes endpoint never
//! discards a completed accounts export. Authentication happens once,
//! before the first job; its failure aborts the run with no reports
//! attempted.

use crate::adapters::vault::{verify_unique, PaginatedFetcher, UsersEnvelope, VaultClient};
use crate::config::CofferConfig;
use crate::core::export::columns::{
    account_row, safe_row, user_group_rows, user_row, ACCOUNT_COLUMNS, SAFE_COLUMNS,
    USER_COLUMNS, USER_GROUP_COLUMNS,
};
use crate::core::export::summary::{JobOutcome, RunSummary};
use crate::core::export::writer::CsvExporter;
use crate::domain::records::{Account, Safe};
use crate::domain::report::{ReportJob, ReportKind};
use crate::domain::{CofferError, Result, VaultError};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Additional output of the users job
const USER_GROUPS_FILE: &str = "user_groups.csv";

/// Coordinates a full report run
pub struct ReportOrchestrator {
    client: VaultClient,
    config: CofferConfig,
}

impl ReportOrchestrator {
    /// Create an orchestrator from validated configuration
    pub fn new(config: CofferConfig) -> Result<Self> {
        let client = VaultClient::new(&config.vault)?;
        Ok(Self { client, config })
    }

    /// Authenticate and run the selected reports in declared order
    ///
    /// # Errors
    ///
    /// Only pre-report failures (authentication, output directory) are
    /// returned as `Err`; report failures are captured in the summary.
    pub async fn run(&mut self, kinds: &[ReportKind]) -> Result<RunSummary> {
        let run_start = Instant::now();

        self.client.logon().await?;

        std::fs::create_dir_all(&self.config.export.output_dir).map_err(|e| {
            CofferError::Export(format!(
                "failed to create output directory {}: {e}",
                self.config.export.output_dir
            ))
        })?;

        let mut summary = RunSummary::new();

        for &kind in kinds {
            let mut job = ReportJob::new(kind);
            job.start();
            tracing::info!(report = %kind, "Starting report");

            let job_start = Instant::now();
            let result = match kind {
                ReportKind::Accounts => self.export_accounts().await,
                ReportKind::Users => self.export_users().await,
                ReportKind::Safes => self.export_safes().await,
            };

            let records = match result {
                Ok(records) => {
                    job.succeed();
                    records
                }
                Err(error) => {
                    tracing::error!(report = %kind, error = %error, "Report failed");
                    job.fail(error.to_string());
                    0
                }
            };

            summary.add_outcome(JobOutcome {
                kind,
                status: job.status().clone(),
                records,
                duration: job_start.elapsed(),
            });
        }

        let summary = summary.with_duration(run_start.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.config.export.output_dir).join(file_name)
    }

    async fn export_accounts(&mut self) -> Result<u64> {
        let path = self.output_path(ReportKind::Accounts.file_name());
        let mut exporter =
            CsvExporter::create(&path, ACCOUNT_COLUMNS, self.config.export.flush_interval)?;

        let filters: Vec<(String, String)> = self
            .config
            .vault
            .query
            .account_search
            .iter()
            .map(|s| ("search".to_string(), s.clone()))
            .collect();

        let page_size = self.config.vault.query.page_size;
        let mut fetcher = PaginatedFetcher::new(&mut self.client, page_size);
        fetcher
            .fetch_all::<Account, _>("api/accounts", &filters, |batch| {
                exporter.write_batch(batch.iter().map(account_row).collect())
            })
            .await?;

        exporter.finish()
    }

    async fn export_safes(&mut self) -> Result<u64> {
        let path = self.output_path(ReportKind::Safes.file_name());
        let mut exporter =
            CsvExporter::create(&path, SAFE_COLUMNS, self.config.export.flush_interval)?;

        let page_size = self.config.vault.query.page_size;
        let mut fetcher = PaginatedFetcher::new(&mut self.client, page_size);
        fetcher
            .fetch_all::<Safe, _>("api/safes", &[], |batch| {
                exporter.write_batch(batch.iter().map(safe_row).collect())
            })
            .await?;

        exporter.finish()
    }

    /// The users endpoint is single-shot upstream, so it goes through
    /// the requester directly and produces two files: details and group
    /// memberships.
    async fn export_users(&mut self) -> Result<u64> {
        let query = [("extendedDetails".to_string(), "true".to_string())];
        let body = self.client.get_json("api/users", &query).await?;

        let envelope: UsersEnvelope = serde_json::from_value(body).map_err(|e| {
            CofferError::Vault(VaultError::InvalidResponse(format!(
                "unexpected users response shape: {e}"
            )))
        })?;
        verify_unique(&envelope.users, "api/users")?;

        tracing::info!(
            users = envelope.users.len(),
            reported_total = envelope.total,
            "Fetched user listing"
        );

        let flush_interval = self.config.export.flush_interval;

        let details_path = self.output_path(ReportKind::Users.file_name());
        let mut details = CsvExporter::create(&details_path, USER_COLUMNS, flush_interval)?;
        details.write_batch(envelope.users.iter().map(user_row).collect())?;
        let written = details.finish()?;

        let groups_path = self.output_path(USER_GROUPS_FILE);
        let mut groups = CsvExporter::create(&groups_path, USER_GROUP_COLUMNS, flush_interval)?;
        groups.write_batch(
            envelope
                .users
                .iter()
                .flat_map(|u| user_group_rows(u))
                .collect(),
        )?;
        groups.finish()?;

        Ok(written)
    }
}

/// Resolve the report kinds a run should produce, in stable order.
///
/// CLI switches win over the config list; with neither present every
/// report runs.
pub fn select_reports(
    cli_accounts: bool,
    cli_users: bool,
    cli_safes: bool,
    configured: &[String],
) -> Vec<ReportKind> {
    if cli_accounts || cli_users || cli_safes {
        let mut kinds = Vec::new();
        if cli_accounts {
            kinds.push(ReportKind::Accounts);
        }
        if cli_users {
            kinds.push(ReportKind::Users);
        }
        if cli_safes {
            kinds.push(ReportKind::Safes);
        }
        return kinds;
    }

    if configured.is_empty() {
        return ReportKind::ALL.to_vec();
    }

    ReportKind::ALL
        .iter()
        .copied()
        .filter(|kind| configured.iter().any(|name| name == &kind.to_string()))
        .collect()
}
