//! Export command implementation
//!
//! Loads the configuration, applies CLI overrides, and drives the
//! report orchestrator. The exit code reflects the aggregate outcome:
//! 0 only when every selected report succeeded.

use crate::config::{load_config_unchecked, secret_string, CofferConfig};
use crate::core::export::{select_reports, ReportOrchestrator};
use crate::domain::CofferError;
use clap::Args;
use std::path::Path;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Vault base URL (overrides the config file)
    #[arg(long, env = "COFFER_VAULT_BASE_URL")]
    pub base_url: Option<String>,

    /// Export the accounts report
    #[arg(long)]
    pub accounts: bool,

    /// Export the users report
    #[arg(long)]
    pub users: bool,

    /// Export the safes report
    #[arg(long)]
    pub safes: bool,

    /// Directory the CSV reports are written into
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Pagination page size
    #[arg(long)]
    pub page_size: Option<u64>,

    /// Maximum request attempts before giving up
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Backoff base delay in seconds
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Accounts search filter, e.g. one safe name
    #[arg(long)]
    pub search: Option<String>,

    /// Vault username (overrides the config file)
    #[arg(long, env = "COFFER_VAULT_USERNAME")]
    pub username: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // A missing config file is fine when the CLI supplies the vault
        // settings; validation below catches a truly incomplete setup.
        let mut config = if Path::new(config_path).exists() {
            load_config_unchecked(config_path)?
        } else {
            tracing::info!(
                config_path = %config_path,
                "Configuration file not found, starting from defaults"
            );
            CofferConfig::default()
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let kinds = select_reports(
            self.accounts,
            self.users,
            self.safes,
            &config.export.reports,
        );
        if kinds.is_empty() {
            tracing::error!("No reports selected");
            eprintln!("No reports selected; pass --accounts, --users, or --safes");
            return Ok(2);
        }

        tracing::info!(
            reports = ?kinds.iter().map(ToString::to_string).collect::<Vec<_>>(),
            output_dir = %config.export.output_dir,
            "Running reports"
        );

        let mut orchestrator = ReportOrchestrator::new(config)?;
        let summary = match orchestrator.run(&kinds).await {
            Ok(summary) => summary,
            Err(CofferError::Vault(e)) => {
                tracing::error!(error = %e, "Run aborted before any report was produced");
                eprintln!("Vault access failed: {e}");
                return Ok(4);
            }
            Err(e) => {
                tracing::error!(error = %e, "Run aborted");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        println!("Report run finished in {:.1}s", summary.duration.as_secs_f64());
        for job in &summary.jobs {
            if job.succeeded() {
                println!("  {}: {} records", job.kind, job.records);
            } else {
                println!("  {}: FAILED", job.kind);
            }
        }

        Ok(summary.exit_code())
    }

    fn apply_overrides(&self, config: &mut CofferConfig) {
        if let Some(base_url) = &self.base_url {
            config.vault.base_url = base_url.clone();
        }
        if let Some(username) = &self.username {
            config.vault.username = Some(username.clone());
        }
        // The password never travels as a CLI argument; it comes from the
        // config file or the COFFER_VAULT_PASSWORD environment variable.
        if config.vault.password.is_none() {
            if let Ok(password) = std::env::var("COFFER_VAULT_PASSWORD") {
                config.vault.password = Some(secret_string(password));
            }
        }
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        if let Some(page_size) = self.page_size {
            config.vault.query.page_size = page_size;
        }
        if let Some(max_retries) = self.max_retries {
            config.vault.retry.max_retries = max_retries;
        }
        if let Some(retry_delay) = self.retry_delay {
            config.vault.retry.base_delay_seconds = retry_delay;
        }
        if let Some(timeout) = self.timeout {
            config.vault.timeout_seconds = timeout;
        }
        if let Some(search) = &self.search {
            config.vault.query.account_search = Some(search.clone());
        }
    }
}
