//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid.");
                println!("  Vault: {}", config.vault.base_url);
                println!("  Output directory: {}", config.export.output_dir);
                println!(
                    "  Reports: {}",
                    if config.export.reports.is_empty() {
                        "all".to_string()
                    } else {
                        config.export.reports.join(", ")
                    }
                );
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Configuration is invalid");
                eprintln!("Configuration is invalid: {e}");
                Ok(2)
            }
        }
    }
}
