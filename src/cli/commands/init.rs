//! Init command implementation
//!
//! Writes a starter configuration file with commented defaults.

use clap::Args;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Coffer configuration

[application]
name = "coffer"
log_level = "info"

[vault]
# Base URL of the vault web service
base_url = "https://vault.example.com/PasswordVault"
# Path segment of the logon endpoint: api/auth/<provider>/logon
auth_provider = "ldap"
username = "auditor"
# Keep the password out of the file; reference an environment variable
password = "${COFFER_VAULT_PASSWORD}"
tls_verify = true
timeout_seconds = 30

[vault.retry]
max_retries = 3
base_delay_seconds = 5

[vault.query]
page_size = 100
# Optional accounts search filter, e.g. one safe name
# account_search = "Finance"

[export]
output_dir = "reports"
# Subset of ["accounts", "users", "safes"]; empty means all
reports = []
flush_interval = 50000

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,

    /// Where to write the configuration file
    #[arg(short, long, default_value = "coffer.toml")]
    pub output: String,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);

        if path.exists() && !self.force {
            eprintln!(
                "{} already exists; pass --force to overwrite",
                path.display()
            );
            return Ok(2);
        }

        std::fs::write(path, CONFIG_TEMPLATE)?;
        tracing::info!(path = %path.display(), "Wrote starter configuration");
        println!("Wrote {}", path.display());
        println!("Set COFFER_VAULT_PASSWORD before running an export.");
        Ok(0)
    }
}
