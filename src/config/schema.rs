//! Configuration schema
//!
//! Type-safe configuration structs for Coffer, deserialized from TOML
//! with defaults and validated on load.

use crate::config::secret::SecretString;
use crate::domain::{CofferError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for Coffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CofferConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    pub vault: VaultConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for CofferConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            vault: VaultConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CofferConfig {
    /// Validate the full configuration
    ///
    /// # Errors
    ///
    /// Returns `CofferError::Configuration` describing the first invalid
    /// setting encountered.
    pub fn validate(&self) -> Result<()> {
        self.vault.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Vault connection, authentication, and request behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Base URL of the vault web service, e.g. `https://vault.example.com/PasswordVault`
    #[serde(default)]
    pub base_url: String,

    /// Authentication provider path segment of the logon endpoint
    #[serde(default = "default_auth_provider")]
    pub auth_provider: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<SecretString>,

    /// Verify TLS certificates when connecting
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

impl VaultConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CofferError::Configuration(
                "vault.base_url is required (set it in the config file or pass --base-url)"
                    .to_string(),
            ));
        }

        Url::parse(&self.base_url).map_err(|e| {
            CofferError::Configuration(format!("vault.base_url is not a valid URL: {e}"))
        })?;

        if self.auth_provider.trim().is_empty() {
            return Err(CofferError::Configuration(
                "vault.auth_provider must not be empty".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(CofferError::Configuration(
                "vault.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        self.retry.validate()?;
        self.query.validate()?;
        Ok(())
    }

    /// Base URL with any trailing slash removed, for joining endpoint paths
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_provider: default_auth_provider(),
            username: None,
            password: None,
            tls_verify: true,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

/// Retry behavior for transient request failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum request attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base delay in seconds; attempt n sleeps base * 2^(n-1)
    #[serde(default = "default_base_delay_seconds")]
    pub base_delay_seconds: u64,
}

impl RetryConfig {
    fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(CofferError::Configuration(
                "vault.retry.max_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_seconds: default_base_delay_seconds(),
        }
    }
}

/// Pagination and filtering parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Optional accounts search filter. Scoping the search to one safe
    /// name keeps account listings under the upstream cross-safe cap.
    #[serde(default)]
    pub account_search: Option<String>,
}

impl QueryConfig {
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CofferError::Configuration(
                "vault.query.page_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            account_search: None,
        }
    }
}

/// Export output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the CSV reports are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Report kinds to run; empty means all
    #[serde(default)]
    pub reports: Vec<String>,

    /// Records between explicit sink flush checkpoints
    #[serde(default = "default_flush_interval")]
    pub flush_interval: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.flush_interval == 0 {
            return Err(CofferError::Configuration(
                "export.flush_interval must be greater than 0".to_string(),
            ));
        }
        for report in &self.reports {
            match report.as_str() {
                "accounts" | "users" | "safes" => {}
                other => {
                    return Err(CofferError::Configuration(format!(
                        "export.reports contains unknown report kind '{other}' \
                         (expected accounts, users, or safes)"
                    )))
                }
            }
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            reports: Vec::new(),
            flush_interval: default_flush_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rolling local file in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation schedule: "daily" or "hourly"
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_app_name() -> String {
    "coffer".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_auth_provider() -> String {
    "ldap".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_seconds() -> u64 {
    5
}

fn default_page_size() -> u64 {
    100
}

fn default_output_dir() -> String {
    "reports".to_string()
}

fn default_flush_interval() -> u64 {
    50_000
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
