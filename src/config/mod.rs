//! Configuration management for Coffer.
//!
//! TOML-based configuration loading, parsing, and validation with
//! support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`COFFER_*` prefix)
//! - Default values for optional settings
//! - Secrecy-wrapped credentials
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "coffer"
//! log_level = "info"
//!
//! [vault]
//! base_url = "https://vault.example.com/PasswordVault"
//! auth_provider = "ldap"
//! username = "auditor"
//! password = "${COFFER_VAULT_PASSWORD}"
//! timeout_seconds = 30
//!
//! [vault.retry]
//! max_retries = 3
//! base_delay_seconds = 5
//!
//! [vault.query]
//! page_size = 100
//!
//! [export]
//! output_dir = "reports"
//! reports = ["accounts", "users", "safes"]
//! flush_interval = 50000
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_unchecked};
pub use schema::{
    ApplicationConfig, CofferConfig, ExportConfig, LoggingConfig, QueryConfig, RetryConfig,
    VaultConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
