//! Configuration loading integration tests

use coffer::config::{load_config, load_config_unchecked};
use secrecy::ExposeSecret;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn full_config_loads_and_validates() {
    let file = write_config(
        r#"
[application]
name = "coffer"
log_level = "debug"

[vault]
base_url = "https://vault.example.com/PasswordVault"
auth_provider = "cyberark"
username = "auditor"
password = "hunter2"
tls_verify = false
timeout_seconds = 60

[vault.retry]
max_retries = 5
base_delay_seconds = 2

[vault.query]
page_size = 500
account_search = "Finance"

[export]
output_dir = "out"
reports = ["accounts", "safes"]
flush_interval = 10000

[logging]
local_enabled = true
local_path = "logs"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.vault.auth_provider, "cyberark");
    assert!(!config.vault.tls_verify);
    assert_eq!(config.vault.timeout_seconds, 60);
    assert_eq!(config.vault.retry.max_retries, 5);
    assert_eq!(config.vault.retry.base_delay_seconds, 2);
    assert_eq!(config.vault.query.page_size, 500);
    assert_eq!(config.vault.query.account_search.as_deref(), Some("Finance"));
    assert_eq!(config.export.reports, vec!["accounts", "safes"]);
    assert_eq!(config.export.flush_interval, 10_000);
    assert!(config.logging.local_enabled);
    assert_eq!(
        config.vault.password.as_ref().unwrap().expose_secret().as_ref(),
        "hunter2"
    );
}

#[test]
fn minimal_config_gets_defaults() {
    let file = write_config(
        r#"
[vault]
base_url = "https://vault.example.com"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.name, "coffer");
    assert_eq!(config.vault.auth_provider, "ldap");
    assert_eq!(config.vault.query.page_size, 100);
    assert_eq!(config.vault.retry.max_retries, 3);
    assert_eq!(config.vault.retry.base_delay_seconds, 5);
    assert_eq!(config.export.output_dir, "reports");
    assert_eq!(config.export.flush_interval, 50_000);
    assert!(config.export.reports.is_empty());
    assert!(!config.logging.local_enabled);
}

#[test]
fn password_substituted_from_environment() {
    std::env::set_var("COFFER_IT_LOGON_SECRET", "from-env");
    let file = write_config(
        r#"
[vault]
base_url = "https://vault.example.com"
username = "auditor"
password = "${COFFER_IT_LOGON_SECRET}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    std::env::remove_var("COFFER_IT_LOGON_SECRET");

    assert_eq!(
        config.vault.password.as_ref().unwrap().expose_secret().as_ref(),
        "from-env"
    );
}

#[test]
fn missing_substitution_variable_fails_load() {
    std::env::remove_var("COFFER_IT_ABSENT_SECRET");
    let file = write_config(
        r#"
[vault]
base_url = "https://vault.example.com"
password = "${COFFER_IT_ABSENT_SECRET}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("COFFER_IT_ABSENT_SECRET"));
}

#[test]
fn invalid_report_kind_fails_validation() {
    let file = write_config(
        r#"
[vault]
base_url = "https://vault.example.com"

[export]
reports = ["accounts", "diagrams"]
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("diagrams"));
}

#[test]
fn unchecked_load_skips_validation() {
    // No base_url: full load rejects it, unchecked load carries it so
    // CLI overrides can fill the gap before the combined validation.
    let file = write_config(
        r#"
[vault]
username = "auditor"
"#,
    );

    assert!(load_config(file.path()).is_err());
    let config = load_config_unchecked(file.path()).unwrap();
    assert!(config.vault.base_url.is_empty());
}
