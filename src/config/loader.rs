//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CofferConfig;
use super::secret::secret_string;
use crate::domain::errors::CofferError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CofferConfig
/// 4. Applies environment variable overrides (COFFER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use coffer::config::load_config;
///
/// let config = load_config("coffer.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CofferConfig> {
    let config = load_config_unchecked(path)?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration without running validation
///
/// Used where CLI overrides are applied on top of the file before the
/// combined result is validated once.
pub fn load_config_unchecked(path: impl AsRef<Path>) -> Result<CofferConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CofferError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CofferError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CofferConfig = toml::from_str(&contents)
        .map_err(|e| CofferError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. A referenced variable that is not
/// set fails the load rather than producing a silently empty value.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CofferError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the COFFER_* prefix
///
/// Variables follow the pattern COFFER_<SECTION>_<KEY>, for example
/// COFFER_VAULT_BASE_URL or COFFER_EXPORT_OUTPUT_DIR.
fn apply_env_overrides(config: &mut CofferConfig) {
    if let Ok(val) = std::env::var("COFFER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("COFFER_VAULT_BASE_URL") {
        config.vault.base_url = val;
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_AUTH_PROVIDER") {
        config.vault.auth_provider = val;
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_USERNAME") {
        config.vault.username = Some(val);
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_PASSWORD") {
        config.vault.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_TLS_VERIFY") {
        config.vault.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.vault.timeout_seconds = secs;
        }
    }

    if let Ok(val) = std::env::var("COFFER_VAULT_RETRY_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.vault.retry.max_retries = retries;
        }
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_RETRY_BASE_DELAY_SECONDS") {
        if let Ok(delay) = val.parse() {
            config.vault.retry.base_delay_seconds = delay;
        }
    }

    if let Ok(val) = std::env::var("COFFER_VAULT_QUERY_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.vault.query.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("COFFER_VAULT_QUERY_ACCOUNT_SEARCH") {
        config.vault.query.account_search = Some(val);
    }

    if let Ok(val) = std::env::var("COFFER_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("COFFER_EXPORT_FLUSH_INTERVAL") {
        if let Ok(interval) = val.parse() {
            config.export.flush_interval = interval;
        }
    }

    if let Ok(val) = std::env::var("COFFER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COFFER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("COFFER_TEST_SUBST_VAR", "test_value");
        let input = "password = \"${COFFER_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("COFFER_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("COFFER_TEST_MISSING_VAR");
        let input = "password = \"${COFFER_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${COFFER_TEST_COMMENT_VAR}\nname = \"coffer\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${COFFER_TEST_COMMENT_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
name = "coffer"
log_level = "info"

[vault]
base_url = "https://vault.example.com/PasswordVault"
username = "auditor"
password = "hunter2"

[vault.query]
page_size = 200

[export]
output_dir = "out"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.name, "coffer");
        assert_eq!(
            config.vault.base_url,
            "https://vault.example.com/PasswordVault"
        );
        assert_eq!(config.vault.query.page_size, 200);
        assert_eq!(config.export.output_dir, "out");
    }

    #[test]
    fn test_load_config_invalid_validation() {
        // Parses but fails validation on the zero page size
        let toml_content = r#"
[vault]
base_url = "https://vault.example.com"

[vault.query]
page_size = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
