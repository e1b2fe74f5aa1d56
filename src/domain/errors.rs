//! Domain error types
//!
//! This module defines the error hierarchy for Coffer. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Coffer error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum CofferError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Vault API errors
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Vault API errors
///
/// Errors that occur when talking to the vault's REST API. These don't
/// expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Failed to reach the vault at the transport level
    #[error("Failed to connect to vault: {0}")]
    ConnectionFailed(String),

    /// Logon rejected or the token response was unusable
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Re-authentication after a 401 did not produce a fresh token
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx other than 401/408/429)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 2xx response with an empty body
    #[error("Empty response from {endpoint}")]
    EmptyResponse { endpoint: String },

    /// Body was not well-formed JSON or missing expected fields
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// All retry attempts consumed without a success
    #[error("Retries exhausted for {endpoint} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        endpoint: String,
        attempts: u32,
        last_error: String,
    },

    /// The pagination cursor yielded a record identifier twice.
    /// The offset/limit cursor is unreliable at that point; aborting
    /// beats looping forever or silently deduplicating.
    #[error(
        "Pagination integrity violation at {endpoint} offset {offset}: duplicate record '{record_id}'"
    )]
    PaginationIntegrity {
        endpoint: String,
        offset: u64,
        record_id: String,
    },
}

impl VaultError {
    /// Whether this error may succeed on a later attempt.
    /// 408 and 429 are the two 4xx statuses worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VaultError::ConnectionFailed(_)
                | VaultError::Timeout(_)
                | VaultError::ServerError { .. }
                | VaultError::ClientError {
                    status: 408 | 429,
                    ..
                }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CofferError {
    fn from(err: std::io::Error) -> Self {
        CofferError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CofferError {
    fn from(err: serde_json::Error) -> Self {
        CofferError::Serialization(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for CofferError {
    fn from(err: csv::Error) -> Self {
        CofferError::Export(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CofferError {
    fn from(err: toml::de::Error) -> Self {
        CofferError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coffer_error_display() {
        let err = CofferError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_vault_error_conversion() {
        let vault_err = VaultError::ConnectionFailed("Network error".to_string());
        let coffer_err: CofferError = vault_err.into();
        assert!(matches!(coffer_err, CofferError::Vault(_)));
    }

    #[test]
    fn test_pagination_integrity_display() {
        let err = VaultError::PaginationIntegrity {
            endpoint: "api/safes".to_string(),
            offset: 200,
            record_id: "Finance".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("api/safes"));
        assert!(msg.contains("200"));
        assert!(msg.contains("Finance"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(VaultError::Timeout("deadline".to_string()).is_retryable());
        assert!(VaultError::ServerError {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());
        assert!(VaultError::ClientError {
            status: 429,
            message: "slow down".to_string()
        }
        .is_retryable());
        assert!(VaultError::ClientError {
            status: 408,
            message: "request timeout".to_string()
        }
        .is_retryable());
        assert!(!VaultError::ClientError {
            status: 404,
            message: "missing".to_string()
        }
        .is_retryable());
        assert!(!VaultError::AuthenticationFailed("bad logon".to_string()).is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let coffer_err: CofferError = io_err.into();
        assert!(matches!(coffer_err, CofferError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let coffer_err: CofferError = json_err.into();
        assert!(matches!(coffer_err, CofferError::Serialization(_)));
    }

    #[test]
    fn test_coffer_error_implements_std_error() {
        let err = CofferError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
