//! Resilient request execution against the vault API
//!
//! Each attempt's outcome is classified explicitly (retryable, auth
//! expired, fatal) and drives a bounded loop with exponential backoff,
//! instead of hiding control flow in exception matching. A 401 triggers
//! one inline re-authentication before the request is retried with the
//! refreshed token.

use crate::adapters::vault::session::{AuthSession, ConfigCredentials, CredentialSource};
use crate::config::VaultConfig;
use crate::domain::{CofferError, Result, VaultError};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// How a failed attempt should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Transient; sleep and try again
    Retryable,
    /// Token expired; refresh and try again without backoff
    AuthExpired,
    /// No point in another attempt
    Fatal,
}

fn classify(error: &VaultError) -> Disposition {
    match error {
        VaultError::ClientError { status: 401, .. } => Disposition::AuthExpired,
        e if e.is_retryable() => Disposition::Retryable,
        _ => Disposition::Fatal,
    }
}

/// Backoff before the next attempt: base * 2^(attempt-1), so attempt 1
/// sleeps the base delay, attempt 2 twice that, and so on.
fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    let capped = attempt.saturating_sub(1).min(20);
    base_delay.saturating_mul(1 << capped)
}

/// Authenticated vault API client with retry and re-authentication
///
/// Owns the HTTP client, the [`AuthSession`], and the credential source
/// used to refresh it. All vault traffic in a run goes through one
/// `VaultClient`; requests are strictly sequential.
pub struct VaultClient {
    http: Client,
    session: AuthSession,
    credentials: Box<dyn CredentialSource>,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl VaultClient {
    /// Build a client from configuration, using config-backed credentials
    pub fn new(config: &VaultConfig) -> Result<Self> {
        let credentials = Box::new(ConfigCredentials::from_config(config));
        Self::with_credentials(config, credentials)
    }

    /// Build a client with an explicit credential source
    pub fn with_credentials(
        config: &VaultConfig,
        credentials: Box<dyn CredentialSource>,
    ) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|e| {
            CofferError::Vault(VaultError::ConnectionFailed(format!(
                "failed to build HTTP client: {e}"
            )))
        })?;

        let base_url = config.base_url_trimmed().to_string();
        let session = AuthSession::new(http.clone(), &base_url, &config.auth_provider);

        Ok(Self {
            http,
            session,
            credentials,
            base_url,
            max_retries: config.retry.max_retries,
            base_delay: Duration::from_secs(config.retry.base_delay_seconds),
        })
    }

    /// Authenticate the session; fatal to the whole run on failure
    pub async fn logon(&mut self) -> Result<()> {
        self.session.logon(self.credentials.as_ref()).await
    }

    /// Times the token has been refreshed after expiry
    pub fn token_refresh_count(&self) -> u32 {
        self.session.refresh_count()
    }

    /// Execute a GET with retry, backoff, and 401 recovery
    ///
    /// Returns the parsed JSON body of the first successful attempt.
    /// The caller decides whether a terminal failure is fatal to its
    /// report or not.
    ///
    /// # Errors
    ///
    /// `VaultError::RetriesExhausted` when every attempt failed with a
    /// transient error; otherwise the classified error of the first
    /// non-retryable failure.
    pub async fn get_json(
        &mut self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut attempt: u32 = 0;
        let mut last_error: Option<VaultError> = None;

        while attempt < self.max_retries {
            attempt += 1;
            tracing::debug!(endpoint = %path, attempt, "Issuing vault request");

            match self.attempt_get(&url, path, query).await {
                Ok(body) => {
                    tracing::debug!(endpoint = %path, attempt, "Vault request succeeded");
                    return Ok(body);
                }
                Err(error) => match classify(&error) {
                    Disposition::AuthExpired => {
                        tracing::info!(
                            endpoint = %path,
                            attempt,
                            "Received HTTP 401, refreshing token"
                        );
                        self.session.refresh(self.credentials.as_ref()).await?;
                        last_error = Some(error);
                    }
                    Disposition::Retryable if attempt < self.max_retries => {
                        let delay = backoff_delay(self.base_delay, attempt);
                        tracing::warn!(
                            endpoint = %path,
                            attempt,
                            max_retries = self.max_retries,
                            delay_secs = delay.as_secs(),
                            error = %error,
                            "Retrying vault request after transient failure"
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(error);
                    }
                    Disposition::Retryable => {
                        last_error = Some(error);
                    }
                    Disposition::Fatal => {
                        tracing::error!(
                            endpoint = %path,
                            attempt,
                            error = %error,
                            "Vault request failed terminally"
                        );
                        return Err(CofferError::Vault(error));
                    }
                },
            }
        }

        let last = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt recorded".to_string());
        tracing::error!(
            endpoint = %path,
            attempts = self.max_retries,
            last_error = %last,
            "Vault request exhausted all retries"
        );
        Err(CofferError::Vault(VaultError::RetriesExhausted {
            endpoint: path.to_string(),
            attempts: self.max_retries,
            last_error: last,
        }))
    }

    /// One attempt: issue the request and map the outcome to the error
    /// taxonomy. Success requires a 2xx status and a non-empty,
    /// well-formed JSON body; anything else is never coerced into an
    /// empty result.
    async fn attempt_get(
        &self,
        url: &str,
        path: &str,
        query: &[(String, String)],
    ) -> std::result::Result<serde_json::Value, VaultError> {
        let mut request = self.http.get(url).query(query);
        if let Some(token) = self.session.bearer() {
            request = request.header("Authorization", token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                VaultError::Timeout(e.to_string())
            } else {
                VaultError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| VaultError::InvalidResponse(e.to_string()))?;

            if text.trim().is_empty() {
                return Err(VaultError::EmptyResponse {
                    endpoint: path.to_string(),
                });
            }

            return serde_json::from_str(&text)
                .map_err(|e| VaultError::InvalidResponse(format!("malformed JSON body: {e}")));
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!(
            endpoint = %path,
            status = status.as_u16(),
            "Vault returned non-success status"
        );

        // 408/429 stay ClientError; is_retryable singles them out.
        Err(if status.is_server_error() {
            VaultError::ServerError {
                status: status.as_u16(),
                message,
            }
        } else {
            VaultError::ClientError {
                status: status.as_u16(),
                message,
            }
        })
    }
}
