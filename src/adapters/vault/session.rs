//! Authentication session against the vault logon endpoint
//!
//! `AuthSession` owns the one piece of mutable shared state in a run:
//! the bearer token. It is obtained from the logon endpoint, replaced
//! atomically by `refresh`, and handed out only for header construction.
//! Credentials come through the [`CredentialSource`] seam so the secret
//! store backing them is never inlined here.

use crate::adapters::vault::models::LogonRequest;
use crate::config::{SecretString, VaultConfig};
use crate::domain::{CofferError, Result, VaultError};
use async_trait::async_trait;
use secrecy::ExposeSecret;

/// Username/password pair for the logon endpoint
#[derive(Debug)]
pub struct VaultCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Source of vault credentials
///
/// Implementations wrap a secret store; the default one reads the
/// configured username/password. Fetching may be remote, hence async.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Produce the credential pair for a logon attempt
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store has no usable credentials.
    async fn credentials(&self) -> Result<VaultCredentials>;
}

/// Credential source backed by the loaded configuration
pub struct ConfigCredentials {
    username: Option<String>,
    password: Option<SecretString>,
}

impl ConfigCredentials {
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

#[async_trait]
impl CredentialSource for ConfigCredentials {
    async fn credentials(&self) -> Result<VaultCredentials> {
        let username = self
            .username
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                CofferError::Vault(VaultError::AuthenticationFailed(
                    "vault username is missing".to_string(),
                ))
            })?;

        let password = self.password.clone().ok_or_else(|| {
            CofferError::Vault(VaultError::AuthenticationFailed(
                "vault password is missing".to_string(),
            ))
        })?;

        if password.expose_secret().is_empty() {
            return Err(CofferError::Vault(VaultError::AuthenticationFailed(
                "vault password is empty".to_string(),
            )));
        }

        Ok(VaultCredentials { username, password })
    }
}

/// Holds the bearer token for a run and refreshes it on demand
pub struct AuthSession {
    http: reqwest::Client,
    logon_url: String,
    token: Option<String>,
    refresh_count: u32,
}

impl AuthSession {
    /// Create an unauthenticated session for the given vault
    pub fn new(http: reqwest::Client, base_url: &str, auth_provider: &str) -> Self {
        let logon_url = format!(
            "{}/api/auth/{}/logon",
            base_url.trim_end_matches('/'),
            auth_provider
        );
        Self {
            http,
            logon_url,
            token: None,
            refresh_count: 0,
        }
    }

    /// Authenticate and store the bearer token
    ///
    /// The secret material is used for the single logon request and
    /// dropped as soon as the body has been sent.
    ///
    /// # Errors
    ///
    /// Any failure here is `VaultError::AuthenticationFailed`; there is
    /// no partial-success mode for authentication.
    pub async fn logon(&mut self, source: &dyn CredentialSource) -> Result<()> {
        let creds = source.credentials().await?;

        tracing::info!(
            endpoint = %self.logon_url,
            username = %creds.username,
            "Authenticating against vault"
        );

        let response = self
            .http
            .post(&self.logon_url)
            .json(&LogonRequest {
                username: &creds.username,
                password: creds.password.expose_secret().as_ref(),
            })
            .send()
            .await
            .map_err(|e| {
                CofferError::Vault(VaultError::AuthenticationFailed(format!(
                    "logon request failed: {e}"
                )))
            })?;
        drop(creds);

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            CofferError::Vault(VaultError::AuthenticationFailed(format!(
                "failed to read logon response: {e}"
            )))
        })?;

        if !status.is_success() {
            return Err(CofferError::Vault(VaultError::AuthenticationFailed(
                format!("logon returned HTTP {status}: {body}"),
            )));
        }

        // The endpoint answers with the token as one quoted JSON string.
        let token: String = serde_json::from_str(&body).map_err(|_| {
            CofferError::Vault(VaultError::AuthenticationFailed(
                "logon response was not a token string".to_string(),
            ))
        })?;

        if token.trim().is_empty() {
            return Err(CofferError::Vault(VaultError::AuthenticationFailed(
                "logon returned an empty token".to_string(),
            )));
        }

        self.token = Some(token);
        tracing::info!("Vault authentication succeeded");
        Ok(())
    }

    /// Replace the token after a 401, reusing the logon flow
    ///
    /// # Errors
    ///
    /// A failed refresh is `VaultError::TokenRefreshFailed` and is not
    /// retried; the current fetch is over at that point.
    pub async fn refresh(&mut self, source: &dyn CredentialSource) -> Result<()> {
        tracing::warn!("Bearer token rejected, re-authenticating");
        self.logon(source).await.map_err(|e| {
            CofferError::Vault(VaultError::TokenRefreshFailed(e.to_string()))
        })?;
        self.refresh_count += 1;
        Ok(())
    }

    /// The current bearer token, if authenticated
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// How many times the token has been replaced after expiry
    pub fn refresh_count(&self) -> u32 {
        self.refresh_count
    }
}
