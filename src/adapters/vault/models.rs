//! Wire models for the vault REST API
//!
//! Request and response shapes private to the adapter. Domain records
//! themselves live in `crate::domain::records`; these envelopes only
//! describe how the API wraps them.

use crate::domain::records::User;
use serde::{Deserialize, Serialize};

/// Logon request body
#[derive(Debug, Serialize)]
pub(crate) struct LogonRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// One page of a paginated collection: `{ "value": [...] }`
#[derive(Debug, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Response of the single-shot users endpoint
#[derive(Debug, Deserialize)]
pub struct UsersEnvelope {
    #[serde(default, rename = "Total")]
    pub total: Option<u64>,

    #[serde(default = "Vec::new", rename = "Users")]
    pub users: Vec<User>,
}
