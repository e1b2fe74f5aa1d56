//! Vault REST API adapter
//!
//! Everything that talks HTTP to the vault lives here: the
//! authentication session, the resilient requester, and the paginated
//! fetcher. The rest of the crate consumes domain records and never
//! sees wire-level concerns.

pub mod models;
pub mod pages;
pub mod requester;
pub mod session;

pub use models::{PageEnvelope, UsersEnvelope};
pub use pages::{verify_unique, PaginatedFetcher};
pub use requester::VaultClient;
pub use session::{AuthSession, ConfigCredentials, CredentialSource, VaultCredentials};
