//! Domain models and types for Coffer.
//!
//! This module contains the core domain models, types, and business rules:
//!
//! - **Vault records** ([`Safe`], [`Account`], [`User`]) with the
//!   [`PagedRecord`] identifier trait used for pagination integrity
//! - **Report jobs** ([`ReportKind`], [`ReportJob`], [`JobStatus`])
//! - **Error types** ([`CofferError`], [`VaultError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CofferError>`]:
//!
//! ```rust
//! use coffer::domain::{CofferError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = coffer::config::load_config("coffer.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod records;
pub mod report;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{CofferError, VaultError};
pub use records::{
    Account, GroupMembership, PagedRecord, RemoteMachinesAccess, Safe, SafeMember,
    SecretManagement, User,
};
pub use report::{JobStatus, ReportJob, ReportKind};
pub use result::Result;
