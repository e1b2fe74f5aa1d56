//! Core business logic for Coffer.
//!
//! # Export Workflow
//!
//! 1. **Authenticate**: obtain a bearer token from the vault logon endpoint
//! 2. **Fetch**: walk each selected collection page by page with retry,
//!    backoff, and duplicate-cursor detection
//! 3. **Project**: map every record through its declared column schema
//! 4. **Stream**: append rows batch-wise to the CSV sink, flushing at
//!    checkpoints so memory stays bounded
//! 5. **Report**: aggregate per-job outcomes into the process exit code

pub mod export;
