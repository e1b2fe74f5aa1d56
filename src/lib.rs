// Coffer - Vault Bulk Report Exporter
// Copyright (c) 2025 Coffer Contributors
// Licensed under the MIT License

//! # Coffer - Vault Bulk Report Exporter
//!
//! Coffer extracts large datasets from a vault management REST API
//! (privileged accounts, vault users, and safes) and streams them to
//! CSV reports without holding a full collection in memory.
//!
//! ## Overview
//!
//! The extraction pipeline provides:
//! - **Authentication** against the vault logon endpoint, with automatic
//!   re-authentication when the bearer token expires mid-run
//! - **Resilient requests** with classified retry, exponential backoff,
//!   and bounded timeouts
//! - **Pagination** over offset/limit collections with duplicate-cursor
//!   detection, so a broken cursor aborts instead of looping forever
//! - **Streaming export** through declared column schemas into CSV files
//!   with periodic flush checkpoints
//! - **Independent report jobs**: a failed report never discards its
//!   siblings' completed output
//!
//! ## Architecture
//!
//! Coffer follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline (schemas, CSV sink, orchestration)
//! - [`adapters`] - Vault REST API integration (session, requester, pagination)
//! - [`domain`] - Core domain types, records, and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coffer::config::load_config;
//! use coffer::core::export::ReportOrchestrator;
//! use coffer::domain::ReportKind;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("coffer.toml")?;
//!
//!     let mut orchestrator = ReportOrchestrator::new(config)?;
//!     let summary = orchestrator.run(&ReportKind::ALL).await?;
//!
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Coffer uses the [`domain::CofferError`] type for all errors:
//!
//! ```rust,no_run
//! use coffer::domain::CofferError;
//!
//! fn example() -> Result<(), CofferError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = coffer::config::load_config("coffer.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
