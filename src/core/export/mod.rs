//! Export pipeline
//!
//! Column schemas, the streaming CSV sink, and the orchestrator that
//! drives the report jobs.

pub mod columns;
pub mod orchestrator;
pub mod summary;
pub mod writer;

pub use orchestrator::{select_reports, ReportOrchestrator};
pub use summary::{JobOutcome, RunSummary};
pub use writer::CsvExporter;
