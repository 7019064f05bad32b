//! Core library for NF-e invoice reporting.
//!
//! This crate provides:
//! - NF-e XML field extraction (invoice number, issue date, recipient, tax id, total)
//! - Report aggregation (date-descending ordering, exact decimal totals)
//! - Styled xlsx spreadsheet rendering
//! - Per-client report storage with history listing
//! - A flat-file access directory of accountant/client identities

pub mod directory;
pub mod error;
pub mod models;
pub mod nfe;
pub mod pipeline;
pub mod report;
pub mod store;

pub use directory::{AccessDirectory, FileAccessDirectory, Identity, Role};
pub use error::{
    CaniveteError, DirectoryError, ExtractError, PipelineError, RenderError, Result, StoreError,
};
pub use models::config::AppConfig;
pub use models::record::{InvoiceRecord, Report};
pub use pipeline::{extract_batch, process_batch, BatchExtraction, ProcessedBatch};
pub use report::{aggregate, render_spreadsheet, XLSX_MIME_TYPE};
pub use store::{FsReportStore, ReportStore, StoredArtifact, LISTING_CAP};
