//! Data models for invoice records, reports, and configuration.

pub mod config;
pub mod record;

pub use config::{AppConfig, CookieConfig, DirectoryConfig, StorageConfig};
pub use record::{InvoiceRecord, Report};
