//! Error types for the canivete-core library.

use thiserror::Error;

/// Main error type for the canivete library.
#[derive(Error, Debug)]
pub enum CaniveteError {
    /// NF-e field extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Report rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Report store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Access directory error.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Batch pipeline error.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to NF-e field extraction.
///
/// Extraction fails only when a document cannot be read as XML at all.
/// Missing fields are substituted with defaults, never reported as errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The document is not well-formed XML.
    #[error("{file}: not a well-formed NF-e XML document: {reason}")]
    MalformedDocument { file: String, reason: String },
}

impl ExtractError {
    /// Name of the file that failed to extract.
    pub fn file(&self) -> &str {
        match self {
            ExtractError::MalformedDocument { file, .. } => file,
        }
    }
}

/// Errors related to spreadsheet rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The xlsx writer rejected the workbook.
    #[error("failed to build spreadsheet: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors related to the report store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No artifact with this name exists under the owner's namespace.
    #[error("no report named '{name}' for client '{owner}'")]
    ArtifactNotFound { owner: String, name: String },

    /// The owner name cannot be used as a storage directory.
    #[error("invalid client name '{owner}'")]
    InvalidOwner { owner: String },

    /// Filesystem failure while reading or writing the store.
    #[error("report store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the access directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// An identity with this username already exists.
    #[error("username '{username}' is already taken")]
    DuplicateIdentity { username: String },

    /// No identity with this username exists.
    #[error("no identity named '{username}'")]
    UnknownIdentity { username: String },

    /// The credentials file could not be read or written.
    #[error("credentials file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The credentials file is not valid JSON.
    #[error("credentials file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors related to the batch pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Every document in the batch failed extraction; nothing to report.
    #[error("no invoice data could be extracted from the batch")]
    NoDataExtracted,

    /// Rendering the aggregated report failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for the canivete library.
pub type Result<T> = std::result::Result<T, CaniveteError>;
