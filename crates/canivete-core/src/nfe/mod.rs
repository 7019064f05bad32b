//! NF-e field extraction module.

mod amounts;
mod extractor;

pub use amounts::{format_brl_amount, parse_brl_amount};
pub use extractor::{extract, NFE_NAMESPACE};

use crate::error::ExtractError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
