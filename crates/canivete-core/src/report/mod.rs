//! Report aggregation and spreadsheet rendering.

mod spreadsheet;

pub use spreadsheet::{render_spreadsheet, XLSX_MIME_TYPE};

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::record::{InvoiceRecord, Report};

/// Aggregate extracted records into a report.
///
/// Pure function: stable sort by issue date descending with undated records
/// last (ties keep input order), and an exact decimal total. An empty input
/// yields an empty report with a zero total.
pub fn aggregate(mut records: Vec<InvoiceRecord>) -> Report {
    // Option<NaiveDate> orders None first, so the reversed comparison puts
    // undated records after every dated one.
    records.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));

    let total_faturado: Decimal = records.iter().map(|r| r.total_value).sum();

    debug!(
        records = records.len(),
        total = %total_faturado,
        "aggregated report"
    );

    Report {
        records,
        total_faturado,
    }
}
