//! Invoice record and report data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel used when the invoice number element is absent.
pub const NUMBER_NOT_FOUND: &str = "Não encontrada";

/// Default customer name for consumer invoices without a named recipient.
pub const DEFAULT_CUSTOMER: &str = "Consumidor Final";

/// Sentinel used when neither CNPJ nor CPF is present.
pub const TAX_ID_NOT_INFORMED: &str = "Não informado";

/// Fields extracted from one NF-e document.
///
/// Every field has a defined default; a record is either fully populated
/// (defaults included) or discarded entirely when the document fails to
/// parse. See [`crate::nfe::extract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number (`nNF`), or [`NUMBER_NOT_FOUND`].
    pub number: String,

    /// Issue date taken from the first 10 characters of `dhEmi`.
    pub issue_date: Option<NaiveDate>,

    /// Recipient name (`dest/xNome`), or [`DEFAULT_CUSTOMER`].
    pub customer_name: String,

    /// Recipient CNPJ, falling back to CPF, then [`TAX_ID_NOT_INFORMED`].
    pub tax_id: String,

    /// Invoice total (`vNF`), zero when missing or unparseable.
    pub total_value: Decimal,

    /// Name of the file the record was extracted from.
    pub source_file: String,
}

/// An aggregated batch of invoice records.
///
/// Records are sorted by issue date descending with undated records last;
/// `total_faturado` is the exact decimal sum of all record totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Records in presentation order.
    pub records: Vec<InvoiceRecord>,

    /// Sum of `total_value` across all records.
    pub total_faturado: Decimal,
}

impl Report {
    /// Whether the report contains any records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records in the report.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
