//! Batch pipeline: extraction → aggregation → spreadsheet rendering.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::{ExtractError, PipelineError};
use crate::models::record::{InvoiceRecord, Report};
use crate::nfe;
use crate::report::{aggregate, render_spreadsheet};

/// Outcome of extracting a batch of documents.
#[derive(Debug, Default)]
pub struct BatchExtraction {
    /// Records for every document that parsed.
    pub records: Vec<InvoiceRecord>,

    /// Per-document failures; these never abort the batch.
    pub failures: Vec<ExtractError>,
}

/// Outcome of processing a batch end to end.
#[derive(Debug)]
pub struct ProcessedBatch {
    /// Aggregated report over the successful extractions.
    pub report: Report,

    /// Rendered xlsx bytes.
    pub spreadsheet: Vec<u8>,

    /// Per-document failures, surfaced so callers can warn the user.
    pub failures: Vec<ExtractError>,
}

/// Run the extractor over every `(filename, bytes)` pair, keeping going
/// past malformed documents.
pub fn extract_batch(files: impl IntoIterator<Item = (String, Vec<u8>)>) -> BatchExtraction {
    let mut batch = BatchExtraction::default();

    for (file, bytes) in files {
        match nfe::extract(&file, &bytes) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(file, error = %e, "skipping document");
                batch.failures.push(e);
            }
        }
    }

    info!(
        extracted = batch.records.len(),
        failed = batch.failures.len(),
        "batch extraction finished"
    );

    batch
}

/// Extract, aggregate, and render a batch.
///
/// Fails with [`PipelineError::NoDataExtracted`] when no document in the
/// batch yields a record; in that case nothing is rendered and nothing
/// should be stored.
pub fn process_batch(
    files: impl IntoIterator<Item = (String, Vec<u8>)>,
    period: NaiveDateTime,
) -> Result<ProcessedBatch, PipelineError> {
    let batch = extract_batch(files);

    if batch.records.is_empty() {
        return Err(PipelineError::NoDataExtracted);
    }

    let report = aggregate(batch.records);
    let spreadsheet = render_spreadsheet(&report, period)?;

    Ok(ProcessedBatch {
        report,
        spreadsheet,
        failures: batch.failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn nfe_doc(number: &str, date: &str, value: &str) -> Vec<u8> {
        format!(
            r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
              <infNFe>
                <ide><nNF>{number}</nNF><dhEmi>{date}T08:00:00-03:00</dhEmi></ide>
                <dest><CNPJ>22222222000122</CNPJ><xNome>Cliente</xNome></dest>
                <total><ICMSTot><vNF>{value}</vNF></ICMSTot></total>
              </infNFe>
            </NFe>"#
        )
        .into_bytes()
    }

    fn period() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_malformed_documents_do_not_abort_the_batch() {
        let files = vec![
            ("a.xml".to_string(), nfe_doc("1", "2025-03-01", "10.00")),
            ("broken.xml".to_string(), b"<NFe>".to_vec()),
            ("b.xml".to_string(), nfe_doc("2", "2025-01-10", "20.00")),
        ];

        let batch = extract_batch(files);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].file(), "broken.xml");
    }

    #[test]
    fn test_process_batch_sorts_and_renders() {
        let files = vec![
            ("a.xml".to_string(), nfe_doc("1", "2025-01-10", "10.00")),
            ("b.xml".to_string(), nfe_doc("2", "2025-03-01", "20.00")),
        ];

        let processed = process_batch(files, period()).unwrap();
        assert_eq!(processed.report.records[0].number, "2");
        assert_eq!(processed.report.total_faturado, rust_decimal::Decimal::from(30));
        assert_eq!(&processed.spreadsheet[..2], b"PK");
        assert!(processed.failures.is_empty());
    }

    #[test]
    fn test_all_failures_yield_no_data_extracted() {
        let files = vec![
            ("a.txt".to_string(), b"not xml".to_vec()),
            ("b.xml".to_string(), b"<open>".to_vec()),
        ];

        let err = process_batch(files, period()).unwrap_err();
        assert!(matches!(err, PipelineError::NoDataExtracted));
    }
}
