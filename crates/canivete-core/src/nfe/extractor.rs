//! Namespace-aware NF-e field extraction.

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExtractError;
use crate::models::record::{
    InvoiceRecord, DEFAULT_CUSTOMER, NUMBER_NOT_FOUND, TAX_ID_NOT_INFORMED,
};

use super::amounts::parse_brl_amount;
use super::Result;

/// XML namespace all NF-e elements live in.
pub const NFE_NAMESPACE: &[u8] = b"http://www.portalfiscal.inf.br/nfe";

/// Element paths of the fields a report row is built from. Matched as path
/// suffixes so the `nfeProc`/`NFe`/`infNFe` wrapper depth does not matter.
const PATH_NUMBER: &[&str] = &["ide", "nNF"];
const PATH_ISSUE_DATE: &[&str] = &["ide", "dhEmi"];
const PATH_CUSTOMER: &[&str] = &["dest", "xNome"];
const PATH_CNPJ: &[&str] = &["dest", "CNPJ"];
const PATH_CPF: &[&str] = &["dest", "CPF"];
const PATH_TOTAL: &[&str] = &["total", "ICMSTot", "vNF"];

/// Raw field values as captured from the document, first occurrence wins.
#[derive(Debug, Default)]
struct RawFields {
    number: Option<String>,
    issue_date: Option<String>,
    customer: Option<String>,
    cnpj: Option<String>,
    cpf: Option<String>,
    total: Option<String>,
}

/// Extract report fields from one NF-e document.
///
/// Missing elements yield field defaults, never an error; the only failure
/// mode is a document that cannot be read as XML at all, reported as
/// [`ExtractError::MalformedDocument`] carrying the filename.
pub fn extract(file: &str, bytes: &[u8]) -> Result<InvoiceRecord> {
    let raw = capture_fields(bytes).map_err(|reason| ExtractError::MalformedDocument {
        file: file.to_string(),
        reason,
    })?;

    let record = InvoiceRecord {
        number: field_or(raw.number, NUMBER_NOT_FOUND),
        issue_date: raw.issue_date.as_deref().and_then(parse_issue_date),
        customer_name: field_or(raw.customer, DEFAULT_CUSTOMER),
        tax_id: preferred_tax_id(raw.cnpj, raw.cpf),
        total_value: raw
            .total
            .as_deref()
            .and_then(parse_brl_amount)
            .unwrap_or(Decimal::ZERO),
        source_file: file.to_string(),
    };

    debug!(
        file,
        number = %record.number,
        total = %record.total_value,
        "extracted NF-e record"
    );

    Ok(record)
}

/// Walk the document once, capturing the text of the target elements.
fn capture_fields(bytes: &[u8]) -> std::result::Result<RawFields, String> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut raw = RawFields::default();
    // Stack of (local name, element is in the NF-e namespace)
    let mut path: Vec<(String, bool)> = Vec::new();
    let mut saw_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                saw_root = true;
                let (ns, local) = reader.resolve_element(e.name());
                let in_ns = ns == ResolveResult::Bound(Namespace(NFE_NAMESPACE));
                let local = String::from_utf8_lossy(local.into_inner()).into_owned();
                path.push((local, in_ns));
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                let text = text.trim();
                if !text.is_empty() {
                    capture(&mut raw, &path, text);
                }
            }
            Ok(Event::Empty(_)) => {
                saw_root = true;
            }
            Ok(Event::Eof) => {
                if let Some((open, _)) = path.last() {
                    return Err(format!("document ended with '{open}' still open"));
                }
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
        buf.clear();
    }

    if !saw_root {
        return Err("document contains no XML elements".to_string());
    }

    Ok(raw)
}

/// Assign `text` to the first still-empty field whose path matches.
fn capture(raw: &mut RawFields, path: &[(String, bool)], text: &str) {
    let slots: [(&[&str], &mut Option<String>); 6] = [
        (PATH_NUMBER, &mut raw.number),
        (PATH_ISSUE_DATE, &mut raw.issue_date),
        (PATH_CUSTOMER, &mut raw.customer),
        (PATH_CNPJ, &mut raw.cnpj),
        (PATH_CPF, &mut raw.cpf),
        (PATH_TOTAL, &mut raw.total),
    ];

    for (suffix, slot) in slots {
        if slot.is_none() && path_ends_with(path, suffix) {
            *slot = Some(text.to_string());
        }
    }
}

/// Whether the element path ends with `suffix`, all segments NF-e-bound.
fn path_ends_with(path: &[(String, bool)], suffix: &[&str]) -> bool {
    if path.len() < suffix.len() {
        return false;
    }
    path[path.len() - suffix.len()..]
        .iter()
        .zip(suffix)
        .all(|((name, in_ns), expected)| *in_ns && name == expected)
}

/// Take the date from the first 10 characters (`YYYY-MM-DD`) of `dhEmi`.
fn parse_issue_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn field_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

/// CNPJ wins over CPF, even when both are present.
fn preferred_tax_id(cnpj: Option<String>, cpf: Option<String>) -> String {
    cnpj.filter(|v| !v.is_empty())
        .or_else(|| cpf.filter(|v| !v.is_empty()))
        .unwrap_or_else(|| TAX_ID_NOT_INFORMED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const FULL_NFE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe35240100000000000000550010000012341000012345">
      <ide>
        <cUF>35</cUF>
        <nNF>1234</nNF>
        <dhEmi>2024-01-15T10:30:00-03:00</dhEmi>
      </ide>
      <emit>
        <CNPJ>11111111000111</CNPJ>
        <xNome>Loja Emitente LTDA</xNome>
      </emit>
      <dest>
        <CNPJ>22222222000122</CNPJ>
        <CPF>33344455566</CPF>
        <xNome>Comercio Destinatario SA</xNome>
      </dest>
      <total>
        <ICMSTot>
          <vProd>1200.00</vProd>
          <vNF>1234,56</vNF>
        </ICMSTot>
      </total>
    </infNFe>
  </NFe>
</nfeProc>"#;

    #[test]
    fn test_extract_full_document() {
        let record = extract("nota.xml", FULL_NFE.as_bytes()).unwrap();

        assert_eq!(record.number, "1234");
        assert_eq!(
            record.issue_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(record.customer_name, "Comercio Destinatario SA");
        assert_eq!(record.total_value, Decimal::from_str("1234.56").unwrap());
        assert_eq!(record.source_file, "nota.xml");
    }

    #[test]
    fn test_cnpj_preferred_over_cpf() {
        let record = extract("nota.xml", FULL_NFE.as_bytes()).unwrap();
        // dest carries both; CNPJ wins and emit's CNPJ is never picked up
        assert_eq!(record.tax_id, "22222222000122");
    }

    #[test]
    fn test_emit_fields_are_ignored() {
        let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
          <infNFe>
            <emit><CNPJ>11111111000111</CNPJ><xNome>Emitente</xNome></emit>
          </infNFe>
        </NFe>"#;

        let record = extract("nota.xml", xml.as_bytes()).unwrap();
        assert_eq!(record.customer_name, DEFAULT_CUSTOMER);
        assert_eq!(record.tax_id, TAX_ID_NOT_INFORMED);
    }

    #[test]
    fn test_cpf_fallback() {
        let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
          <infNFe><dest><CPF>33344455566</CPF></dest></infNFe>
        </NFe>"#;

        let record = extract("nota.xml", xml.as_bytes()).unwrap();
        assert_eq!(record.tax_id, "33344455566");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe"><infNFe/></NFe>"#;

        let record = extract("vazia.xml", xml.as_bytes()).unwrap();
        assert_eq!(record.number, NUMBER_NOT_FOUND);
        assert_eq!(record.issue_date, None);
        assert_eq!(record.customer_name, DEFAULT_CUSTOMER);
        assert_eq!(record.tax_id, TAX_ID_NOT_INFORMED);
        assert_eq!(record.total_value, Decimal::ZERO);
    }

    #[test]
    fn test_short_issue_date_is_none() {
        let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
          <infNFe><ide><dhEmi>2024-01</dhEmi></ide></infNFe>
        </NFe>"#;

        let record = extract("nota.xml", xml.as_bytes()).unwrap();
        assert_eq!(record.issue_date, None);
    }

    #[test]
    fn test_unparseable_total_defaults_to_zero() {
        let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
          <infNFe><total><ICMSTot><vNF>n/a</vNF></ICMSTot></total></infNFe>
        </NFe>"#;

        let record = extract("nota.xml", xml.as_bytes()).unwrap();
        assert_eq!(record.total_value, Decimal::ZERO);
    }

    #[test]
    fn test_other_namespace_is_ignored() {
        let xml = r#"<NFe xmlns="http://example.com/other">
          <infNFe><ide><nNF>99</nNF></ide></infNFe>
        </NFe>"#;

        let record = extract("nota.xml", xml.as_bytes()).unwrap();
        assert_eq!(record.number, NUMBER_NOT_FOUND);
    }

    #[test]
    fn test_malformed_document_fails_with_filename() {
        let err = extract("quebrada.xml", b"<NFe><ide>").unwrap_err();
        assert_eq!(err.file(), "quebrada.xml");

        let err = extract("texto.txt", b"not xml at all").unwrap_err();
        assert_eq!(err.file(), "texto.txt");
    }
}
