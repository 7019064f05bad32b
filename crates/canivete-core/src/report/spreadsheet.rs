//! Styled xlsx rendering of an aggregated report.

use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, FormatAlign, Workbook};
use tracing::debug;

use crate::error::RenderError;
use crate::models::record::Report;

/// MIME type of the rendered artifact.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Notas Fiscais";
const HEADER_FILL: u32 = 0x1E3A8A;
const HEADERS: [&str; 5] = [
    "Número NF",
    "Data Emissão",
    "Cliente",
    "CNPJ/CPF",
    "Valor Total (R$)",
];
const COLUMN_WIDTHS: [f64; 5] = [15.0, 14.0, 40.0, 20.0, 18.0];
const DATE_FORMAT: &str = "dd/mm/yyyy";
const CURRENCY_FORMAT: &str = "R$ #,##0.00";

const MONTH_NAMES: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

/// Render a report as a single-sheet xlsx workbook.
///
/// The workbook creation timestamp is pinned to `period`, so the output is
/// byte-for-byte identical for the same report and period.
pub fn render_spreadsheet(
    report: &Report,
    period: NaiveDateTime,
) -> std::result::Result<Vec<u8>, RenderError> {
    let mut workbook = Workbook::new();

    let created = ExcelDateTime::from_ymd(period.year() as u16, period.month() as u8, period.day() as u8)?
        .and_hms(period.hour() as u16, period.minute() as u8, 0.0)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let title_format = Format::new().set_bold().set_font_size(16);
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let currency_format = Format::new().set_num_format(CURRENCY_FORMAT);
    let total_label_format = Format::new().set_bold();
    let total_value_format = Format::new().set_bold().set_num_format(CURRENCY_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    let title = format!(
        "Relatório de Notas Fiscais - {}/{}",
        MONTH_NAMES[period.month0() as usize],
        period.year()
    );
    worksheet.merge_range(0, 0, 0, 4, &title, &title_format)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *header, &header_format)?;
    }

    for (i, record) in report.records.iter().enumerate() {
        let row = 2 + i as u32;
        worksheet.write_string(row, 0, &record.number)?;
        if let Some(date) = record.issue_date {
            worksheet.write_datetime_with_format(row, 1, &date, &date_format)?;
        }
        worksheet.write_string(row, 2, &record.customer_name)?;
        worksheet.write_string(row, 3, &record.tax_id)?;
        worksheet.write_number_with_format(
            row,
            4,
            record.total_value.to_f64().unwrap_or(0.0),
            &currency_format,
        )?;
    }

    let total_row = 2 + report.records.len() as u32;
    worksheet.write_string_with_format(total_row, 3, "TOTAL FATURADO", &total_label_format)?;
    worksheet.write_number_with_format(
        total_row,
        4,
        report.total_faturado.to_f64().unwrap_or(0.0),
        &total_value_format,
    )?;

    let bytes = workbook.save_to_buffer()?;
    debug!(rows = report.records.len(), bytes = bytes.len(), "rendered spreadsheet");

    Ok(bytes)
}
