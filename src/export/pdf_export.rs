// src/export/pdf_export.rs

use crate::errors::AppResult;
use crate::export::ReportExport;
use crate::export::model::{get_headers, rows_to_table};
use crate::export::pdf::ReportPdf;

/// Render the report rows as a PDF table.
pub(crate) fn render_pdf(rows: &[ReportExport], title: &str, summary: &str) -> AppResult<Vec<u8>> {
    let headers = get_headers();
    let data = rows_to_table(rows);

    let mut pdf = ReportPdf::new(title, summary);
    pdf.table(&headers, &data);

    Ok(pdf.finish())
}
