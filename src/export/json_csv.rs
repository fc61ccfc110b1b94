// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::ReportExport;

/// JSON, pretty-printed.
pub(crate) fn render_json(rows: &[ReportExport]) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))
}

/// CSV, header row derived by serde.
pub(crate) fn render_csv(rows: &[ReportExport]) -> AppResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    if rows.is_empty() {
        wtr.write_record(super::model::get_headers())
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    for item in rows {
        wtr.serialize(item)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))
}
