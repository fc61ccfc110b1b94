// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::ReportExport;
use crate::export::excel_date::parse_to_excel_date;
use crate::export::model::{get_headers, row_to_cells};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use unicode_width::UnicodeWidthStr;

const STATUS_COL: usize = 7;

/// Styled workbook: banded rows, frozen header, auto column widths, and a
/// coloured status cell (late amber, absent red).
pub(crate) fn render_xlsx(rows: &[ReportExport], title: &str) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Attendance").map_err(to_app_error)?;

    let title_format = Format::new().set_bold().set_font_size(14);
    worksheet
        .write_with_format(0, 0, title, &title_format)
        .map_err(to_app_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let headers = get_headers();
    let header_row = 2;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(header_row, col as u16, *header, &header_format)
            .map_err(to_app_error)?;
    }

    worksheet.set_freeze_panes(header_row + 1, 0).map_err(to_app_error)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    if rows.is_empty() {
        worksheet
            .write(header_row + 1, 0, "No data available")
            .map_err(to_app_error)?;
    }

    // ---------------------------
    // Rows
    // ---------------------------
    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, r) in rows.iter().enumerate() {
        let row = header_row + 1 + row_index as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in row_to_cells(r).iter().enumerate() {
            let bg = if col == STATUS_COL {
                status_color(value).unwrap_or(band_color)
            } else {
                band_color
            };
            write_xlsx_cell(worksheet, row, col as u16, value, bg)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    workbook.save_to_buffer().map_err(to_app_error)
}

fn status_color(status: &str) -> Option<Color> {
    match status {
        "late" => Some(Color::RGB(0xFFE699)),
        "absent" => Some(Color::RGB(0xF8CBAD)),
        _ => None,
    }
}

/// Write one cell, as an Excel date/time or number when the text parses as one.
fn write_xlsx_cell(worksheet: &mut Worksheet, row: u32, col: u16, s: &str, bg: Color) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if let Some((num_format, serial)) = parse_to_excel_date(s) {
        worksheet
            .write_with_format(row, col, serial, &base.set_num_format(num_format))
            .map_err(to_app_error)?;
        return Ok(());
    }

    if let Ok(num) = s.parse::<i64>() {
        worksheet
            .write_with_format(row, col, num as f64, &base.set_align(FormatAlign::Right))
            .map_err(to_app_error)?;
        return Ok(());
    }

    worksheet
        .write_with_format(row, col, s, &base)
        .map_err(to_app_error)?;

    Ok(())
}

fn to_app_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(format!("XLSX error: {e}"))
}
