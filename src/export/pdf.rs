//! Landscape A4 table documents on top of `pdf-writer`.
//!
//! Pages are laid out first and only serialized in [`ReportPdf::finish`],
//! when the total page count is known. Text uses the built-in Helvetica;
//! characters outside ASCII are printed as `?`.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const PAGE_W: f32 = 842.0;
const PAGE_H: f32 = 595.0;
const MARGIN: f32 = 40.0;
const ROW_H: f32 = 18.0;

const BODY_SIZE: f32 = 9.0;
const HEADER_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 14.0;

const FONT: Name<'static> = Name(b"F1");

const HEADER_FILL: [f32; 3] = [0.85, 0.87, 0.90];
const STRIPE_FILL: [f32; 3] = [0.96, 0.96, 0.96];
const GRID: [f32; 3] = [0.65, 0.65, 0.65];

/// Top of the first table row, below the title and summary lines.
const TABLE_TOP: f32 = PAGE_H - MARGIN - 34.0;

fn latin(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

/// Truncate `text` to roughly fit `width` points at `size`.
fn clip(text: &str, width: f32, size: f32) -> String {
    let room = ((width - 8.0) / (size * 0.52)).max(1.0) as usize;
    if text.chars().count() <= room {
        return text.to_string();
    }
    let mut s: String = text.chars().take(room.saturating_sub(1)).collect();
    s.push('.');
    s
}

/// Column widths sized on header and cell lengths, shrunk to the printable width.
fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
    let mut widths: Vec<f32> = headers
        .iter()
        .map(|h| h.chars().count() as f32 * 6.5 + 8.0)
        .collect();

    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = w.max(cell.chars().count() as f32 * 5.2 + 8.0);
        }
    }

    let total: f32 = widths.iter().sum();
    let printable = PAGE_W - 2.0 * MARGIN;
    if total > printable {
        let k = printable / total;
        widths.iter_mut().for_each(|w| *w *= k);
    }
    widths
}

/// How many body rows fit below the header row on one page.
fn rows_per_page() -> usize {
    (((TABLE_TOP - ROW_H - MARGIN) / ROW_H).floor() as usize).max(1)
}

/// Thin drawing layer over one page's content stream.
struct Canvas(Content);

impl Canvas {
    fn text(&mut self, x: f32, y: f32, size: f32, text: &str) {
        let bytes = latin(text);
        self.0
            .begin_text()
            .set_font(FONT, size)
            .set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y])
            .show(Str(&bytes))
            .end_text();
    }

    fn band(&mut self, y: f32, width: f32, [r, g, b]: [f32; 3]) {
        self.0.save_state();
        self.0.set_fill_rgb(r, g, b);
        self.0.rect(MARGIN, y, width, ROW_H);
        self.0.fill_nonzero();
        self.0.restore_state();
    }

    fn row(&mut self, y: f32, widths: &[f32], cells: &[String], size: f32) {
        let mut x = MARGIN;
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            self.text(x + 4.0, y + 5.0, size, &clip(cell, *w, size));

            let [r, g, b] = GRID;
            self.0.save_state();
            self.0.set_stroke_rgb(r, g, b);
            self.0.rect(x, y, *w, ROW_H);
            self.0.stroke();
            self.0.restore_state();

            x += w;
        }
    }
}

/// A table report: title and summary repeated on every page, paginated body.
pub struct ReportPdf {
    title: String,
    summary: String,
    pages: Vec<Content>,
}

impl ReportPdf {
    pub fn new(title: &str, summary: &str) -> Self {
        Self {
            title: title.to_string(),
            summary: summary.to_string(),
            pages: Vec::new(),
        }
    }

    /// Lay out the table. An empty table still yields one page with the header row.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let widths = column_widths(headers, rows);
        let table_w: f32 = widths.iter().sum();
        let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

        let mut chunks: Vec<&[Vec<String>]> = rows.chunks(rows_per_page()).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }

        for chunk in chunks {
            let mut canvas = Canvas(Content::new());
            canvas.text(MARGIN, PAGE_H - MARGIN + 10.0, TITLE_SIZE, &self.title);
            if !self.summary.is_empty() {
                canvas.text(MARGIN, PAGE_H - MARGIN - 6.0, BODY_SIZE, &self.summary);
            }

            let mut y = TABLE_TOP;
            canvas.band(y, table_w, HEADER_FILL);
            canvas.row(y, &widths, &header, HEADER_SIZE);

            for (i, cells) in chunk.iter().enumerate() {
                y -= ROW_H;
                if i % 2 == 0 {
                    canvas.band(y, table_w, STRIPE_FILL);
                }
                canvas.row(y, &widths, cells, BODY_SIZE);
            }

            self.pages.push(canvas.0);
        }
    }

    /// Serialize catalog, page tree, footers and content streams.
    pub fn finish(self) -> Vec<u8> {
        let catalog = Ref::new(1);
        let tree = Ref::new(2);
        let font = Ref::new(3);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog).pages(tree);
        pdf.type1_font(font).base_font(Name(b"Helvetica"));

        let total = self.pages.len();
        let mut kids = Vec::with_capacity(total);

        for (i, content) in self.pages.into_iter().enumerate() {
            let page_ref = Ref::new(4 + 2 * i as i32);
            let content_ref = Ref::new(5 + 2 * i as i32);
            kids.push(page_ref);

            let mut canvas = Canvas(content);
            canvas.text(
                PAGE_W - MARGIN - 70.0,
                MARGIN - 25.0,
                BODY_SIZE,
                &format!("Page {} of {}", i + 1, total),
            );

            {
                let mut page = pdf.page(page_ref);
                page.parent(tree)
                    .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
                    .contents(content_ref);
                page.resources().fonts().pair(FONT, font);
            }

            pdf.stream(content_ref, &canvas.0.finish());
        }

        pdf.pages(tree).count(total as i32).kids(kids);
        pdf.finish()
    }
}
