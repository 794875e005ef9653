use crate::models::ProjectionPoint;
use crate::ui::chart::{ACTUAL_LABEL, CHART_TITLE, IDEAL_LABEL};
use crate::utils::formatting::fmt_hours;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

type Rgb = (f32, f32, f32);

const IDEAL_RGB: Rgb = (0.53, 0.52, 0.85);
const ACTUAL_RGB: Rgb = (0.0, 0.48, 1.0);
const GRID_RGB: Rgb = (0.85, 0.85, 0.85);
const HEADER_BAND: Rgb = (0.85, 0.87, 0.90);
const ZEBRA_BAND: Rgb = (0.96, 0.96, 0.96);

const FONT: Name<'static> = Name(b"F1");

/// A4 portrait, in points.
#[derive(Clone, Copy)]
struct Layout {
    width: f32,
    height: f32,
    margin: f32,
    row_h: f32,
    body_pt: f32,
    header_pt: f32,
    title_pt: f32,
}

const A4: Layout = Layout {
    width: 595.0,
    height: 842.0,
    margin: 50.0,
    row_h: 20.0,
    body_pt: 10.0,
    header_pt: 11.0,
    title_pt: 14.0,
};

enum Paint {
    Fill(Rgb),
    Outline(Rgb),
}

fn paint_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
    content.save_state();
    match paint {
        Paint::Fill((r, g, b)) => {
            content.set_fill_rgb(r, g, b);
            content.rect(x, y, w, h);
            content.fill_nonzero();
        }
        Paint::Outline((r, g, b)) => {
            content.set_stroke_rgb(r, g, b);
            content.rect(x, y, w, h);
            content.stroke();
        }
    }
    content.restore_state();
}

fn text(content: &mut Content, x: f32, y: f32, size: f32, s: &str) {
    content.begin_text();
    content.set_font(FONT, size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(s.as_bytes()));
    content.end_text();
}

fn line(content: &mut Content, from: (f32, f32), to: (f32, f32), rgb: Rgb, width: f32) {
    content.save_state();
    content.set_stroke_rgb(rgb.0, rgb.1, rgb.2);
    content.set_line_width(width);
    content.move_to(from.0, from.1);
    content.line_to(to.0, to.1);
    content.stroke();
    content.restore_state();
}

/// Series line; a single point is drawn as a small square.
fn polyline(content: &mut Content, pts: &[(f32, f32)], rgb: Rgb, dashed: bool) {
    let Some((&(x0, y0), rest)) = pts.split_first() else {
        return;
    };

    if rest.is_empty() {
        paint_rect(content, x0 - 2.0, y0 - 2.0, 4.0, 4.0, Paint::Fill(rgb));
        return;
    }

    content.save_state();
    content.set_stroke_rgb(rgb.0, rgb.1, rgb.2);
    if dashed {
        content.set_line_width(1.2);
        content.set_dash_pattern([5.0, 5.0], 0.0);
    } else {
        content.set_line_width(2.0);
    }
    content.move_to(x0, y0);
    for &(x, y) in rest {
        content.line_to(x, y);
    }
    content.stroke();
    content.restore_state();
}

/// Column widths from the longest cell, scaled down to fit the printable width.
fn column_widths(headers: &[&str], rows: &[Vec<String>], printable: f32) -> Vec<f32> {
    let mut widths: Vec<f32> = headers.iter().map(|h| h.len() as f32 * 6.5).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = w.max(cell.len() as f32 * 6.2);
        }
    }

    let total: f32 = widths.iter().sum();
    if total > printable {
        widths.iter_mut().for_each(|w| *w *= printable / total);
    }
    widths
}

/// Writes a multi-page PDF: pages are appended in order and the page tree is
/// built on `save`.
pub struct PdfManager {
    pdf: Pdf,
    layout: Layout,
    catalog: Ref,
    tree: Ref,
    font: Ref,
    pages: Vec<Ref>,
    next_ref: i32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();
        let font = Ref::new(3);
        pdf.type1_font(font).base_font(Name(b"Helvetica"));

        Self {
            pdf,
            layout: A4,
            catalog: Ref::new(1),
            tree: Ref::new(2),
            font,
            pages: Vec::new(),
            next_ref: 4,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_ref);
        self.next_ref += 1;
        r
    }

    /// Registers a page with `content` as its stream, titled and numbered.
    fn push_page(&mut self, title: &str, mut content: Content) {
        let l = self.layout;
        let number = self.pages.len() + 1;

        text(&mut content, l.margin, l.height - l.margin + 15.0, l.title_pt, title);
        text(
            &mut content,
            l.width - l.margin - 60.0,
            l.margin - 35.0,
            l.body_pt,
            &format!("Page {number}"),
        );

        let page_ref = self.alloc();
        let stream_ref = self.alloc();

        let mut page = self.pdf.page(page_ref);
        page.parent(self.tree)
            .media_box(Rect::new(0.0, 0.0, l.width, l.height))
            .contents(stream_ref);
        page.resources().fonts().pair(FONT, self.font);
        page.finish();

        self.pdf.stream(stream_ref, &content.finish());
        self.pages.push(page_ref);
    }

    /// Chart page: dashed ideal line, solid actual line, grid, first/last date and legend.
    pub fn write_chart(&mut self, title: &str, points: &[ProjectionPoint]) {
        let l = self.layout;
        let mut c = Content::new();

        let left = l.margin + 40.0;
        let right = l.width - l.margin;
        let top = l.height - l.margin - 40.0;
        let bottom = top - 320.0;

        let values = points
            .iter()
            .flat_map(|p| [p.ideal_remaining as f32, p.actual_remaining as f32]);
        let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (lo, hi) = if points.is_empty() { (0.0, 100.0) } else { (lo, hi) };
        let span = if hi > lo { hi - lo } else { 1.0 };

        let y_of = |v: f64| bottom + (v as f32 - lo) / span * (top - bottom);
        let step = match points.len() {
            0 | 1 => 0.0,
            n => (right - left) / (n - 1) as f32,
        };
        let x_of = |i: usize| left + step * i as f32;

        text(&mut c, left, top + 20.0, l.header_pt, CHART_TITLE);

        for k in 0..=4 {
            let y = bottom + (top - bottom) * k as f32 / 4.0;
            let v = lo + span * k as f32 / 4.0;
            line(&mut c, (left, y), (right, y), GRID_RGB, 0.5);
            let label = fmt_hours(((v * 10.0).round() / 10.0) as f64);
            text(&mut c, l.margin - 5.0, y - 3.0, 8.0, &label);
        }

        line(&mut c, (left, top), (left, bottom), (0.3, 0.3, 0.3), 0.8);
        line(&mut c, (left, bottom), (right, bottom), (0.3, 0.3, 0.3), 0.8);

        let series = |f: fn(&ProjectionPoint) -> f64| -> Vec<(f32, f32)> {
            points
                .iter()
                .enumerate()
                .map(|(i, p)| (x_of(i), y_of(f(p))))
                .collect()
        };
        polyline(&mut c, &series(|p| p.ideal_remaining), IDEAL_RGB, true);
        polyline(&mut c, &series(|p| p.actual_remaining), ACTUAL_RGB, false);

        if let Some(first) = points.first() {
            text(&mut c, left, bottom - 15.0, 8.0, &first.date_str());
        }
        if let (Some(last), true) = (points.last(), points.len() > 1) {
            text(&mut c, right - 45.0, bottom - 15.0, 8.0, &last.date_str());
        }

        // legenda
        let ly = bottom - 40.0;
        for (x, rgb, dashed, label) in [
            (left, IDEAL_RGB, true, IDEAL_LABEL),
            (left + 120.0, ACTUAL_RGB, false, ACTUAL_LABEL),
        ] {
            polyline(&mut c, &[(x, ly), (x + 25.0, ly)], rgb, dashed);
            text(&mut c, x + 30.0, ly - 3.0, l.body_pt, label);
        }

        self.push_page(title, c);
    }

    /// Table split over as many pages as needed; the header row repeats on each.
    pub fn write_table(&mut self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        let l = self.layout;
        let widths = column_widths(headers, rows, l.width - 2.0 * l.margin);
        let table_w: f32 = widths.iter().sum();
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

        let top = l.height - l.margin - 30.0;
        let per_page = (((top - l.margin) / l.row_h) as usize).saturating_sub(1).max(1);

        let draw_row = |c: &mut Content, y: f32, cells: &[String], size: f32| {
            let mut x = l.margin;
            for (cell, w) in cells.iter().zip(&widths) {
                text(c, x + 4.0, y + 5.0, size, cell);
                paint_rect(c, x, y, *w, l.row_h, Paint::Outline((0.65, 0.65, 0.65)));
                x += w;
            }
        };

        // almeno una pagina, anche senza righe
        let chunks: Vec<&[Vec<String>]> = if rows.is_empty() {
            vec![rows]
        } else {
            rows.chunks(per_page).collect()
        };

        for chunk in chunks {
            let mut c = Content::new();
            let mut y = top;

            paint_rect(&mut c, l.margin, y, table_w, l.row_h, Paint::Fill(HEADER_BAND));
            draw_row(&mut c, y, &header_cells, l.header_pt);

            for (i, row) in chunk.iter().enumerate() {
                y -= l.row_h;
                if i % 2 == 0 {
                    paint_rect(&mut c, l.margin, y, table_w, l.row_h, Paint::Fill(ZEBRA_BAND));
                }
                draw_row(&mut c, y, row, l.body_pt);
            }

            self.push_page(title, c);
        }
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog).pages(self.tree);
        self.pdf
            .pages(self.tree)
            .count(self.pages.len() as i32)
            .kids(self.pages.iter().copied());

        let mut f = File::create(path)?;
        f.write_all(&self.pdf.finish())?;
        Ok(())
    }
}
