// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{EXCEL_DATE_FORMAT, excel_serial};
use crate::export::model::get_headers;
use crate::export::{ExportFormat, PointExport, notify_export_success};
use crate::ui::chart::{ACTUAL_LABEL, CHART_TITLE, IDEAL_LABEL};
use crate::ui::messages::info;
use chrono::NaiveDate;
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartLineDashType, ChartType, Color, Format, FormatAlign,
    FormatBorder, FormatPattern, Workbook, Worksheet,
};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const SHEET: &str = "Pace";

/// Export XLSX: tabella con styling + grafico a linee nativo delle due serie.
pub(crate) fn export_xlsx(points: &[PointExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET).map_err(to_app_error)?;

    // ---------------------------
    // Caso dataset vuoto
    // ---------------------------
    if points.is_empty() {
        worksheet
            .write(0, 0, "No data available")
            .map_err(to_app_error)?;
        workbook.save(path).map_err(to_app_error)?;
        notify_export_success(ExportFormat::Xlsx, 0, path);
        return Ok(());
    }

    // ---------------------------
    // Header
    // ---------------------------
    let headers = get_headers();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_app_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_app_error)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Scrittura righe
    // ---------------------------
    for (row_index, p) in points.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };

        write_date_cell(worksheet, row, 0, &p.date, band)?;
        write_number_cell(worksheet, row, 1, p.ideal_remaining, band)?;
        write_number_cell(worksheet, row, 2, p.actual_remaining, band)?;

        col_widths[0] = col_widths[0].max(UnicodeWidthStr::width(p.date.as_str()));
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    // ---------------------------
    // Grafico
    // ---------------------------
    let chart = build_chart(points.len() as u32);
    worksheet
        .insert_chart(1, (headers.len() + 1) as u16, &chart)
        .map_err(to_app_error)?;

    workbook.save(path).map_err(to_app_error)?;

    notify_export_success(ExportFormat::Xlsx, points.len(), path);
    Ok(())
}

/// Ideal pace dashed grey, actual pace solid blue; categories are the date column.
fn build_chart(last_row: u32) -> Chart {
    let mut chart = Chart::new(ChartType::Line);

    chart
        .add_series()
        .set_name(IDEAL_LABEL)
        .set_categories((SHEET, 1, 0, last_row, 0))
        .set_values((SHEET, 1, 1, last_row, 1))
        .set_format(
            ChartFormat::new().set_line(
                ChartLine::new()
                    .set_color(Color::RGB(0x8884D8))
                    .set_dash_type(ChartLineDashType::Dash),
            ),
        );

    chart
        .add_series()
        .set_name(ACTUAL_LABEL)
        .set_categories((SHEET, 1, 0, last_row, 0))
        .set_values((SHEET, 1, 2, last_row, 2))
        .set_format(
            ChartFormat::new().set_line(
                ChartLine::new()
                    .set_color(Color::RGB(0x007BFF))
                    .set_width(2.25),
            ),
        );

    chart.title().set_name(CHART_TITLE);
    chart.x_axis().set_name("Date");
    chart.y_axis().set_name("Hours left");

    chart
}

fn write_date_cell(ws: &mut Worksheet, row: u32, col: u16, s: &str, bg: Color) -> AppResult<()> {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => {
            let fmt = Format::new()
                .set_num_format(EXCEL_DATE_FORMAT)
                .set_background_color(bg)
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin);
            ws.write_with_format(row, col, excel_serial(d), &fmt)
                .map_err(to_app_error)?;
        }
        Err(_) => {
            let fmt = Format::new()
                .set_background_color(bg)
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin);
            ws.write_with_format(row, col, s, &fmt)
                .map_err(to_app_error)?;
        }
    }
    Ok(())
}

fn write_number_cell(ws: &mut Worksheet, row: u32, col: u16, v: f64, bg: Color) -> AppResult<()> {
    let fmt = Format::new()
        .set_align(FormatAlign::Right)
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    ws.write_with_format(row, col, v, &fmt)
        .map_err(to_app_error)?;
    Ok(())
}

fn to_app_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pace.xlsx");
        let points = vec![
            PointExport {
                date: "2024-01-01".into(),
                ideal_remaining: 96.5,
                actual_remaining: 98.0,
            },
            PointExport {
                date: "2024-01-02".into(),
                ideal_remaining: 93.0,
                actual_remaining: 94.0,
            },
        ];

        export_xlsx(&points, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }
}
