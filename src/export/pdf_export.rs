// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{get_headers, points_to_table};
use crate::export::pdf::PdfManager;
use crate::export::{ExportFormat, PointExport, notify_export_success};
use crate::models::ProjectionPoint;
use crate::ui::messages::info;
use std::path::Path;

/// Export PDF: pagina con il grafico, poi la tabella dei punti.
pub(crate) fn export_pdf(points: &[ProjectionPoint], path: &Path, title: &str) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let rows: Vec<PointExport> = points.iter().map(PointExport::from).collect();
    let headers = get_headers();
    let data_vec = points_to_table(&rows);

    let mut pdf = PdfManager::new();
    pdf.write_chart(title, points);
    pdf.write_table(title, &headers, &data_vec);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success(ExportFormat::Pdf, points.len(), path);
    Ok(())
}
