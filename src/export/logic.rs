// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::PointExport;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::pdf_export::export_pdf;
use crate::export::range::{filter_points, parse_optional_range};
use crate::export::xlsx::export_xlsx;
use crate::models::ProjectionPoint;
use crate::ui::messages::warning;
use crate::utils::date::month_name;
use std::path::Path;

/// Logica di alto livello per l'export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export della proiezione.
    ///
    /// - `file`: path assoluto del file di output
    /// - `range`: `None`, `"all"` oppure `YYYY`, `YYYY-MM`, `YYYY-MM-DD` e
    ///   gli intervalli `A:B` dello stesso formato
    ///
    /// Returns the number of exported points.
    pub fn export(
        points: &[ProjectionPoint],
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let bounds = parse_optional_range(range)?;
        let selected = filter_points(points, bounds);

        if selected.is_empty() {
            warning("No logged days found for selected range.");
            return Ok(0);
        }

        if !format.matches_extension(path) {
            warning(format!(
                "File name does not end in .{}; writing {} anyway.",
                format.as_str(),
                format.label()
            ));
        }

        ensure_writable(path, force)?;

        let flat: Vec<PointExport> = selected.iter().map(PointExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&flat, path)?,
            ExportFormat::Json => export_json(&flat, path)?,
            ExportFormat::Xlsx => export_xlsx(&flat, path)?,
            ExportFormat::Pdf => export_pdf(&selected, path, &build_pdf_title(range))?,
        }

        Ok(selected.len())
    }
}

/// Titolo del PDF in base al periodo selezionato.
fn build_pdf_title(period: Option<&str>) -> String {
    let base = "Study pace";

    let Some(p) = period.map(str::trim) else {
        return base.to_string();
    };

    match p.len() {
        // YYYY
        4 => format!("{base} for year {p}"),
        // YYYY-MM
        7 => match p.split_once('-') {
            Some((y, m)) => format!("{base} for {} {}", month_name(m), y),
            None => base.to_string(),
        },
        // YYYY-MM-DD
        10 => format!("{base} on {p}"),
        // A:B
        _ => match p.split_once(':') {
            Some((a, b)) => format!("{base} from {} to {}", a.trim(), b.trim()),
            None => base.to_string(),
        },
    }
}
