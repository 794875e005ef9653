//! Export of the projected pace series: csv, json, xlsx (with a native line
//! chart) and pdf (chart page + table).

mod excel_date;
mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
mod pdf;
mod pdf_export;
pub mod range;
mod xlsx;

pub use logic::ExportLogic;
pub use model::PointExport;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// True when `path` carries this format's extension (case-insensitive).
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.as_str()))
    }
}

pub(crate) fn notify_export_success(format: ExportFormat, points: usize, path: &Path) {
    success(format!(
        "{} export completed ({} points): {}",
        format.label(),
        points,
        path.display()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_ignores_case() {
        assert!(ExportFormat::Pdf.matches_extension(Path::new("/tmp/pace.PDF")));
        assert!(!ExportFormat::Csv.matches_extension(Path::new("/tmp/pace.json")));
        assert!(!ExportFormat::Json.matches_extension(Path::new("/tmp/pace")));
        assert_eq!(ExportFormat::Xlsx.label(), "XLSX");
    }
}
