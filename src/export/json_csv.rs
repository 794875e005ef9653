// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, PointExport, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed.
pub(crate) fn export_json(points: &[PointExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(points)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success(ExportFormat::Json, points.len(), path);
    Ok(())
}

/// Export CSV (header incluso grazie a serde).
pub(crate) fn export_csv(points: &[PointExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for item in points {
        wtr.serialize(item)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success(ExportFormat::Csv, points.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PointExport> {
        vec![
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
        ]
    }

    #[test]
    fn csv_has_header_and_one_line_per_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pace.csv");

        export_csv(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,ideal_remaining,actual_remaining");
        assert_eq!(lines[1], "2024-01-01,96.5,98.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn json_is_an_array_of_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pace.json");

        export_json(&sample(), &path).unwrap();

        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);
        assert_eq!(v[1]["ideal_remaining"], 93.0);
        assert_eq!(v[0]["date"], "2024-01-01");
    }
}
