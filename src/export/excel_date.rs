// src/export/excel_date.rs

use chrono::NaiveDate;

/// Excel number format used for date cells and the chart category axis.
pub(crate) const EXCEL_DATE_FORMAT: &str = "yyyy-mm-dd";

/// Seriale Excel (1900 date system) di una data.
pub(crate) fn excel_serial(date: NaiveDate) -> f64 {
    // 1899-12-30 absorbs the fictitious 1900-02-29
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}
