use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Like [`parse_date`], but also accepts the shortcuts `today` and `yesterday`.
pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => Ok(today()),
        "yesterday" => today()
            .pred_opt()
            .ok_or_else(|| AppError::InvalidDate(s.to_string())),
        _ => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())),
    }
}

pub fn month_name(m: &str) -> &'static str {
    match m {
        "01" => "January",
        "02" => "February",
        "03" => "March",
        "04" => "April",
        "05" => "May",
        "06" => "June",
        "07" => "July",
        "08" => "August",
        "09" => "September",
        "10" => "October",
        "11" => "November",
        "12" => "December",
        _ => "Unknown",
    }
}
