use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in readtrack.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

pub fn record_name_to_date(name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(name, RECORD_DATE_FORMAT)
        .with_context(|| format!("{name:?} is not a YYYY-MM-DD date"))
}

/// First day of a grid that spans `weeks` columns and ends with the week containing `today`.
/// Columns start on Mondays.
pub fn grid_start(today: NaiveDate, weeks: u32) -> NaiveDate {
    let this_monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    this_monday - Duration::days(i64::from(weeks.saturating_sub(1)) * 7)
}
