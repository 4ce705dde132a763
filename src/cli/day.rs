use std::{fmt::Display, path::Path};

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    config::{Config, Thresholds},
    daemon::storage::{
        daily_store::{DailyStore, JsonDailyStore},
        entities::DailyRecord,
    },
    utils::{
        dir::{config_path, data_path},
        time::{date_to_record_name, record_name_to_date},
    },
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct DayCommand {
    #[arg(
        default_value = "today",
        help = "Day to show. Examples are \"2025-03-15\", \"yesterday\", \"3 days ago\", \"15/03/2025\""
    )]
    pub date: String,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
}

/// Prints the stored record of a single day.
pub async fn process_day_command(app_dir: &Path, command: DayCommand) -> Result<()> {
    let date = parse_day(&command.date, command.date_style, Local::now())?;
    let config = Config::load_or_default(&config_path(app_dir));
    let history = JsonDailyStore::new(data_path(app_dir)).load().await?;

    print!("{}", describe_day(history.record(date), config.thresholds()));
    Ok(())
}

fn parse_day(input: &str, style: DateStyle, now: DateTime<Local>) -> Result<NaiveDate> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") {
        return Ok(now.date_naive());
    }
    if let Ok(date) = record_name_to_date(input) {
        return Ok(date);
    }

    match parse_date_string(input, now, style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(DayCommand::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {input:?}: {e}"),
            )
            .into()),
    }
}

/// A day counts as completed once it reaches the daily goal, not the first coloured level.
pub fn describe_day(record: DailyRecord, thresholds: Thresholds) -> String {
    let completed = if record.seconds >= thresholds.goal_seconds() {
        "Completed"
    } else {
        "Not completed"
    };
    format!(
        "Date: {}\nReading time: {} minutes ({} seconds)\nDaily goal: {} minutes\nGoal: {completed}\n",
        date_to_record_name(record.date),
        record.minutes(),
        record.seconds,
        thresholds.goal,
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};

    use crate::{config::Thresholds, daemon::storage::entities::DailyRecord};

    use super::{describe_day, parse_day, DateStyle};

    const DAY: NaiveDate = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

    fn now() -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn record_dates_and_today() {
        assert_eq!(
            parse_day("2025-01-02", DateStyle::Uk, now()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
        assert_eq!(parse_day(" today ", DateStyle::Uk, now()).unwrap(), DAY);
    }

    #[test]
    fn natural_dates() {
        assert_eq!(
            parse_day("yesterday", DateStyle::Uk, now()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 13).unwrap()
        );
        assert_eq!(
            parse_day("02/03/2025", DateStyle::Uk, now()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
        assert_eq!(
            parse_day("02/03/2025", DateStyle::Us, now()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
        );
        assert!(parse_day("not a date", DateStyle::Uk, now()).is_err());
    }

    #[test]
    fn describes_goal() {
        let t = Thresholds::new(30, 60, 180);
        let short = describe_day(DailyRecord { date: DAY, seconds: 1805 }, t);
        assert_eq!(
            short,
            "Date: 2025-03-14\nReading time: 30 minutes (1805 seconds)\nDaily goal: 60 minutes\nGoal: Not completed\n"
        );

        let done = describe_day(DailyRecord { date: DAY, seconds: 3600 }, t);
        assert!(done.ends_with("Goal: Completed\n"));
    }
}
