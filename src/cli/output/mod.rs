pub mod levels;

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    config::Thresholds,
    daemon::storage::entities::{DailyRecord, ReadingHistory},
    utils::time::grid_start,
};

use levels::{level_for, Level};

pub const DEFAULT_WEEKS: u32 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub record: DailyRecord,
    pub level: Level,
}

/// One column of the grid, Monday first. Days after today are `None`.
pub type Week = [Option<CalendarCell>; 7];

/// Contribution-style calendar. Columns are weeks, rows are days of the week.
#[derive(Debug)]
pub struct Calendar {
    pub start: NaiveDate,
    pub weeks: Vec<Week>,
    /// Index of the week where a month starts, with the month abbreviation.
    pub month_labels: Vec<(usize, String)>,
}

impl Calendar {
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        let offset = (date - self.start).num_days();
        if offset < 0 {
            return None;
        }
        let offset = offset as usize;
        self.weeks.get(offset / 7)?[offset % 7].as_ref()
    }

    pub fn days(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flatten().flatten()
    }
}

/// Lays out `weeks` columns of history ending with the week containing `today`.
pub fn build_calendar(
    history: &ReadingHistory,
    today: NaiveDate,
    weeks: u32,
    thresholds: Thresholds,
) -> Calendar {
    let start = grid_start(today, weeks.max(1));
    let mut columns = Vec::with_capacity(weeks as usize);
    let mut month_labels = Vec::new();
    let mut current_month = None;

    for week in 0..weeks.max(1) as usize {
        let mut column: Week = [None; 7];
        for (day, slot) in column.iter_mut().enumerate() {
            let date = start + Duration::days((week * 7 + day) as i64);
            if date > today {
                continue;
            }

            if current_month != Some(date.month()) {
                current_month = Some(date.month());
                month_labels.push((week, date.format("%b").to_string()));
            }

            let record = history.record(date);
            *slot = Some(CalendarCell {
                record,
                level: level_for(record.seconds, thresholds),
            });
        }
        columns.push(column);
    }

    // A week can contain two months, only the first label of a column is kept.
    month_labels.dedup_by_key(|(week, _)| *week);

    Calendar {
        start,
        weeks: columns,
        month_labels,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Duration, NaiveDate, Weekday};

    use crate::{config::Thresholds, daemon::storage::entities::ReadingHistory};

    use super::build_calendar;

    const TODAY: NaiveDate = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

    fn thresholds() -> Thresholds {
        Thresholds::new(30, 60, 180)
    }

    #[test]
    fn full_year_layout() {
        let calendar = build_calendar(&ReadingHistory::new(), TODAY, 53, thresholds());

        assert_eq!(calendar.weeks.len(), 53);
        assert_eq!(calendar.start.weekday(), Weekday::Mon);
        // Friday: Saturday and Sunday of the last column are in the future.
        let last = calendar.weeks.last().unwrap();
        assert!(last[4].is_some());
        assert!(last[5].is_none() && last[6].is_none());
        assert_eq!(calendar.days().last().unwrap().record.date, TODAY);
    }

    #[test]
    fn cells_carry_records_and_levels() {
        let mut history = ReadingHistory::new();
        history.add_seconds(TODAY, 3 * 3600);
        history.add_seconds(TODAY - Duration::days(1), 30 * 60);
        history.add_seconds(TODAY - Duration::days(2000), 600);

        let calendar = build_calendar(&history, TODAY, 53, thresholds());

        let today = calendar.cell(TODAY).unwrap();
        assert_eq!(today.record.seconds, 3 * 3600);
        assert_eq!(today.level.index(), 4);
        assert_eq!(calendar.cell(TODAY - Duration::days(1)).unwrap().level.index(), 1);
        assert!(calendar.cell(TODAY - Duration::days(2000)).is_none());
        assert!(calendar.cell(TODAY + Duration::days(1)).is_none());
        assert_eq!(
            calendar.days().filter(|v| v.record.seconds > 0).count(),
            2
        );
    }

    #[test]
    fn month_labels_mark_month_starts() {
        let calendar = build_calendar(&ReadingHistory::new(), TODAY, 53, thresholds());

        let months = calendar
            .month_labels
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(months.first(), Some(&"Mar"));
        assert_eq!(months.last(), Some(&"Mar"));
        assert!(months.len() >= 12);
        assert!(calendar.month_labels.windows(2).all(|v| v[0].0 < v[1].0));
    }
}
