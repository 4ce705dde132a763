use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accumulated reading time for one calendar day.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub seconds: u64,
}

impl DailyRecord {
    pub fn minutes(&self) -> u64 {
        self.seconds / 60
    }
}

/// All daily records, stored on the disk as a JSON object of `"YYYY-MM-DD": seconds`. Days are
/// only ever added or increased, never removed.
#[derive(PartialEq, Eq, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingHistory {
    #[serde(with = "days_ser")]
    days: BTreeMap<NaiveDate, u64>,
}

impl ReadingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seconds_on(&self, date: NaiveDate) -> u64 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    pub fn record(&self, date: NaiveDate) -> DailyRecord {
        DailyRecord {
            date,
            seconds: self.seconds_on(date),
        }
    }

    /// Adds reading time to a day and returns the new total.
    pub fn add_seconds(&mut self, date: NaiveDate, seconds: u64) -> u64 {
        let total = self.days.entry(date).or_insert(0);
        *total = total.saturating_add(seconds);
        *total
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<DailyRecord> for ReadingHistory {
    fn from_iter<T: IntoIterator<Item = DailyRecord>>(iter: T) -> Self {
        let mut history = ReadingHistory::new();
        for record in iter {
            history.add_seconds(record.date, record.seconds);
        }
        history
    }
}

mod days_ser {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{date_to_record_name, record_name_to_date};

    pub fn serialize<S>(days: &BTreeMap<NaiveDate, u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            days.iter()
                .map(|(date, seconds)| (date_to_record_name(*date), seconds)),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<NaiveDate, u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, u64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(name, seconds)| {
                record_name_to_date(&name)
                    .map(|date| (date, seconds))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::{DailyRecord, ReadingHistory};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn adding_accumulates_per_day() {
        let mut history = ReadingHistory::new();
        history.add_seconds(day(1), 10);
        history.add_seconds(day(1), 10);
        history.add_seconds(day(2), 5);

        assert_eq!(history.seconds_on(day(1)), 20);
        assert_eq!(history.seconds_on(day(2)), 5);
        assert_eq!(history.seconds_on(day(3)), 0);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn adding_saturates() {
        let mut history = ReadingHistory::new();
        history.add_seconds(day(1), u64::MAX - 1);
        assert_eq!(history.add_seconds(day(1), 10), u64::MAX);
    }

    #[test]
    fn json_is_date_to_seconds_map() -> Result<()> {
        let history: ReadingHistory = [
            DailyRecord {
                date: day(2),
                seconds: 30,
            },
            DailyRecord {
                date: day(1),
                seconds: 3600,
            },
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&history)?;

        assert_eq!(json, r#"{"2025-03-01":3600,"2025-03-02":30}"#);
        assert_eq!(serde_json::from_str::<ReadingHistory>(&json)?, history);
        Ok(())
    }

    #[test]
    fn bad_dates_and_negative_seconds_are_rejected() {
        assert!(serde_json::from_str::<ReadingHistory>(r#"{"03/01/2025": 10}"#).is_err());
        assert!(serde_json::from_str::<ReadingHistory>(r#"{"2025-03-01": -10}"#).is_err());
    }
}
