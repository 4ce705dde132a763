use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

/// Produced by the collector for every poll that found a target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingEvent {
    /// Local day the time is credited to.
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub process_name: Arc<str>,
    /// Length of one poll interval.
    pub seconds: u64,
}
