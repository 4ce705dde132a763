//!  Storage is organized through [daily_store::JsonDailyStore].
//!  The basic idea is:
//!   - There is a single data file with all the records.
//!   - Every calendar day maps to the number of seconds spent reading on it.
//!   - The file is overwritten as a whole after each update, under an advisory lock.

pub mod daily_store;
pub mod entities;
pub mod reading_event;
