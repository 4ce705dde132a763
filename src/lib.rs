//! Tracks how long PDF viewers are open each day and shows it as a contribution-style calendar.
//! A small daemon polls the process list and stores daily totals, the cli renders them in a
//! terminal.

pub mod cli;
pub mod config;
pub mod daemon;
pub mod fs;
pub mod process_api;
pub mod utils;
