use std::{fmt::Write, path::Path, time::Duration};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{debug, error};

use crate::{
    config::{Config, Thresholds},
    daemon::storage::daily_store::{DailyStore, JsonDailyStore},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{config_path, data_path},
        time::date_to_record_name,
    },
};

use super::output::{
    build_calendar,
    levels::{Level, PALETTE},
    Calendar, DEFAULT_WEEKS,
};

#[derive(Debug, Parser)]
pub struct GridCommand {
    #[arg(
        long,
        short,
        help = "Number of week columns to show",
        default_value_t = DEFAULT_WEEKS,
        value_parser = clap::value_parser!(u32).range(1..=520)
    )]
    pub weeks: u32,
    #[arg(
        long,
        help = "Redraw the grid every given number of seconds until interrupted"
    )]
    pub watch: Option<u64>,
    #[arg(long, help = "Use characters instead of colours")]
    pub plain: bool,
}

const ROW_LABELS: [&str; 7] = ["Mon", "", "Wed", "", "Fri", "", "Sun"];
const LABEL_WIDTH: usize = 4;
const CELL_WIDTH: usize = 2;
const CELL: &str = "■";

/// Command to process `grid` command. Prints the reading calendar, optionally refreshing it.
pub async fn process_grid_command(app_dir: &Path, command: GridCommand) -> Result<()> {
    let config = Config::load_or_default(&config_path(app_dir));
    let store = JsonDailyStore::new(data_path(app_dir));
    let clock = DefaultClock;

    let Some(seconds) = command.watch else {
        let output = render_grid(&store, &config, clock.local_date(), &command).await?;
        print!("{output}");
        return Ok(());
    };

    let refresh = Duration::from_secs(seconds.max(1));
    loop {
        match render_grid(&store, &config, clock.local_date(), &command).await {
            // Clears the screen and moves the cursor home before redrawing.
            Ok(output) => print!("\x1b[2J\x1b[H{output}"),
            Err(e) => error!("Failed to refresh grid {e:?}"),
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = clock.sleep(refresh) => debug!("Refreshing grid"),
        }
    }
}

async fn render_grid(
    store: &JsonDailyStore,
    config: &Config,
    today: NaiveDate,
    command: &GridCommand,
) -> Result<String> {
    let history = store.load().await?;
    let thresholds = config.thresholds();
    let calendar = build_calendar(&history, today, command.weeks, thresholds);

    let mut output = render_calendar(&calendar, command.plain);
    output.push('\n');
    output += &render_legend(thresholds, command.plain);
    output.push('\n');
    let today_record = history.record(today);
    writeln!(
        output,
        "Today ({}): {} minutes",
        date_to_record_name(today),
        today_record.minutes()
    )?;
    Ok(output)
}

fn paint(level: Level, plain: bool) -> String {
    if plain {
        level.plain_cell().to_string()
    } else {
        level.colour().paint(CELL).to_string()
    }
}

pub fn render_calendar(calendar: &Calendar, plain: bool) -> String {
    let mut output = String::new();

    let mut header = " ".repeat(LABEL_WIDTH);
    for (week, name) in &calendar.month_labels {
        let column = LABEL_WIDTH + week * CELL_WIDTH;
        // Skips labels that would overlap the previous one.
        if header.chars().count() > column {
            continue;
        }
        let padding = column - header.chars().count();
        header += &" ".repeat(padding);
        header += name;
    }
    output += header.trim_end();
    output.push('\n');

    for (day, label) in ROW_LABELS.iter().enumerate() {
        let mut line = format!("{label:<LABEL_WIDTH$}");
        for week in &calendar.weeks {
            match &week[day] {
                Some(cell) => line += &paint(cell.level, plain),
                None => line.push(' '),
            }
            line += &" ".repeat(CELL_WIDTH - 1);
        }
        output += line.trim_end();
        output.push('\n');
    }
    output
}

pub fn render_legend(thresholds: Thresholds, plain: bool) -> String {
    let cells = Level::all()
        .map(|level| paint(level, plain))
        .collect::<Vec<_>>()
        .join(" ");
    debug_assert_eq!(Level::all().count(), PALETTE.len());
    format!(
        "Less {cells} More    coloured from {}m, goal {}m, darkest at {}m+",
        thresholds.min, thresholds.goal, thresholds.max
    )
}
