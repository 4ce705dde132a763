use std::{path::Path, sync::Arc};

use anyhow::Result;
use tracing::warn;

use crate::{
    config::{Config, Thresholds},
    daemon::{
        collection::matcher::TargetMatcher,
        instance_lock::InstanceLock,
        storage::{
            daily_store::{DailyStore, JsonDailyStore},
            entities::DailyRecord,
        },
    },
    process_api::{ProcessLister, SystemProcessLister},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{config_path, data_path, lock_path},
        percentage::Percentage,
    },
};

use super::output::levels::{progress, Milestone};

const BAR_WIDTH: usize = 30;

pub async fn process_status_command(app_dir: &Path) -> Result<()> {
    let config = Config::load_or_default(&config_path(app_dir));
    let history = JsonDailyStore::new(data_path(app_dir)).load().await?;
    let running = InstanceLock::is_held(&lock_path(app_dir)).await?;
    let reading = active_viewer(&config, &mut SystemProcessLister::new());

    let today = history.record(DefaultClock.local_date());
    print!(
        "{}",
        describe_status(today, config.thresholds(), reading.as_deref(), running)
    );
    Ok(())
}

/// Name of a target process that is running right now.
fn active_viewer(config: &Config, lister: &mut impl ProcessLister) -> Option<Arc<str>> {
    match lister.list_processes() {
        Ok(processes) => TargetMatcher::new(&config.target_processes).find_active(&processes),
        Err(e) => {
            warn!("Couldn't list processes {e:?}");
            None
        }
    }
}

pub fn describe_status(
    record: DailyRecord,
    thresholds: Thresholds,
    reading_now: Option<&str>,
    daemon_running: bool,
) -> String {
    let mut output = format!("Today: {} minutes\n", record.minutes());

    match Milestone::reached(record.seconds, thresholds) {
        Milestone::Nothing => output += "Nothing reached yet\n",
        reached => output += &format!("Reached the {reached}\n"),
    }
    match Milestone::next(record.seconds, thresholds) {
        Some((next, missing)) => {
            output += &format!("Need {} more minutes to reach the {next}\n", missing.div_ceil(60))
        }
        None => output += "Every level reached\n",
    }

    output += &format!("{}\n", progress_bar(progress(record.seconds, thresholds)));
    match reading_now {
        Some(name) => output += &format!("Reading now: {name}\n"),
        None => output += "No active reading session\n",
    }
    let daemon = if daemon_running { "yes" } else { "no" };
    output += &format!("Daemon running: {daemon}\n");
    output
}

fn progress_bar(value: Percentage) -> String {
    let filled = (BAR_WIDTH * usize::from(value.whole()) / 100).min(BAR_WIDTH);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        value.whole()
    )
}
