//! User configuration. The file is read once on startup and never changes during a run. Any
//! problem with it falls back to [Config::default] so that tracking keeps working.

use std::{collections::BTreeSet, io::ErrorKind, path::Path, time::Duration};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const DEFAULT_TARGETS: [&str; 5] = ["evince", "atril", "okular", "xreader", "document-viewer"];
const DEFAULT_GOAL_MINUTES: u32 = 60;
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process names that count as reading. Compared case-insensitively.
    #[serde(alias = "target_apps")]
    pub target_processes: BTreeSet<String>,
    /// Daily reading goal. Also decides the default colour thresholds of the grid.
    #[serde(alias = "target_time_minutes")]
    pub goal_minutes: u32,
    #[serde(alias = "check_interval")]
    pub poll_interval_seconds: u64,
    /// First coloured level of the grid. Defaults to half of the goal.
    #[serde(alias = "min_time_minutes", skip_serializing_if = "Option::is_none")]
    pub min_minutes: Option<u32>,
    /// Darkest level of the grid. Defaults to three times the goal.
    #[serde(alias = "max_time_minutes", skip_serializing_if = "Option::is_none")]
    pub max_minutes: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_processes: DEFAULT_TARGETS.iter().map(|v| v.to_string()).collect(),
            goal_minutes: DEFAULT_GOAL_MINUTES,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            min_minutes: None,
            max_minutes: None,
        }
    }
}

/// Minute marks used for colouring days. Always ordered `min <= goal <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min: u32,
    pub goal: u32,
    pub max: u32,
}

impl Thresholds {
    pub fn new(min: u32, goal: u32, max: u32) -> Self {
        let mut marks = [min, goal, max];
        marks.sort_unstable();
        Self {
            min: marks[0],
            goal: marks[1],
            max: marks[2],
        }
    }

    pub fn min_seconds(&self) -> u64 {
        u64::from(self.min) * 60
    }

    pub fn goal_seconds(&self) -> u64 {
        u64::from(self.goal) * 60
    }

    pub fn max_seconds(&self) -> u64 {
        u64::from(self.max) * 60
    }
}

impl Config {
    /// Loads the configuration. Never fails: a missing file is created with defaults, an
    /// unreadable or corrupt one is ignored in favour of defaults.
    pub fn load_or_default(path: &Path) -> Config {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Config>(&content) {
                Ok(config) => {
                    debug!("Loaded config from {path:?}");
                    config.validated()
                }
                Err(e) => {
                    warn!("Config {path:?} is corrupt, using defaults: {e}");
                    Config::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = Config::default();
                match config.write(path) {
                    Ok(()) => info!("Created default config at {path:?}"),
                    Err(e) => warn!("Couldn't create default config at {path:?}: {e:?}"),
                }
                config
            }
            Err(e) => {
                warn!("Couldn't read config {path:?}, using defaults: {e}");
                Config::default()
            }
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replaces values that would make the daemon misbehave with their defaults.
    fn validated(mut self) -> Config {
        if self.poll_interval_seconds == 0 {
            warn!(
                "Poll interval of 0 seconds is not allowed, using {DEFAULT_POLL_INTERVAL_SECONDS}"
            );
            self.poll_interval_seconds = DEFAULT_POLL_INTERVAL_SECONDS;
        }
        if self.goal_minutes == 0 {
            warn!("Goal of 0 minutes is not allowed, using {DEFAULT_GOAL_MINUTES}");
            self.goal_minutes = DEFAULT_GOAL_MINUTES;
        }
        if self.target_processes.is_empty() {
            warn!("No target processes configured, nothing will be tracked");
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn thresholds(&self) -> Thresholds {
        let goal = self.goal_minutes;
        Thresholds::new(
            self.min_minutes.unwrap_or(goal / 2),
            goal,
            self.max_minutes.unwrap_or(goal.saturating_mul(3)),
        )
    }
}
