use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

/// Every flag is optional, desktop entries start the daemon without any.
#[derive(Parser, Debug)]
#[command(name = "readtrack-daemon", version, about = "Tracks time spent in PDF viewers")]
pub struct DaemonArgs {
    /// Stay attached to the current console instead of detaching.
    #[arg(long)]
    pub force: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
