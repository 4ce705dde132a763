pub mod daemon_path;
pub mod day;
pub mod grid;
pub mod output;
pub mod process;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use day::{process_day_command, DayCommand};
use grid::{process_grid_command, GridCommand};
use output::DEFAULT_WEEKS;
use process::{ensure_daemon_running, restart_daemon, stop_daemons};
use status::process_status_command;
use tracing::{error, level_filters::LevelFilter};

use crate::{
    daemon::start_daemon,
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "readtrack", version, long_about = None)]
#[command(about = "Tracks how much time you spend reading PDFs", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display the reading calendar. Used when no command is given")]
    Grid {
        #[command(flatten)]
        command: GridCommand,
    },
    #[command(about = "Show the reading time of a single day")]
    Day {
        #[command(flatten)]
        command: DayCommand,
    },
    #[command(about = "Show today's progress and whether the daemon is running")]
    Status {},
    #[command(about = "Starts a daemon for the application, stopping previous ones")]
    Init {},
    #[command(
        about = "Run a daemon directly in current console. Mostly useful for debugging"
    )]
    Serve {},
    #[command(about = "Stop currently running daemons.")]
    Stop {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();
    let app_dir = resolve_application_path(args.dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        None => {
            // The grid is still useful without a daemon, so failing to start one isn't fatal.
            if let Err(e) = ensure_daemon_running(&app_dir).await {
                error!("Failed to start daemon {e:?}");
                eprintln!("Couldn't start the daemon: {e:#}");
            }
            let command = GridCommand {
                weeks: DEFAULT_WEEKS,
                watch: None,
                plain: false,
            };
            process_grid_command(&app_dir, command).await
        }
        Some(Commands::Grid { command }) => process_grid_command(&app_dir, command).await,
        Some(Commands::Day { command }) => process_day_command(&app_dir, command).await,
        Some(Commands::Status {}) => process_status_command(&app_dir).await,
        Some(Commands::Init {}) => {
            restart_daemon(&app_dir)?;
            println!("Daemon started");
            Ok(())
        }
        Some(Commands::Stop {}) => {
            let stopped = stop_daemons()?;
            println!("Stopped {stopped} daemons");
            Ok(())
        }
        Some(Commands::Serve {}) => start_daemon(app_dir).await,
    }
}
