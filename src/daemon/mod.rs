use std::path::PathBuf;

use anyhow::{bail, Result};
use collection::{collector::DataCollectionModule, matcher::TargetMatcher};
use instance_lock::InstanceLock;
use processing::{daily_save::DailySaver, ProcessingModule};
use storage::{
    daily_store::JsonDailyStore, entities::ReadingHistory, reading_event::ReadingEvent,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    config::Config,
    process_api::{ProcessLister, SystemProcessLister},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{config_path, data_path, lock_path},
    },
};

pub mod args;
pub mod collection;
pub mod instance_lock;
pub mod processing;
pub mod shutdown;
pub mod storage;

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf) -> Result<()> {
    let Some(lock) = InstanceLock::try_acquire(&lock_path(&dir)).await? else {
        bail!("Another readtrack daemon is already running for {dir:?}");
    };

    let config = Config::load_or_default(&config_path(&dir));
    info!(
        "Starting daemon. Tracking {:?} every {}s",
        config.target_processes, config.poll_interval_seconds
    );

    let store = JsonDailyStore::new(data_path(&dir));
    let history = store.load_or_recover().await?;
    info!("Loaded {} days of history", history.len());

    let (sender, receiver) = mpsc::channel::<ReadingEvent>(10);
    let shutdown_token = CancellationToken::new();

    let collector = create_collector(
        sender,
        SystemProcessLister::new(),
        &config,
        &shutdown_token,
        DefaultClock,
    );
    let processor = create_processor(store, history, receiver);

    let (_, collection_result, processing_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        async {
            let result = collector.run().await;
            // A failed collector would otherwise leave the signal listener waiting forever.
            shutdown_token.cancel();
            result
        },
        processor.run(),
    );

    if let Err(collection_result) = collection_result {
        error!("Collection module got an error {:?}", collection_result);
    }

    if let Err(processing_result) = processing_result {
        error!("Processing module got an error {:?}", processing_result);
    }

    lock.release().await?;
    info!("Daemon stopped");
    Ok(())
}

fn create_collector(
    sender: mpsc::Sender<ReadingEvent>,
    lister: impl ProcessLister + 'static,
    config: &Config,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> DataCollectionModule {
    DataCollectionModule::new(
        sender,
        Box::new(lister),
        shutdown_token.clone(),
        TargetMatcher::new(&config.target_processes),
        config.poll_interval(),
        Box::new(clock),
    )
}

fn create_processor(
    store: JsonDailyStore,
    history: ReadingHistory,
    receiver: mpsc::Receiver<ReadingEvent>,
) -> ProcessingModule<DailySaver<JsonDailyStore>> {
    ProcessingModule::new(receiver, DailySaver::new(store, history))
}
