use anyhow::Result;
use tracing::{info, warn};

use crate::daemon::storage::{
    daily_store::DailyStore, entities::ReadingHistory, reading_event::ReadingEvent,
};

use super::module::EventProcessor;

/// Bridges [ProcessingModule](super::ProcessingModule) and [DailyStore]. Keeps the whole history
/// in memory and persists it after every update.
pub struct DailySaver<S: DailyStore> {
    store: S,
    history: ReadingHistory,
    /// Set when the last save failed, so the in-memory totals are ahead of the file.
    unsaved: bool,
}

impl<S: DailyStore> DailySaver<S> {
    /// `history` should be what the store contained on startup, so totals of previous runs are
    /// kept.
    pub fn new(store: S, history: ReadingHistory) -> Self {
        Self {
            store,
            history,
            unsaved: false,
        }
    }

    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }

    async fn persist(&mut self) -> Result<()> {
        let result = self.store.save(&self.history).await;
        self.unsaved = result.is_err();
        result
    }
}

impl<S: DailyStore> EventProcessor for DailySaver<S> {
    async fn process_next(&mut self, message: ReadingEvent) -> Result<()> {
        let total = self.history.add_seconds(message.date, message.seconds);
        info!(
            "{} read for {}s, {} total {}m",
            message.process_name,
            message.seconds,
            message.date,
            total / 60
        );
        self.persist().await
    }

    async fn finalize(&mut self) -> Result<()> {
        if self.unsaved {
            warn!("Retrying failed save before shutting down");
            self.persist().await?;
        }
        Ok(())
    }
}
