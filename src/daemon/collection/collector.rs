use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info_span, trace, Instrument};

use crate::{
    daemon::storage::reading_event::ReadingEvent, process_api::ProcessLister, utils::clock::Clock,
};

use super::matcher::TargetMatcher;

pub struct DataCollectionModule {
    next: mpsc::Sender<ReadingEvent>,
    producer: Box<dyn ProcessLister>,
    shutdown: CancellationToken,
    matcher: TargetMatcher,
    collection_frequency: Duration,
    time_provider: Box<dyn Clock>,
}

impl DataCollectionModule {
    pub fn new(
        next: mpsc::Sender<ReadingEvent>,
        producer: Box<dyn ProcessLister>,
        shutdown: CancellationToken,
        matcher: TargetMatcher,
        collection_frequency: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            producer,
            collection_frequency,
            matcher,
            time_provider,
            shutdown,
        }
    }

    /// Returns an event when a target process is running. Reading is credited with a whole
    /// interval regardless of when exactly inside it the viewer was opened.
    fn collect_data(&mut self) -> Result<Option<ReadingEvent>> {
        let processes = self.producer.list_processes()?;
        let Some(process_name) = self.matcher.find_active(&processes) else {
            return Ok(None);
        };

        Ok(Some(ReadingEvent {
            date: self.time_provider.local_date(),
            timestamp: self.time_provider.time(),
            process_name,
            seconds: self.collection_frequency.as_secs(),
        }))
    }

    /// Executes the collector event loop.
    pub async fn run(mut self) -> Result<()> {
        let mut collection_point = self.time_provider.instant();
        loop {
            collection_point += self.collection_frequency;

            match self.collect_data() {
                Ok(Some(event)) => {
                    let span = info_span!("Processing collected data");
                    debug!("Sending message {:?}", event);
                    self.next
                        .send(event)
                        .instrument(span)
                        .await
                        .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                }
                Ok(None) => {
                    trace!("No target process is running")
                }
                Err(e) => {
                    // The cycle is skipped, next poll tries again.
                    error!("Encountered an error during collection {:?}", e)
                }
            }

            tokio::select! {
                // Cancelation means we stop execution of the event loop. Which means we also drop
                // the sender channel and consequently stop processing module.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(collection_point) => ()
            }
        }
    }
}
