use anyhow::Result;
use module::EventProcessor;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error};

use super::storage::reading_event::ReadingEvent;

pub mod daily_save;
pub mod module;

/// Receives reading events from the collector and hands them to a processor. Runs until the
/// sending side is dropped.
pub struct ProcessingModule<Processor> {
    receiver: Receiver<ReadingEvent>,
    processor: Processor,
}

impl<P: EventProcessor> ProcessingModule<P> {
    pub fn new(receiver: Receiver<ReadingEvent>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut processed = 0usize;
        while let Some(event) = self.receiver.recv().await {
            let date = event.date;
            if let Err(e) = self.processor.process_next(event).await {
                error!("Failed to credit reading time for {date}: {e:?}");
                continue;
            }
            processed += 1;
        }

        debug!("Collector stopped after {processed} reading events, finalizing");
        self.processor.finalize().await
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, sync::Arc};

    use anyhow::{bail, Result};
    use chrono::{NaiveDate, TimeZone, Utc};
    use tokio::sync::mpsc;

    use crate::daemon::storage::reading_event::ReadingEvent;

    use super::{module::EventProcessor, ProcessingModule};

    /// Fails on every event of `failing_date`, records everything it sees.
    struct FlakyProcessor {
        failing_date: NaiveDate,
        credited: Rc<RefCell<Vec<u64>>>,
        finalized: Rc<RefCell<bool>>,
    }

    impl EventProcessor for FlakyProcessor {
        async fn process_next(&mut self, message: ReadingEvent) -> Result<()> {
            if message.date == self.failing_date {
                bail!("disk full");
            }
            self.credited.borrow_mut().push(message.seconds);
            Ok(())
        }

        async fn finalize(&mut self) -> Result<()> {
            *self.finalized.borrow_mut() = true;
            Ok(())
        }
    }

    fn event(day: u32, seconds: u64) -> ReadingEvent {
        ReadingEvent {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            process_name: Arc::from("evince"),
            seconds,
        }
    }

    #[tokio::test]
    async fn failed_event_does_not_stop_draining() -> Result<()> {
        let credited = Rc::new(RefCell::new(Vec::new()));
        let finalized = Rc::new(RefCell::new(false));
        let (sender, receiver) = mpsc::channel(10);
        let module = ProcessingModule::new(
            receiver,
            FlakyProcessor {
                failing_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                credited: credited.clone(),
                finalized: finalized.clone(),
            },
        );

        sender.send(event(1, 10)).await?;
        sender.send(event(2, 20)).await?;
        sender.send(event(3, 30)).await?;
        drop(sender);
        module.run().await?;

        assert_eq!(*credited.borrow(), vec![10, 30]);
        assert!(*finalized.borrow());
        Ok(())
    }
}
