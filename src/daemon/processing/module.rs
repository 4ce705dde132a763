use anyhow::Result;

use crate::daemon::storage::reading_event::ReadingEvent;

/// Represents an event processor. The daemon only saves locally, but this keeps the collector
/// unaware of where reading time ends up.
pub trait EventProcessor {
    fn process_next(
        &mut self,
        message: ReadingEvent,
    ) -> impl std::future::Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
