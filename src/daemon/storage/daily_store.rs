use std::{future::Future, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use crate::fs::operations::{overwrite_locked, read_locked};

use super::entities::ReadingHistory;

/// Interface for abstracting storage of daily records.
pub trait DailyStore {
    /// Reads the whole history. A store that was never written to is an empty history.
    fn load(&self) -> impl Future<Output = Result<ReadingHistory>>;

    /// Replaces the stored history with `history`.
    fn save(&self, history: &ReadingHistory) -> impl Future<Output = Result<()>>;
}

/// The main realization of [DailyStore]. Everything lives in a single JSON file that is
/// overwritten as a whole on every save.
pub struct JsonDailyStore {
    path: PathBuf,
}

impl JsonDailyStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Same as [DailyStore::load], but a file that can't be parsed is moved aside and an empty
    /// history is returned. Used by the daemon, which must keep tracking no matter what.
    pub async fn load_or_recover(&self) -> Result<ReadingHistory> {
        match self.load().await {
            Ok(history) => Ok(history),
            Err(e) if e.is::<serde_json::Error>() => {
                let aside = self.corrupt_path();
                warn!(
                    "Data file {:?} is corrupt, moving it to {:?} and starting over: {e:?}",
                    self.path, aside
                );
                tokio::fs::rename(&self.path, &aside)
                    .await
                    .with_context(|| format!("Failed to move corrupt data file to {aside:?}"))?;
                Ok(ReadingHistory::new())
            }
            Err(e) => Err(e),
        }
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|v| v.to_os_string())
            .unwrap_or_default();
        name.push(format!(".corrupt-{}", Utc::now().timestamp()));
        self.path.with_file_name(name)
    }
}

impl DailyStore for JsonDailyStore {
    async fn load(&self) -> Result<ReadingHistory> {
        debug!("Loading {:?}", self.path);
        let Some(content) = read_locked(&self.path).await? else {
            return Ok(ReadingHistory::new());
        };
        if content.trim_ascii().is_empty() {
            return Ok(ReadingHistory::new());
        }
        // Not wrapped in context so that callers can tell parsing failures from io ones. Invalid
        // UTF-8 is reported by serde_json as well.
        let history = serde_json::from_slice::<ReadingHistory>(&content)?;
        Ok(history)
    }

    async fn save(&self, history: &ReadingHistory) -> Result<()> {
        let content = serde_json::to_vec_pretty(history)?;
        overwrite_locked(&self.path, &content)
            .await
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::daemon::storage::{
        daily_store::{DailyStore, JsonDailyStore},
        entities::ReadingHistory,
    };

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();

    #[tokio::test]
    async fn test_missing_file_is_empty_history() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonDailyStore::new(dir.path().join("data.json"));

        assert!(store.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_history() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");
        std::fs::write(&path, "\n")?;

        assert!(JsonDailyStore::new(path).load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_reload_preserves_history() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");
        let mut history = ReadingHistory::new();
        history.add_seconds(TEST_DATE, 120);
        history.add_seconds(TEST_DATE.succ_opt().unwrap(), 30);

        JsonDailyStore::new(path.clone()).save(&history).await?;

        // Simulates a daemon restart. Loading twice must give the same result.
        let store = JsonDailyStore::new(path);
        let first = store.load().await?;
        let second = store.load().await?;
        assert_eq!(first, history);
        assert_eq!(second, history);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_format() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");
        let mut history = ReadingHistory::new();
        history.add_seconds(TEST_DATE, 42);

        JsonDailyStore::new(path.clone()).save(&history).await?;

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(raw, serde_json::json!({ "2018-07-04": 42 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error_for_plain_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{\"2018-07-04\": ")?;

        assert!(JsonDailyStore::new(path).load().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");
        std::fs::write(&path, "garbage")?;
        let store = JsonDailyStore::new(path.clone());

        let history = store.load_or_recover().await?;

        assert!(history.is_empty());
        assert!(!path.exists());
        let moved = std::fs::read_dir(dir.path())?
            .filter_map(|v| v.ok())
            .filter(|v| v.file_name().to_string_lossy().starts_with("data.json.corrupt-"))
            .count();
        assert_eq!(moved, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_utf8_file_is_moved_aside() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");
        std::fs::write(&path, [0xff, 0xfe, b'{', b'}'])?;
        let store = JsonDailyStore::new(path.clone());

        assert!(store.load().await.is_err());
        let history = store.load_or_recover().await?;

        assert!(history.is_empty());
        assert!(!path.exists());
        Ok(())
    }
}
