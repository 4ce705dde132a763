use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;

/// Exclusive advisory lock on the daemon lock file. Only one daemon can hold it, and it's
/// released when the holder exits, even if it crashes.
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Returns `None` if another daemon already holds the lock.
    pub async fn try_acquire(path: &Path) -> Result<Option<InstanceLock>> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;

        if !file.try_lock_exclusive()? {
            return Ok(None);
        }

        // Informational only, the lock itself is what matters.
        file.set_len(0).await?;
        file.write_all(std::process::id().to_string().as_bytes())
            .await?;
        file.flush().await?;

        debug!("Acquired instance lock {path:?}");
        Ok(Some(InstanceLock {
            file,
            path: path.to_path_buf(),
        }))
    }

    /// Checks whether some daemon currently holds the lock.
    pub async fn is_held(path: &Path) -> Result<bool> {
        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let free = file.try_lock_shared()?;
        if free {
            file.unlock_async().await?;
        }
        Ok(!free)
    }

    pub async fn release(self) -> Result<()> {
        self.file.unlock_async().await?;
        debug!("Released instance lock {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::InstanceLock;

    #[tokio::test]
    async fn test_second_instance_is_refused() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("daemon.lock");

        let first = InstanceLock::try_acquire(&path).await?;
        assert!(first.is_some());
        assert!(InstanceLock::try_acquire(&path).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_lock_can_be_taken_after_release() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("daemon.lock");

        let first = InstanceLock::try_acquire(&path).await?.unwrap();
        first.release().await?;

        assert!(InstanceLock::try_acquire(&path).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_lock_is_released_on_drop() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("daemon.lock");

        {
            let _lock = InstanceLock::try_acquire(&path).await?.unwrap();
            assert!(InstanceLock::is_held(&path).await?);
        }

        assert!(!InstanceLock::is_held(&path).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_lock_file_is_not_held() -> Result<()> {
        let dir = tempdir()?;
        assert!(!InstanceLock::is_held(&dir.path().join("daemon.lock")).await?);
        Ok(())
    }
}
