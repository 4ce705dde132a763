use std::{io::ErrorKind, path::Path};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};

/// Reads a whole file while holding a shared lock on it. A missing file is reported as `None`
/// instead of an error, because callers treat it as "nothing stored yet". Content is returned as
/// raw bytes, decoding is left to the caller.
pub async fn read_locked(path: &Path) -> Result<Option<Vec<u8>>, io::Error> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    file.lock_shared()?;
    let mut content = Vec::new();
    let result = file.read_to_end(&mut content).await;
    file.unlock_async().await?;
    result?;

    Ok(Some(content))
}

/// Replaces the whole content of a file, creating it if needed. The write happens under an
/// exclusive lock so that readers using [read_locked] never see a partially written file.
pub async fn overwrite_locked(path: &Path, content: &[u8]) -> Result<(), io::Error> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .read(true)
        .truncate(false)
        .open(path)
        .await?;

    // Semi-safe acquire-release for a file
    file.lock_exclusive()?;
    let result = overwrite_file(&mut file, content).await;
    file.unlock_async().await?;
    result
}

async fn overwrite_file(file: &mut File, content: &[u8]) -> Result<(), io::Error> {
    file.set_len(0).await?;
    file.seek(std::io::SeekFrom::Start(0)).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_data().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::{tempdir, tempfile};
    use tokio::io::{AsyncReadExt, AsyncSeekExt};

    use crate::fs::operations::{overwrite_file, overwrite_locked, read_locked};

    #[tokio::test]
    async fn test_read_missing_file() -> Result<()> {
        let dir = tempdir()?;

        let content = read_locked(&dir.path().join("nothing.json")).await?;

        assert_eq!(content, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_creates_and_reads_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");

        overwrite_locked(&path, b"{\"2025-01-01\":10}").await?;

        assert_eq!(
            read_locked(&path).await?.as_deref(),
            Some(&b"{\"2025-01-01\":10}"[..])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_shorter_overwrite_leaves_no_tail() -> Result<()> {
        let mut file = tokio::fs::File::from_std(tempfile()?);

        overwrite_file(&mut file, b"a much longer first version").await?;
        overwrite_file(&mut file, b"short").await?;

        file.rewind().await?;
        let mut s = String::new();
        file.read_to_string(&mut s).await?;
        assert_eq!(s, "short");
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_overwrites_through_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");

        for i in 0..5 {
            overwrite_locked(&path, format!("{i}").as_bytes()).await?;
        }

        assert_eq!(read_locked(&path).await?.as_deref(), Some(&b"4"[..]));
        Ok(())
    }
}
